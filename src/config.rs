//! Runtime configuration
//!
//! Settings come from environment variables, with defaults relative to the
//! project directory.

use std::path::PathBuf;

/// Overrides the database location
pub const DATABASE_PATH_VAR: &str = "MEALCART_DATABASE_PATH";

/// Default tracing directive, extended by RUST_LOG
pub const DEFAULT_LOG_DIRECTIVE: &str = "mealcart=info";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

/// `<project>/data/mealcart.db`, found by walking up from target/{debug,release}
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("mealcart.db");
    path
}

/// Open the database at `path`, creating its directory, and bring the schema up to date
pub fn open_database(path: &std::path::Path) -> Result<crate::db::Database, Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = crate::db::Database::new(path)?;
    let version = database.with_conn(|conn| {
        crate::db::migrations::run_migrations(conn)?;
        crate::db::migrations::get_schema_version(conn)
    })?;
    tracing::info!("Database schema version: {}", version);

    Ok(database)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_ends_with_database_file() {
        let path = default_database_path();
        assert!(path.ends_with("data/mealcart.db"));
    }
}
