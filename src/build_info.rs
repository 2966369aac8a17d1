//! Version and build metadata
//!
//! `build.rs` stamps every compile with a counter and a UTC time. Both are
//! optional at compile time so the crate still builds without the script.

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const PRODUCT: &str = "Meal Cart";

/// What the status tool reports about the running binary
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: VERSION,
            build_number: stamped_build_number(option_env!("MEALCART_BUILD_NUMBER")),
            build_timestamp: option_env!("MEALCART_BUILD_TIMESTAMP").unwrap_or("unknown"),
            description: env!("CARGO_PKG_DESCRIPTION"),
        }
    }

    /// Lines of the startup banner
    pub fn banner(&self) -> Vec<String> {
        let rule = "=".repeat(47);
        vec![
            rule.clone(),
            format!("  {} v{} (build {})", PRODUCT, self.version, self.build_number),
            format!("  Built {}", self.build_timestamp),
            rule,
        ]
    }
}

/// Unset or garbled stamps read as build 0
fn stamped_build_number(stamp: Option<&str>) -> u64 {
    stamp.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Write the banner to stderr; stdout carries the MCP protocol
pub fn print_startup_banner() {
    for line in BuildInfo::current().banner() {
        eprintln!("{}", line);
    }
}
