//! Key-value document store
//!
//! The persistence seam for user state. Tools only see `KeyValueStore`, so the
//! SQLite-backed `Database` and the in-process `MemoryStore` are interchangeable.

use std::collections::HashMap;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::connection::{Database, DbResult};

/// Read/write access to string values stored under string keys
pub trait KeyValueStore {
    /// Get the raw value for a key
    fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Insert or replace the value for a key
    fn set(&self, key: &str, value: &str) -> DbResult<()>;

    /// Remove a key. Returns true if a value was removed.
    fn remove(&self, key: &str) -> DbResult<bool>;

    /// Read and rewrite one value without letting another writer in between.
    ///
    /// `apply` is called exactly once with the current value. Returning `None`
    /// leaves the stored value untouched.
    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Option<String>,
    ) -> DbResult<()>;
}

fn select_value(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
}

fn upsert_value(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        r#"
        INSERT INTO kv_store (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
        params![key, value],
    )?;
    Ok(())
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.with_conn(|conn| Ok(select_value(conn, key)?))
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        self.with_conn(|conn| Ok(upsert_value(conn, key, value)?))
    }

    fn remove(&self, key: &str) -> DbResult<bool> {
        self.with_conn(|conn| {
            let rows = conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
            Ok(rows > 0)
        })
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Option<String>,
    ) -> DbResult<()> {
        self.with_conn_mut(|conn| {
            // IMMEDIATE takes the write lock before the read
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let current = select_value(&tx, key)?;
            if let Some(value) = apply(current.as_deref()) {
                upsert_value(&tx, key, &value)?;
            }

            tx.commit()?;
            Ok(())
        })
    }
}

/// In-process store, used by tests and one-shot utilities
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> DbResult<bool> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.remove(key).is_some())
    }

    fn update(
        &self,
        key: &str,
        apply: &mut dyn FnMut(Option<&str>) -> Option<String>,
    ) -> DbResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(value) = apply(entries.get(key).map(String::as_str)) {
            entries.insert(key.to_string(), value);
        }
        Ok(())
    }
}
