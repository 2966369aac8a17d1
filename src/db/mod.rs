//! Database module
//!
//! Handles SQLite connection, migrations, and the key-value store seam.

pub mod connection;
pub mod migrations;
pub mod store;

pub use connection::{Database, DbError, DbResult};
pub use store::{KeyValueStore, MemoryStore};
