//! SQLite-backed store implementations.

pub mod pool;
pub mod store;

pub use pool::{default_database_url, DatabasePool};
pub use store::SqliteMemoryStore;
