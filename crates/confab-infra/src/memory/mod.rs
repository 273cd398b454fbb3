//! Memory store support: relevance ranking and the in-memory backend.

pub mod in_memory;
pub mod rank;

pub use in_memory::InMemoryStore;
