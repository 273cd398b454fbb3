//! Infrastructure implementations of the Confab ports.
//!
//! - `sqlite`: sqlx-backed `MemoryStore` + `AgentDirectory` over a split
//!   reader/writer WAL pool.
//! - `memory`: DashMap-backed in-memory store (tests, demos) and the
//!   relevance ranking shared by both stores.
//! - `generate`: `LanguageGenerator` over an OpenAI-compatible chat
//!   completions endpoint.

pub mod generate;
pub mod memory;
pub mod sqlite;
