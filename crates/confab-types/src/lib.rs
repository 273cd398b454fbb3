//! Shared domain types for Confab.
//!
//! This crate contains the core domain types used across the Confab engine:
//! Agent, Network, MemoryEntry, Transcript, and the generation/error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod agent;
pub mod config;
pub mod error;
pub mod generate;
pub mod memory;
pub mod transcript;
