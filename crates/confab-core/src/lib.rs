//! Conversation orchestration and generation-validation engine for Confab.
//!
//! This crate defines the "ports" (the `MemoryStore`, `AgentDirectory`, and
//! `LanguageGenerator` traits) that the infrastructure layer implements,
//! plus the engine built on top of them: the grounded-response retry loop,
//! the agent-to-agent dialogue orchestrator, the transcript summarizer, the
//! settings mutator, and the user intent router.
//!
//! It depends only on `confab-types` -- never on a database, HTTP, or
//! provider crate.

pub mod agent;
pub mod chat;
pub mod generate;
pub mod memory;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;
