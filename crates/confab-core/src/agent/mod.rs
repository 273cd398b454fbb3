//! Agent directory port and the inbound agent service.

pub mod directory;
pub mod service;

pub use directory::AgentDirectory;
pub use service::{AgentService, EngineError};
