use thiserror::Error;

/// Errors from memory-store and agent-directory operations.
///
/// Store failures are always recoverable at the call site: recall failures
/// degrade to an empty memory set, append/write failures are reported upward
/// as structured status, never thrown past the mutation boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("agent not found")]
    AgentNotFound,

    #[error("network not found")]
    NetworkNotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from settings validation and merging.
///
/// Distinct from [`StoreError`]: a validation failure means the merged text
/// was rejected before any persistence was attempted, so the stored
/// instructions are unchanged.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("merged instructions would be empty")]
    EmptyInstructions,

    #[error("invalid instruction text: {0}")]
    InvalidText(String),
}
