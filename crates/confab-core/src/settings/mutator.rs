//! Merging user suggestions into an agent's instructions.
//!
//! Mutation is append-only: the prior instruction text is always preserved
//! in full and the suggestion appended as an additional clause. The merged
//! text is validated before any write, and `apply` is atomic -- on any
//! failure the stored instructions are unchanged and a structured status is
//! returned instead of an error.

use std::fmt;

use confab_types::agent::AgentId;
use confab_types::error::SettingsError;
use tracing::{info, warn};

use crate::memory::MemoryStore;

/// Outcome of a settings mutation, surfaced to the end user as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Applied,
    Failed(String),
}

impl UpdateStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateStatus::Applied)
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStatus::Applied => write!(f, "Success"),
            UpdateStatus::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}

/// Merge a suggestion into existing instructions.
///
/// The old text is kept verbatim as a prefix and the suggestion appended as
/// a suffix; merging never shortens or drops the old text. The merged text
/// must be valid storage text or the merge is rejected.
pub fn merge(old: &str, suggestion: &str) -> Result<String, SettingsError> {
    let merged = format!("{old}\n{suggestion}");
    validate_storage_text(&merged)?;
    Ok(merged)
}

/// Reject text the store cannot represent: empty text would violate the
/// agent invariant, and NUL bytes are not valid in stored text.
///
/// Guards every mutation of stored text, instructions and memory content
/// alike; callers skip the write when validation fails.
pub(crate) fn validate_storage_text(text: &str) -> Result<(), SettingsError> {
    if text.trim().is_empty() {
        return Err(SettingsError::EmptyInstructions);
    }
    if text.contains('\0') {
        return Err(SettingsError::InvalidText("contains NUL byte".to_string()));
    }
    Ok(())
}

/// Applies settings mutations against a memory store.
pub struct SettingsMutator<'a, M: MemoryStore> {
    store: &'a M,
}

impl<'a, M: MemoryStore> SettingsMutator<'a, M> {
    pub fn new(store: &'a M) -> Self {
        Self { store }
    }

    /// Read, merge, and persist. Every failure (read, validation, write)
    /// comes back as `UpdateStatus::Failed` so the caller can surface it
    /// without crashing the turn.
    #[tracing::instrument(name = "apply_settings", skip(self, suggestion), fields(agent_id = %agent_id))]
    pub async fn apply(&self, agent_id: &AgentId, suggestion: &str) -> UpdateStatus {
        let old = match self.store.instructions(agent_id).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!("agent has no stored instructions");
                return UpdateStatus::Failed("agent has no stored instructions".to_string());
            }
            Err(err) => {
                warn!(error = %err, "failed to read instructions");
                return UpdateStatus::Failed(err.to_string());
            }
        };

        let merged = match merge(&old, suggestion) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "settings merge rejected");
                return UpdateStatus::Failed(err.to_string());
            }
        };

        match self.store.set_instructions(agent_id, &merged).await {
            Ok(()) => {
                info!("instructions updated");
                UpdateStatus::Applied
            }
            Err(err) => {
                warn!(error = %err, "failed to persist instructions");
                UpdateStatus::Failed(err.to_string())
            }
        }
    }
}
