//! Memory types for Confab.
//!
//! These types model an agent's long-term memory: free-text entries that
//! persist across conversations. Entries are immutable once created and
//! append-only per agent; the engine never edits or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentId;

/// A single memory entry belonging to exactly one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: Uuid,
    pub agent_id: AgentId,
    /// The remembered fact or experience.
    pub content: String,
    /// Whether the content was judged toxic against the agent's policy
    /// when it was stored.
    pub toxicity_flag: bool,
    pub created_at: DateTime<Utc>,
}

impl MemoryEntry {
    /// Create a new entry timestamped now.
    pub fn new(agent_id: AgentId, content: impl Into<String>, toxicity_flag: bool) -> Self {
        Self {
            id: Uuid::now_v7(),
            agent_id,
            content: content.into(),
            toxicity_flag,
            created_at: Utc::now(),
        }
    }
}

/// A memory entry with its relevance score against a recall query.
///
/// Produced by store implementations when recall is query-ranked. Entries
/// below the configured relevance threshold are filtered out before the
/// engine sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMemory {
    pub entry: MemoryEntry,
    /// Computed relevance score (higher is more relevant).
    pub relevance_score: f32,
}
