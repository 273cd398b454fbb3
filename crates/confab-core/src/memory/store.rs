//! MemoryStore trait definition.
//!
//! The engine treats "memory for agent X" as a namespaced, append-only
//! collection behind this stable interface; it never assumes a physical
//! schema. Implementations live in confab-infra (e.g. `SqliteMemoryStore`,
//! `InMemoryStore`). Uses native async fn in traits (RPITIT, Rust 2024
//! edition).

use confab_types::agent::AgentId;
use confab_types::error::StoreError;
use confab_types::memory::MemoryEntry;

/// Port for per-agent long-term memory and instruction persistence.
///
/// Implementations must support safe concurrent independent read/append per
/// agent id; no cross-agent transactions are required. All operations are
/// all-or-nothing from the engine's point of view.
pub trait MemoryStore: Send + Sync {
    /// Retrieve memories for an agent.
    ///
    /// With a query, entries are ranked by text relevance against their
    /// content and only entries whose score exceeds the store's configured
    /// relevance threshold are returned, most relevant first. Without a
    /// query, all entries are returned in store-native order ("all
    /// history", the fallback view).
    fn recall(
        &self,
        agent_id: &AgentId,
        query: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryEntry>, StoreError>> + Send;

    /// Append one memory entry for an agent. Entries are immutable once
    /// appended; the engine never edits or deletes them.
    fn append(
        &self,
        agent_id: &AgentId,
        content: &str,
        toxicity_flag: bool,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Read the agent's current in-context instructions.
    ///
    /// `None` means the agent exists but has no instructions recorded; the
    /// engine treats this as a violated invariant and refuses to chat.
    fn instructions(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Replace the agent's instructions with pre-validated text.
    ///
    /// Callers go through `SettingsMutator`, which guarantees the new text
    /// incorporates the prior instructions and is valid storage text.
    fn set_instructions(
        &self,
        agent_id: &AgentId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
