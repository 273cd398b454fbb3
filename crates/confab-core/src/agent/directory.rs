//! AgentDirectory trait definition.
//!
//! Provisioning and lookup of agents and networks. Split from
//! [`crate::memory::MemoryStore`] so a store backend can implement either
//! concern independently; the SQLite and in-memory backends implement both.

use confab_types::agent::{Agent, AgentId, Network, NetworkId};
use confab_types::error::StoreError;

/// Instructions seeded at agent creation.
///
/// Every agent has non-empty instructions from birth (updates that would
/// clear them are rejected), so creation installs this default.
pub const DEFAULT_INSTRUCTIONS: &str =
    "You are a friendly agent. Chat naturally, stay grounded in your own \
memories, and never invent experiences you do not have.";

/// Port for agent and network provisioning.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait AgentDirectory: Send + Sync {
    /// Register a network grouping.
    fn create_network(
        &self,
        network: &Network,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Create a new agent in a network.
    ///
    /// The implementation issues a monotonic identifier derived from the
    /// current agent count and seeds [`DEFAULT_INSTRUCTIONS`]. Agents are
    /// never deleted.
    fn create_agent(
        &self,
        network_id: &NetworkId,
    ) -> impl std::future::Future<Output = Result<Agent, StoreError>> + Send;

    /// Look up an agent by id.
    fn get_agent(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Option<Agent>, StoreError>> + Send;
}
