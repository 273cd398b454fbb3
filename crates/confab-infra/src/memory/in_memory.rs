//! In-memory store backend over DashMap.
//!
//! Implements both ports for tests, demos, and embedding-free deployments.
//! Per-agent operations are independently concurrent; only `create_agent`
//! serializes (on the counter) to keep issued ids monotonic.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use confab_core::agent::directory::{AgentDirectory, DEFAULT_INSTRUCTIONS};
use confab_core::memory::MemoryStore;
use confab_types::agent::{Agent, AgentId, Network, NetworkId};
use confab_types::error::StoreError;
use confab_types::memory::MemoryEntry;

use super::rank::rank_entries;

/// DashMap-backed implementation of `MemoryStore` and `AgentDirectory`.
pub struct InMemoryStore {
    networks: DashMap<NetworkId, Network>,
    agents: DashMap<AgentId, Agent>,
    memories: DashMap<AgentId, Vec<MemoryEntry>>,
    agent_count: AtomicU64,
    relevance_threshold: f32,
}

impl InMemoryStore {
    pub fn new(relevance_threshold: f32) -> Self {
        Self {
            networks: DashMap::new(),
            agents: DashMap::new(),
            memories: DashMap::new(),
            agent_count: AtomicU64::new(0),
            relevance_threshold,
        }
    }
}

impl MemoryStore for InMemoryStore {
    async fn recall(
        &self,
        agent_id: &AgentId,
        query: Option<&str>,
    ) -> Result<Vec<MemoryEntry>, StoreError> {
        let entries = self
            .memories
            .get(agent_id)
            .map(|e| e.clone())
            .unwrap_or_default();

        let Some(query) = query else {
            return Ok(entries);
        };

        let ranked = rank_entries(entries, query, self.relevance_threshold);
        debug!(agent_id = %agent_id, hits = ranked.len(), "ranked recall");
        Ok(ranked.into_iter().map(|r| r.entry).collect())
    }

    async fn append(
        &self,
        agent_id: &AgentId,
        content: &str,
        toxicity_flag: bool,
    ) -> Result<(), StoreError> {
        if !self.agents.contains_key(agent_id) {
            return Err(StoreError::AgentNotFound);
        }
        self.memories
            .entry(agent_id.clone())
            .or_default()
            .push(MemoryEntry::new(agent_id.clone(), content, toxicity_flag));
        Ok(())
    }

    async fn instructions(&self, agent_id: &AgentId) -> Result<Option<String>, StoreError> {
        Ok(self.agents.get(agent_id).map(|a| a.instructions.clone()))
    }

    async fn set_instructions(&self, agent_id: &AgentId, text: &str) -> Result<(), StoreError> {
        let mut agent = self.agents.get_mut(agent_id).ok_or(StoreError::AgentNotFound)?;
        agent.instructions = text.to_string();
        Ok(())
    }
}

impl AgentDirectory for InMemoryStore {
    async fn create_network(&self, network: &Network) -> Result<(), StoreError> {
        if self.networks.contains_key(&network.id) {
            return Err(StoreError::Conflict(format!(
                "network '{}' already exists",
                network.id
            )));
        }
        self.networks.insert(network.id.clone(), network.clone());
        Ok(())
    }

    async fn create_agent(&self, network_id: &NetworkId) -> Result<Agent, StoreError> {
        if !self.networks.contains_key(network_id) {
            return Err(StoreError::NetworkNotFound);
        }
        let count = self.agent_count.fetch_add(1, Ordering::SeqCst) + 1;
        let agent = Agent {
            id: AgentId::new(format!("agent-{count}")),
            network_id: network_id.clone(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            toxicity_policy: None,
            created_at: Utc::now(),
        };
        self.agents.insert(agent.id.clone(), agent.clone());
        Ok(agent)
    }

    async fn get_agent(&self, agent_id: &AgentId) -> Result<Option<Agent>, StoreError> {
        Ok(self.agents.get(agent_id).map(|a| a.clone()))
    }
}
