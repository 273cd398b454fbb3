//! SQLite store implementing both ports.
//!
//! Raw sqlx queries with private Row structs for SQLite-to-domain mapping,
//! reads on the reader pool and writes on the single-connection writer pool.
//! Queried recall loads the agent's entries and ranks them in process; the
//! ranking lives in [`crate::memory::rank`] so the in-memory backend shares
//! the exact same behavior.

use chrono::{DateTime, Utc};
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use confab_core::agent::directory::{AgentDirectory, DEFAULT_INSTRUCTIONS};
use confab_core::memory::MemoryStore;
use confab_types::agent::{Agent, AgentId, Network, NetworkId};
use confab_types::error::StoreError;
use confab_types::memory::MemoryEntry;

use crate::memory::rank::rank_entries;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MemoryStore` and `AgentDirectory`.
pub struct SqliteMemoryStore {
    pool: DatabasePool,
    relevance_threshold: f32,
}

impl SqliteMemoryStore {
    pub fn new(pool: DatabasePool, relevance_threshold: f32) -> Self {
        Self {
            pool,
            relevance_threshold,
        }
    }

    async fn load_entries(&self, agent_id: &AgentId) -> Result<Vec<MemoryEntry>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, agent_id, content, toxicity_flag, created_at
             FROM memories WHERE agent_id = ? ORDER BY created_at, id",
        )
        .bind(agent_id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let entry_row =
                MemoryRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            entries.push(entry_row.into_entry()?);
        }
        Ok(entries)
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MemoryRow {
    id: String,
    agent_id: String,
    content: String,
    toxicity_flag: i64,
    created_at: String,
}

impl MemoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            content: row.try_get("content")?,
            toxicity_flag: row.try_get("toxicity_flag")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_entry(self) -> Result<MemoryEntry, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid memory id: {e}")))?;
        Ok(MemoryEntry {
            id,
            agent_id: AgentId::new(self.agent_id),
            content: self.content,
            toxicity_flag: self.toxicity_flag != 0,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct AgentRow {
    agent_id: String,
    network_id: String,
    instructions: String,
    toxicity_policy: Option<String>,
    created_at: String,
}

impl AgentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            agent_id: row.try_get("agent_id")?,
            network_id: row.try_get("network_id")?,
            instructions: row.try_get("instructions")?,
            toxicity_policy: row.try_get("toxicity_policy")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_agent(self) -> Result<Agent, StoreError> {
        Ok(Agent {
            id: AgentId::new(self.agent_id),
            network_id: NetworkId::new(self.network_id),
            instructions: self.instructions,
            toxicity_policy: self.toxicity_policy,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// MemoryStore implementation
// ---------------------------------------------------------------------------

impl MemoryStore for SqliteMemoryStore {
    async fn recall(
        &self,
        agent_id: &AgentId,
        query: Option<&str>,
    ) -> Result<Vec<MemoryEntry>, StoreError> {
        let entries = self.load_entries(agent_id).await?;

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
        let entry = MemoryEntry::new(agent_id.clone(), content, toxicity_flag);
        let result = sqlx::query(
            "INSERT INTO memories (id, agent_id, content, toxicity_flag, created_at)
             SELECT ?, agent_id, ?, ?, ? FROM agents WHERE agent_id = ?",
        )
        .bind(entry.id.to_string())
        .bind(&entry.content)
        .bind(if entry.toxicity_flag { 1i64 } else { 0i64 })
        .bind(format_datetime(&entry.created_at))
        .bind(agent_id.as_str())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AgentNotFound);
        }
        Ok(())
    }

    async fn instructions(&self, agent_id: &AgentId) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT instructions FROM agents WHERE agent_id = ?")
            .bind(agent_id.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        row.map(|r| r.try_get::<String, _>("instructions"))
            .transpose()
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn set_instructions(&self, agent_id: &AgentId, text: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE agents SET instructions = ? WHERE agent_id = ?")
            .bind(text)
            .bind(agent_id.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AgentNotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AgentDirectory implementation
// ---------------------------------------------------------------------------

impl AgentDirectory for SqliteMemoryStore {
    async fn create_network(&self, network: &Network) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO networks (network_id, name, description, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(network.id.as_str())
        .bind(&network.name)
        .bind(&network.description)
        .bind(format_datetime(&network.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "network '{}' already exists",
                network.id
            )));
        }
        Ok(())
    }

    async fn create_agent(&self, network_id: &NetworkId) -> Result<Agent, StoreError> {
        // Count and insert inside one transaction so concurrently issued
        // ids stay unique (the writer pool serializes anyway).
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let network_exists: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM networks WHERE network_id = ?")
                .bind(network_id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
        if network_exists.is_none() {
            return Err(StoreError::NetworkNotFound);
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM agents")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let agent = Agent {
            id: AgentId::new(format!("agent-{}", count + 1)),
            network_id: network_id.clone(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            toxicity_policy: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO agents (agent_id, network_id, instructions, toxicity_policy, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(agent.id.as_str())
        .bind(agent.network_id.as_str())
        .bind(&agent.instructions)
        .bind(&agent.toxicity_policy)
        .bind(format_datetime(&agent.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(agent)
    }

    async fn get_agent(&self, agent_id: &AgentId) -> Result<Option<Agent>, StoreError> {
        let row = sqlx::query(
            "SELECT agent_id, network_id, instructions, toxicity_policy, created_at
             FROM agents WHERE agent_id = ?",
        )
        .bind(agent_id.as_str())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let agent_row =
                    AgentRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(agent_row.into_agent()?))
            }
            None => Ok(None),
        }
    }
}
