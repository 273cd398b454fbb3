//! Agent and network identity types.
//!
//! Agent identifiers are issued by the agent directory (derived from the
//! current agent count), so both id types are opaque string newtypes rather
//! than UUIDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Opaque identifier for an agent, unique within a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// Opaque identifier for a network grouping of agents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkId(pub String);

impl NetworkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NetworkId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// A persona with persistent instructions and private memory.
///
/// `instructions` is the in-context behavioral prompt prepended to every
/// generation call for the agent. It is never null: agents are seeded with
/// default instructions at creation, and updates that would clear it are
/// rejected before persistence. Mutation is append/merge only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// The network this agent belongs to.
    pub network_id: NetworkId,
    /// In-context behavioral prompt. Always non-empty.
    pub instructions: String,
    /// Optional policy text the toxicity judge checks content against.
    pub toxicity_policy: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A logical grouping of agents.
///
/// The network does not own agent lifecycle beyond the grouping relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
