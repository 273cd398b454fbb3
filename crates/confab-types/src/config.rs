//! Engine configuration.
//!
//! `EngineConfig` controls the retry budget, dialogue length, and recall
//! threshold. Loaded from TOML; all fields have defaults so an empty file
//! (or `EngineConfig::default()`) is a valid configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for the conversation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum generation attempts per response before the fallback is
    /// returned. Must be at least 1.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Number of rounds in an agent-to-agent dialogue (each round is one
    /// turn per agent).
    #[serde(default = "default_dialogue_rounds")]
    pub dialogue_rounds: u32,

    /// Minimum relevance score for a memory to be included in query-ranked
    /// recall.
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f32,

    /// The fixed prompt that opens an agent-to-agent dialogue.
    #[serde(default = "default_opening_prompt")]
    pub opening_prompt: String,
}

fn default_max_retries() -> u32 {
    3
}

fn default_dialogue_rounds() -> u32 {
    5
}

fn default_relevance_threshold() -> f32 {
    0.25
}

fn default_opening_prompt() -> String {
    "Hey, talk to me!".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            dialogue_rounds: default_dialogue_rounds(),
            relevance_threshold: default_relevance_threshold(),
            opening_prompt: default_opening_prompt(),
        }
    }
}
