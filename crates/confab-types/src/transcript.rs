//! Transcript types for agent-to-agent dialogue sessions.
//!
//! A transcript is the ordered, append-only record of prompt/response pairs
//! produced during one dialogue session. It is not persisted beyond
//! summarization: the summary becomes a memory entry for the participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// One produced (prompt, response) pair, tagged with the speaking agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
    /// The agent that produced `response`.
    pub speaker: AgentId,
    /// The prompt that agent was responding to.
    pub prompt: String,
    pub response: String,
}

/// Ordered sequence of transcript entries, scoped to one dialogue session.
///
/// Entries are immutable once appended; cancellation of an in-flight turn
/// simply means its entry is never appended, so no rollback is ever needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a produced turn, timestamped now.
    pub fn push(&mut self, speaker: AgentId, prompt: impl Into<String>, response: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            timestamp: Utc::now(),
            speaker,
            prompt: prompt.into(),
            response: response.into(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the transcript as labeled lines from `home`'s perspective.
    ///
    /// The home agent's turns are labeled "Me"; every other speaker is
    /// labeled by its agent id. Non-home prompts are included so the
    /// summarizer sees what each agent was asked.
    pub fn render_for(&self, home: &AgentId) -> String {
        let mut rendered = String::new();
        for entry in &self.entries {
            if &entry.speaker == home {
                rendered.push_str(&format!("Me: {}\n\n", entry.response));
            } else {
                rendered.push_str(&format!(
                    "Agent {id}: (asked: {prompt})\nAgent {id}: {response}\n\n",
                    id = entry.speaker,
                    prompt = entry.prompt,
                    response = entry.response,
                ));
            }
        }
        rendered
    }

    /// Speakers other than `home`, in order of first appearance.
    pub fn partners_of(&self, home: &AgentId) -> Vec<AgentId> {
        let mut partners: Vec<AgentId> = Vec::new();
        for entry in &self.entries {
            if &entry.speaker != home && !partners.contains(&entry.speaker) {
                partners.push(entry.speaker.clone());
            }
        }
        partners
    }
}
