//! Transcript-to-memory summarization.
//!
//! Condenses a dialogue transcript into a single first-person paragraph
//! from the home agent's perspective -- a lossy but topic-preserving
//! compression suitable for storage as a new memory entry.

use confab_types::agent::AgentId;
use confab_types::generate::GenerateError;
use confab_types::transcript::Transcript;
use tracing::debug;

use crate::generate::{task, BoxGenerator};

/// Summarizes a transcript via the language generator.
pub struct ChatSummarizer<'a> {
    generator: &'a BoxGenerator,
}

impl<'a> ChatSummarizer<'a> {
    pub fn new(generator: &'a BoxGenerator) -> Self {
        Self { generator }
    }

    /// Produce a first-person narrative summary of `transcript` from
    /// `home`'s perspective.
    ///
    /// The transcript is rendered as labeled lines ("Me" for the home
    /// agent, agent ids for everyone else) so the summary can name who was
    /// spoken to. An empty transcript summarizes to an empty string
    /// without invoking the generator.
    pub async fn summarize(
        &self,
        home: &AgentId,
        transcript: &Transcript,
    ) -> Result<String, GenerateError> {
        if transcript.is_empty() {
            return Ok(String::new());
        }

        let rendered = transcript.render_for(home);
        debug!(entries = transcript.len(), "summarizing transcript");

        let output = self.generator.generate(&task::summarize(&rendered)).await?;
        Ok(output.answer()?.trim().to_string())
    }
}
