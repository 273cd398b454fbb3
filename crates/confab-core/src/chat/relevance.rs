//! Generation-backed grounding judge.
//!
//! `RelevanceValidator` decides whether a candidate answer is topically
//! grounded: it must address the prompt and be consistent with the
//! retrieved memories, fabricating nothing beyond them.

use confab_types::generate::GenerateError;
use tracing::debug;

use crate::generate::{task, BoxGenerator};

use super::is_affirmative;

/// Boolean judge over (prompt, candidate answer, retrieved memories).
///
/// The verdict token is affirmative only if it contains "yes"
/// case-insensitively; ambiguous or malformed verdicts reject the
/// candidate. A transport failure propagates to the caller, which counts
/// it against the retry budget.
pub struct RelevanceValidator<'a> {
    generator: &'a BoxGenerator,
}

impl<'a> RelevanceValidator<'a> {
    pub fn new(generator: &'a BoxGenerator) -> Self {
        Self { generator }
    }

    /// Judge whether `response` is grounded for `prompt` given
    /// `retrieved_memories` (already rendered as text).
    pub async fn validate(
        &self,
        prompt: &str,
        response: &str,
        retrieved_memories: &str,
    ) -> Result<bool, GenerateError> {
        let request = task::relevance_check(prompt, response, retrieved_memories);
        let output = self.generator.generate(&request).await?;

        // Fail closed: a missing answer field rejects rather than erroring.
        let verdict = output.answer().unwrap_or("");
        let relevant = is_affirmative(verdict);
        debug!(relevant, verdict, "relevance verdict");
        Ok(relevant)
    }
}
