//! Toxicity judge for content about to be persisted.
//!
//! Checks generated content against an agent's toxicity policy before it is
//! stored, driving the `toxicity_flag` on the resulting memory entry.

use confab_types::generate::GenerateError;
use tracing::debug;

use crate::generate::{task, BoxGenerator};

use super::is_affirmative;

/// Generation-backed boolean toxicity judge.
///
/// Uses the same substring-"yes" verdict rule as the relevance judge:
/// content is flagged only on an affirmative verdict.
pub struct ToxicityChecker<'a> {
    generator: &'a BoxGenerator,
}

impl<'a> ToxicityChecker<'a> {
    pub fn new(generator: &'a BoxGenerator) -> Self {
        Self { generator }
    }

    /// True if `content` violates `policy`.
    pub async fn check(&self, content: &str, policy: &str) -> Result<bool, GenerateError> {
        let request = task::toxicity_check(content, policy);
        let output = self.generator.generate(&request).await?;
        let toxic = is_affirmative(output.answer().unwrap_or(""));
        debug!(toxic, "toxicity verdict");
        Ok(toxic)
    }
}
