//! The grounded-response retry loop.
//!
//! `ResponseProducer` drives one agent turn end to end: retrieve memories
//! for the prompt, generate a candidate answer, judge it, and retry with a
//! reformulated prompt until the candidate is accepted or the bounded
//! attempt budget is exhausted.
//!
//! The loop never fails: every per-attempt error (transport, malformed
//! output, rejected candidate, failed judge call) is recovered and counted
//! against the retry budget, and exhaustion yields the fixed fallback text
//! rather than the last invalid candidate.

use confab_types::agent::AgentId;
use tracing::{debug, info, warn};

use crate::generate::{task, BoxGenerator};
use crate::memory::{render_memories, MemoryStore};

use super::relevance::RelevanceValidator;

/// Returned when no candidate could be grounded within the retry budget.
/// Never empty, never the last rejected candidate.
pub const GROUNDING_FALLBACK: &str =
    "Sorry, I couldn't generate a relevant response based on my memories.";

/// One produced agent turn.
#[derive(Debug, Clone)]
pub struct ProducedResponse {
    pub answer: String,
    /// Generation attempts consumed (1..=max_retries).
    pub attempts: u32,
    /// False when `answer` is [`GROUNDING_FALLBACK`].
    pub grounded: bool,
}

/// Retry state machine: ATTEMPT -> VALIDATE -> {ACCEPT | RETRY | EXHAUSTED}.
///
/// Memories are retrieved once per `respond` call and reused across
/// attempts; only the prompt is rewritten between attempts. Each producer
/// instance is independent -- no retry state is shared across agents or
/// sessions.
pub struct ResponseProducer<'a, M: MemoryStore> {
    store: &'a M,
    generator: &'a BoxGenerator,
    max_retries: u32,
}

impl<'a, M: MemoryStore> ResponseProducer<'a, M> {
    /// `max_retries` is clamped to at least one attempt.
    pub fn new(store: &'a M, generator: &'a BoxGenerator, max_retries: u32) -> Self {
        Self {
            store,
            generator,
            max_retries: max_retries.max(1),
        }
    }

    /// Produce a grounded response to `prompt` for the given agent.
    #[tracing::instrument(
        name = "produce_response",
        skip(self, prompt, settings_context),
        fields(agent_id = %agent_id, max_retries = self.max_retries)
    )]
    pub async fn respond(
        &self,
        agent_id: &AgentId,
        prompt: &str,
        settings_context: &str,
    ) -> ProducedResponse {
        // Retrieved once, reused across retries. A recall failure degrades
        // to "no grounding available" rather than aborting the turn.
        let memories = match self.store.recall(agent_id, Some(prompt)).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "memory recall failed, continuing without grounding");
                Vec::new()
            }
        };
        let retrieved = render_memories(&memories);
        let validator = RelevanceValidator::new(self.generator);

        for attempt in 1..=self.max_retries {
            let attempt_prompt = if attempt == 1 {
                prompt.to_string()
            } else {
                format!(
                    "The prompt is: '{prompt}'. The previous attempted response \
was not relevant to the context, let's try again."
                )
            };

            let request = task::agent_exchange(settings_context, &attempt_prompt, &retrieved);
            let candidate = match self.generator.generate(&request).await {
                Ok(output) => match output.answer() {
                    Ok(text) => text.to_string(),
                    Err(err) => {
                        warn!(attempt, error = %err, "generation output unusable");
                        continue;
                    }
                },
                Err(err) => {
                    warn!(attempt, error = %err, "generation attempt failed");
                    continue;
                }
            };

            match validator.validate(prompt, &candidate, &retrieved).await {
                Ok(true) => {
                    debug!(attempt, "candidate accepted");
                    return ProducedResponse {
                        answer: candidate,
                        attempts: attempt,
                        grounded: true,
                    };
                }
                Ok(false) => {
                    info!(attempt, "candidate rejected as ungrounded");
                }
                Err(err) => {
                    warn!(attempt, error = %err, "relevance check failed, counting as rejection");
                }
            }
        }

        info!(attempts = self.max_retries, "retry budget exhausted, returning fallback");
        ProducedResponse {
            answer: GROUNDING_FALLBACK.to_string(),
            attempts: self.max_retries,
            grounded: false,
        }
    }
}
