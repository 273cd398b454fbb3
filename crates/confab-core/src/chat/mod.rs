//! The conversation engine: grounded response production, dialogue
//! orchestration, summarization, and intent routing.

pub mod dialogue;
pub mod producer;
pub mod relevance;
pub mod router;
pub mod summarizer;
pub mod toxicity;

pub use dialogue::{DialogueOrchestrator, DialogueOutcome};
pub use producer::{ProducedResponse, ResponseProducer, GROUNDING_FALLBACK};
pub use relevance::RelevanceValidator;
pub use router::{RoutedReply, UserIntentRouter};
pub use summarizer::ChatSummarizer;
pub use toxicity::ToxicityChecker;

use confab_types::agent::AgentId;
use confab_types::error::StoreError;
use confab_types::generate::GenerateError;

/// Errors surfaced by the engine's inbound operations.
///
/// Per-attempt failures (rejected candidates, recall failures, transport
/// errors inside the retry loop) are recovered internally and never appear
/// here; this type covers the failures a caller must see, such as an
/// unknown agent or a generator failure outside the retry loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("agent '{0}' not found")]
    UnknownAgent(AgentId),

    #[error("agent '{0}' has no instructions")]
    MissingInstructions(AgentId),

    #[error("dialogue cancelled before any turn completed")]
    Cancelled,

    #[error(transparent)]
    Generation(#[from] GenerateError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Classify a short judge verdict as affirmative.
///
/// Affirmative iff the text contains "yes" case-insensitively. Anything
/// else, including empty or malformed output, is negative: the judges
/// fail closed.
pub(crate) fn is_affirmative(verdict: &str) -> bool {
    verdict.to_lowercase().contains("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative_variants() {
        assert!(is_affirmative("Yes"));
        assert!(is_affirmative("yes, it is grounded"));
        assert!(is_affirmative("YES."));
    }

    #[test]
    fn test_ambiguous_output_is_negative() {
        assert!(!is_affirmative("No"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("maybe"));
        assert!(!is_affirmative("the response is relevant"));
    }

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::UnknownAgent(AgentId::new("agent-9"));
        assert_eq!(err.to_string(), "agent 'agent-9' not found");
    }
}
