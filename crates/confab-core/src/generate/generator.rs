//! LanguageGenerator trait definition.
//!
//! This is the core abstraction over whatever produces text: given a task
//! description, named input fields, and the names of the expected output
//! fields, it returns a map of output field values. The engine requires
//! determinism in contract shape only, never in content.

use confab_types::generate::{GenerateError, GenerationOutput, GenerationRequest};

/// Trait for language-generation backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The engine
/// holds generators behind [`super::BoxGenerator`] so implementations can be
/// selected at runtime and swapped for scripted doubles in tests.
///
/// Any invocation may fail on transport/provider errors; such failures
/// propagate as [`GenerateError`] to the immediate caller and are always
/// recoverable there -- they never crash an orchestrator.
///
/// Implementations live in confab-infra (e.g. `OpenAiCompatGenerator`).
pub trait LanguageGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "openai-compatible").
    fn name(&self) -> &str;

    /// Run one generation task and return the requested output fields.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<GenerationOutput, GenerateError>> + Send;
}
