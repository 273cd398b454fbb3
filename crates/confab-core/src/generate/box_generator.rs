//! BoxGenerator -- object-safe dynamic dispatch wrapper for LanguageGenerator.
//!
//! 1. Define an object-safe `LanguageGeneratorDyn` trait with boxed futures
//! 2. Blanket-impl `LanguageGeneratorDyn` for all `T: LanguageGenerator`
//! 3. `BoxGenerator` wraps `Box<dyn LanguageGeneratorDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use confab_types::generate::{GenerateError, GenerationOutput, GenerationRequest};

use super::generator::LanguageGenerator;

/// Object-safe version of [`LanguageGenerator`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch; a blanket
/// implementation is provided for all types implementing `LanguageGenerator`.
pub trait LanguageGeneratorDyn: Send + Sync {
    fn name(&self) -> &str;

    fn generate_boxed<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerationOutput, GenerateError>> + Send + 'a>>;
}

/// Blanket implementation: any `LanguageGenerator` is a `LanguageGeneratorDyn`.
impl<T: LanguageGenerator> LanguageGeneratorDyn for T {
    fn name(&self) -> &str {
        LanguageGenerator::name(self)
    }

    fn generate_boxed<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerationOutput, GenerateError>> + Send + 'a>> {
        Box::pin(self.generate(request))
    }
}

/// Type-erased language generator.
///
/// Since `LanguageGenerator` uses RPITIT it cannot be a trait object
/// directly; `BoxGenerator` provides equivalent methods that delegate to the
/// inner `LanguageGeneratorDyn` trait object. Components receive their
/// generator through construction (never ambient global state), which is
/// what makes the validator, producer, and summarizer independently
/// testable.
pub struct BoxGenerator {
    inner: Box<dyn LanguageGeneratorDyn + Send + Sync>,
}

impl BoxGenerator {
    /// Wrap a concrete `LanguageGenerator` in a type-erased box.
    pub fn new<T: LanguageGenerator + 'static>(generator: T) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }

    /// Human-readable backend name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Run one generation task and return the requested output fields.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutput, GenerateError> {
        self.inner.generate_boxed(request).await
    }
}
