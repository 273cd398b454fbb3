//! User intent routing.
//!
//! Classifies a single user message as either a settings-mutation request or
//! ordinary chat. The mutation route is detected by a literal in-band phrase
//! and short-circuits generation entirely; the chat route sends the full
//! settings context plus message to the generator.

use confab_types::generate::GenerateError;
use tracing::info;

use crate::generate::{task, BoxGenerator};

/// The literal phrase (matched on the lowercased message) that marks a
/// settings-mutation request.
pub const SETTINGS_TRIGGER: &str = "update your settings";

/// Fixed acknowledgement returned for mutation requests, without invoking
/// generation.
pub const SETTINGS_ACK: &str = "Updating settings";

/// The routed result of one user message.
#[derive(Debug, Clone)]
pub struct RoutedReply {
    pub answer: String,
    /// When present, the caller applies it via `SettingsMutator::apply` and
    /// appends the resulting status to the answer shown to the user.
    pub mutation_directive: Option<String>,
}

/// Classifies and dispatches a single user message.
pub struct UserIntentRouter<'a> {
    generator: &'a BoxGenerator,
}

impl<'a> UserIntentRouter<'a> {
    pub fn new(generator: &'a BoxGenerator) -> Self {
        Self { generator }
    }

    /// Route `message`. On the mutation route the full original message
    /// becomes the directive; otherwise an ordinary conversational answer
    /// is generated under `settings_context`.
    pub async fn route(
        &self,
        message: &str,
        settings_context: &str,
    ) -> Result<RoutedReply, GenerateError> {
        if message.to_lowercase().contains(SETTINGS_TRIGGER) {
            info!("settings-mutation request detected");
            return Ok(RoutedReply {
                answer: SETTINGS_ACK.to_string(),
                mutation_directive: Some(message.to_string()),
            });
        }

        let output = self
            .generator
            .generate(&task::user_chat(settings_context, message))
            .await?;
        Ok(RoutedReply {
            answer: output.answer()?.to_string(),
            mutation_directive: None,
        })
    }
}
