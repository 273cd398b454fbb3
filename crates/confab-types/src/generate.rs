//! Generation request/response types.
//!
//! The engine talks to its language-generation capability through a single
//! contract shape: a task description, ordered named input fields, and a set
//! of named output fields (always including a reasoning trace and an
//! answer-class field). The engine is agnostic to how the capability is
//! implemented; it only relies on this shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the reasoning-trace output field every task requests.
pub const REASONING_FIELD: &str = "reasoning";

/// Name of the free-text answer output field used by most tasks.
pub const ANSWER_FIELD: &str = "answer";

/// A named input field passed to the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    pub value: String,
}

impl InputField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A structured request to the language generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Short stable task name (e.g. "chat", "relevance-check").
    pub task: String,
    /// What the generator is being asked to do.
    pub description: String,
    /// Ordered named inputs.
    pub inputs: Vec<InputField>,
    /// Names of the fields the generator must produce.
    pub outputs: Vec<String>,
}

impl GenerationRequest {
    pub fn new(task: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            description: description.into(),
            inputs: Vec::new(),
            outputs: vec![REASONING_FIELD.to_string(), ANSWER_FIELD.to_string()],
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.push(InputField::new(name, value));
        self
    }

    /// Replace the default output field set.
    pub fn with_outputs(mut self, outputs: &[&str]) -> Self {
        self.outputs = outputs.iter().map(|s| (*s).to_string()).collect();
        self
    }
}

/// Named output fields produced by the generator for one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOutput {
    fields: BTreeMap<String, String>,
}

impl GenerationOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The answer field, or an error if the generator omitted it.
    pub fn answer(&self) -> Result<&str, GenerateError> {
        self.field(ANSWER_FIELD)
            .ok_or_else(|| GenerateError::MissingField(ANSWER_FIELD.to_string()))
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.field(REASONING_FIELD)
    }
}

/// Errors from language-generation operations.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Transport/provider failure (network, HTTP status, provider error body).
    #[error("generator transport error: {0}")]
    Transport(String),

    /// The provider replied but the body could not be decoded.
    #[error("malformed generator output: {0}")]
    MalformedOutput(String),

    /// The provider produced output but a requested field is absent.
    #[error("generator output missing field '{0}'")]
    MissingField(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid generation request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_default_outputs() {
        let req = GenerationRequest::new("chat", "Chat with the user.");
        assert_eq!(req.outputs, vec!["reasoning", "answer"]);
    }

    #[test]
    fn test_request_builder_preserves_input_order() {
        let req = GenerationRequest::new("chat", "desc")
            .with_input("settings_context", "be nice")
            .with_input("prompt", "hello");
        assert_eq!(req.inputs[0].name, "settings_context");
        assert_eq!(req.inputs[1].name, "prompt");
    }

    #[test]
    fn test_output_answer_present() {
        let out = GenerationOutput::new()
            .with_field("reasoning", "thinking...")
            .with_field("answer", "hi!");
        assert_eq!(out.answer().unwrap(), "hi!");
        assert_eq!(out.reasoning(), Some("thinking..."));
    }

    #[test]
    fn test_output_answer_missing_is_error() {
        let out = GenerationOutput::new().with_field("reasoning", "hmm");
        let err = out.answer().unwrap_err();
        assert!(matches!(err, GenerateError::MissingField(f) if f == "answer"));
    }

    #[test]
    fn test_generate_error_display() {
        let err = GenerateError::Transport("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
