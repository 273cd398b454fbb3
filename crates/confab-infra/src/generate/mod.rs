//! Language-generator implementations.

pub mod fields;
pub mod openai_compat;

pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatGenerator};
