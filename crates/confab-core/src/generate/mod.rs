//! Language-generation port and task catalogue.

pub mod box_generator;
pub mod generator;
pub mod task;

pub use box_generator::BoxGenerator;
pub use generator::LanguageGenerator;
