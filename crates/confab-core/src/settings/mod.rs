//! Settings (in-context instructions) mutation.

pub mod mutator;

pub use mutator::{merge, SettingsMutator, UpdateStatus};
