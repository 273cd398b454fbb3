//! Memory port and prompt-rendering helpers.

pub mod store;

pub use store::MemoryStore;

use confab_types::memory::MemoryEntry;

/// Render retrieved memories as a bulleted block for a generation prompt.
///
/// An empty set renders as an explicit marker so the generator (and the
/// relevance judge) can tell "no grounding available" apart from an empty
/// input field.
pub fn render_memories(entries: &[MemoryEntry]) -> String {
    if entries.is_empty() {
        return "(no relevant memories)".to_string();
    }
    entries
        .iter()
        .map(|e| format!("- {}", e.content))
        .collect::<Vec<_>>()
        .join("\n")
}
