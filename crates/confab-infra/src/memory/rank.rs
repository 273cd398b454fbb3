//! Token-overlap relevance ranking for memory recall.
//!
//! Both store backends rank recalled entries against the query with the same
//! deterministic score: the fraction of distinct query tokens that also
//! appear in the entry content, case-insensitive, split on
//! non-alphanumerics. Scores are in `[0, 1]`; entries at or below the
//! configured threshold are dropped and the survivors are returned most
//! relevant first.

use std::collections::HashSet;

use confab_types::memory::{MemoryEntry, RankedMemory};

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Score `content` against `query`: the fraction of distinct query tokens
/// present in the content. An empty query scores zero everywhere.
pub fn relevance_score(query: &str, content: &str) -> f32 {
    let query_tokens = tokens(query);
    if query_tokens.is_empty() {
        return 0.0;
    }
    let content_tokens = tokens(content);
    let hits = query_tokens
        .iter()
        .filter(|t| content_tokens.contains(*t))
        .count();
    hits as f32 / query_tokens.len() as f32
}

/// Rank `entries` against `query`, drop those scoring at or below
/// `threshold`, and return the rest most relevant first.
///
/// Ties keep the input order, which for both backends is insertion order
/// (oldest first).
pub fn rank_entries(entries: Vec<MemoryEntry>, query: &str, threshold: f32) -> Vec<RankedMemory> {
    let mut ranked: Vec<RankedMemory> = entries
        .into_iter()
        .map(|entry| RankedMemory {
            relevance_score: relevance_score(query, &entry.content),
            entry,
        })
        .filter(|r| r.relevance_score > threshold)
        .collect();
    ranked.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
