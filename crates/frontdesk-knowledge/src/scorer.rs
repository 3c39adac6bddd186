//! Relevance scoring behind a narrow seam.
//!
//! The default scorer is deliberately simple substring matching; keeping it
//! behind a trait lets a later embedding-based scorer slot in without
//! touching the engine's ranking or limit logic.

use frontdesk_core::types::KnowledgeEntry;

/// Scores a knowledge entry against a query. Higher is more relevant;
/// zero means "not a match".
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, entry: &KnowledgeEntry, query: &str) -> u32;
}

/// Substring/keyword scorer:
/// - +3 when the whole query appears (case-insensitive) in the question,
/// - +1 for each entry keyword that appears (case-insensitive) in the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordScorer;

impl KeywordScorer {
    pub fn new() -> Self {
        Self
    }
}

impl RelevanceScorer for KeywordScorer {
    fn score(&self, entry: &KnowledgeEntry, query: &str) -> u32 {
        let query_lower = query.to_lowercase();
        let mut score = 0;

        if entry.question.to_lowercase().contains(&query_lower) {
            score += 3;
        }

        for keyword in &entry.keywords {
            if query_lower.contains(&keyword.to_lowercase()) {
                score += 1;
            }
        }

        score
    }
}
