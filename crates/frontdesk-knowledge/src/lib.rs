//! Frontdesk knowledge crate - the learned Q&A corpus.
//!
//! Owns ingestion (manual seeds and resolved help requests), relevance-
//! scored search behind a pluggable scorer, usage tracking, and summary
//! statistics.

pub mod engine;
pub mod scorer;

pub use engine::{KnowledgeEngine, KnowledgeSummary};
pub use scorer::{KeywordScorer, RelevanceScorer};
