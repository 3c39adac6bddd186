//! The knowledge engine.
//!
//! Entries are never deleted; the only mutation after creation is the
//! usage counter. Ingestion failures propagate to the caller only when
//! ingestion is the primary operation — when invoked as a side effect of
//! request resolution the escalation engine contains the error.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use frontdesk_core::error::Result;
use frontdesk_core::types::{HelpRequest, KnowledgeEntry, KnowledgeSource};
use frontdesk_core::FrontdeskError;
use frontdesk_llm::{CompletionClient, MAX_KEYWORDS};
use frontdesk_store::{collections, DocumentStore};

use crate::scorer::{KeywordScorer, RelevanceScorer};

/// Default result cap for `search`.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Summary statistics over the whole corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSummary {
    pub total_entries: usize,
    pub total_usage: u64,
    /// Entry counts per category; entries without one fall under
    /// "uncategorized".
    pub categories: BTreeMap<String, usize>,
    /// Top five entries by usage count.
    pub most_used: Vec<KnowledgeEntry>,
}

/// Owns the learned Q&A corpus.
pub struct KnowledgeEngine {
    store: Arc<dyn DocumentStore>,
    completion: Arc<dyn CompletionClient>,
    scorer: Box<dyn RelevanceScorer>,
}

impl KnowledgeEngine {
    pub fn new(store: Arc<dyn DocumentStore>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            store,
            completion,
            scorer: Box::new(KeywordScorer::new()),
        }
    }

    /// Replace the relevance scorer.
    pub fn with_scorer(mut self, scorer: Box<dyn RelevanceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Add an entry to the knowledge base.
    ///
    /// When no keywords are supplied they are derived from the question and
    /// answer via the completion capability; derivation failure degrades to
    /// an empty keyword set rather than failing ingestion.
    pub async fn add_entry(
        &self,
        question: String,
        answer: String,
        category: Option<String>,
        keywords: Option<Vec<String>>,
        source_request_id: Option<Uuid>,
    ) -> Result<KnowledgeEntry> {
        let keywords = match keywords {
            Some(keywords) if !keywords.is_empty() => {
                keywords.into_iter().take(MAX_KEYWORDS).collect()
            }
            _ => {
                let text = format!("{} {}", question, answer);
                match self.completion.extract_keywords(&text).await {
                    Ok(keywords) => keywords,
                    Err(e) => {
                        warn!(error = %e, "Keyword extraction failed; storing without keywords");
                        Vec::new()
                    }
                }
            }
        };

        let source = if source_request_id.is_some() {
            KnowledgeSource::Supervisor
        } else {
            KnowledgeSource::Manual
        };

        let entry = KnowledgeEntry::new(
            question,
            answer,
            category,
            keywords,
            source,
            source_request_id,
        );

        self.store
            .set(
                collections::KNOWLEDGE_BASE,
                &entry.id.to_string(),
                serde_json::to_value(&entry)?,
            )
            .await?;

        info!(entry_id = %entry.id, source = %entry.source, "Knowledge entry created");
        Ok(entry)
    }

    /// Ingest the learned answer from a resolved help request.
    pub async fn add_from_resolved_request(&self, request: &HelpRequest) -> Result<KnowledgeEntry> {
        let answer = request.supervisor_answer.clone().ok_or_else(|| {
            FrontdeskError::Validation(format!("request {} has no supervisor answer", request.id))
        })?;

        self.add_entry(request.question.clone(), answer, None, None, Some(request.id))
            .await
    }

    /// Fetch a single entry.
    pub async fn get(&self, id: Uuid) -> Result<Option<KnowledgeEntry>> {
        let document = self
            .store
            .get(collections::KNOWLEDGE_BASE, &id.to_string())
            .await?;
        match document {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// All entries, most recently used first (entries never used fall back
    /// to creation time).
    pub async fn list_all(&self) -> Result<Vec<KnowledgeEntry>> {
        let documents = self.store.list_all(collections::KNOWLEDGE_BASE).await?;
        let mut entries = Vec::with_capacity(documents.len());
        for (_, document) in documents {
            entries.push(serde_json::from_value::<KnowledgeEntry>(document)?);
        }
        entries.sort_by_key(|e| std::cmp::Reverse(e.last_used_at.unwrap_or(e.created_at)));
        Ok(entries)
    }

    /// Relevance-ranked search.
    ///
    /// Entries scoring zero are excluded; ties keep the `list_all` order
    /// (most recently used first) since the sort is stable.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<KnowledgeEntry>> {
        let entries = self.list_all().await?;

        let mut scored: Vec<(u32, KnowledgeEntry)> = entries
            .into_iter()
            .filter_map(|entry| {
                let score = self.scorer.score(&entry, query);
                (score > 0).then_some((score, entry))
            })
            .collect();

        scored.sort_by_key(|(score, _)| std::cmp::Reverse(*score));
        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, entry)| entry)
            .collect())
    }

    /// Record one use of an entry.
    ///
    /// Returns `false` (never an error) when the entry is absent or the
    /// write fails; usage tracking is a secondary effect.
    pub async fn increment_usage(&self, id: Uuid) -> bool {
        let entry = match self.get(id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return false,
            Err(e) => {
                warn!(entry_id = %id, error = %e, "Usage increment read failed");
                return false;
            }
        };

        let now = Utc::now();
        let patch = serde_json::json!({
            "times_used": entry.times_used + 1,
            "last_used_at": now,
            "updated_at": now,
        });

        match self
            .store
            .update(collections::KNOWLEDGE_BASE, &id.to_string(), patch)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(entry_id = %id, error = %e, "Usage increment write failed");
                false
            }
        }
    }

    /// Summary statistics computed over the whole corpus.
    pub async fn summary(&self) -> Result<KnowledgeSummary> {
        let entries = self.list_all().await?;

        let total_entries = entries.len();
        let total_usage = entries.iter().map(|e| e.times_used).sum();

        let mut categories: BTreeMap<String, usize> = BTreeMap::new();
        for entry in &entries {
            let category = entry
                .category
                .clone()
                .unwrap_or_else(|| "uncategorized".to_string());
            *categories.entry(category).or_insert(0) += 1;
        }

        let mut most_used = entries;
        most_used.sort_by_key(|e| std::cmp::Reverse(e.times_used));
        most_used.truncate(5);

        Ok(KnowledgeSummary {
            total_entries,
            total_usage,
            categories,
            most_used,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
