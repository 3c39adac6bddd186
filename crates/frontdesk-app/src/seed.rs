//! Starter knowledge for a fresh deployment.

use tracing::info;

use frontdesk_core::error::Result;
use frontdesk_knowledge::KnowledgeEngine;

/// (question, answer, category, keywords)
type SeedEntry = (&'static str, &'static str, &'static str, &'static [&'static str]);

const SEED_ENTRIES: &[SeedEntry] = &[
    (
        "What are your business hours?",
        "We're open Monday-Friday 9 AM-8 PM, Saturday 9 AM-6 PM, and Sunday 10 AM-5 PM.",
        "hours",
        &["hours", "open", "timing", "schedule"],
    ),
    (
        "How much does a women's haircut cost?",
        "Women's haircuts range from $45 to $75 depending on the stylist and hair length.",
        "pricing",
        &["haircut", "women", "price", "cost"],
    ),
    (
        "Do you do hair coloring?",
        "Yes! We offer hair coloring ($80-$150), highlights ($100-$180), and balayage ($150-$250).",
        "services",
        &["coloring", "highlights", "balayage", "dye"],
    ),
    (
        "Where are you located?",
        "We're at 123 Beauty Street, Downtown, near the central metro station with easy parking.",
        "location",
        &["location", "address", "parking", "directions"],
    ),
    (
        "Do you take walk-ins?",
        "Walk-ins are welcome subject to availability; booking ahead guarantees your slot.",
        "booking",
        &["walk-in", "appointment", "booking"],
    ),
    (
        "What is your cancellation policy?",
        "We ask for 24-hour cancellation notice; late arrivals may need to reschedule.",
        "policies",
        &["cancellation", "policy", "reschedule"],
    ),
];

/// Seed the starter entries into an empty knowledge base.
///
/// A non-empty corpus is left untouched so the flag is safe to keep in a
/// service unit file.
pub async fn seed_knowledge(engine: &KnowledgeEngine) -> Result<usize> {
    if !engine.list_all().await?.is_empty() {
        info!("Knowledge base already populated; skipping seed");
        return Ok(0);
    }

    for (question, answer, category, keywords) in SEED_ENTRIES {
        engine
            .add_entry(
                question.to_string(),
                answer.to_string(),
                Some(category.to_string()),
                Some(keywords.iter().map(|k| k.to_string()).collect()),
                None,
            )
            .await?;
    }

    info!(count = SEED_ENTRIES.len(), "Knowledge base seeded");
    Ok(SEED_ENTRIES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontdesk_llm::StubCompletion;
    use frontdesk_store::{DocumentStore, MemoryStore};
    use std::sync::Arc;

    fn engine() -> KnowledgeEngine {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let completion = Arc::new(StubCompletion::with_reply("ok"));
        KnowledgeEngine::new(store, completion)
    }

    #[tokio::test]
    async fn test_seed_into_empty_corpus() {
        let engine = engine();
        let count = seed_knowledge(&engine).await.unwrap();
        assert_eq!(count, SEED_ENTRIES.len());
        assert_eq!(engine.list_all().await.unwrap().len(), SEED_ENTRIES.len());
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_populated() {
        let engine = engine();
        seed_knowledge(&engine).await.unwrap();
        let count = seed_knowledge(&engine).await.unwrap();
        assert_eq!(count, 0);
        assert_eq!(engine.list_all().await.unwrap().len(), SEED_ENTRIES.len());
    }

    #[tokio::test]
    async fn test_seeded_entries_are_searchable() {
        let engine = engine();
        seed_knowledge(&engine).await.unwrap();
        let results = engine.search("haircut", 5).await.unwrap();
        assert!(!results.is_empty());
        assert!(results[0].question.contains("haircut"));
    }
}
