//! Prompt construction for the receptionist agent.

use frontdesk_core::types::KnowledgeEntry;

/// Fixed string the completion capability must return when it cannot
/// answer confidently. Its presence anywhere in the reply triggers
/// escalation.
pub const NEEDS_HELP_SENTINEL: &str = "NEEDS_HELP";

/// Greeting sent when a caller opens a session.
pub fn greeting(business_name: &str) -> String {
    format!(
        "Hello! Welcome to {}. How can I help you today?",
        business_name
    )
}

/// Message returned to the customer when their question is escalated.
pub fn escalation_message() -> &'static str {
    "Let me check with my supervisor and get back to you with the most \
     accurate information. I'll text you the answer shortly. Can I confirm \
     your phone number?"
}

/// Fallback when the escalation itself cannot be recorded.
pub fn supervisor_unreachable_message() -> &'static str {
    "I'm having trouble connecting to my supervisor. Please call us back shortly."
}

/// Build the system instruction embedding the retrieved knowledge context
/// and the sentinel contract.
pub fn build_system_prompt(business_name: &str, entries: &[KnowledgeEntry]) -> String {
    format!(
        "You are an AI assistant for {}.\n\
         You have the following knowledge:\n\n\
         {}\n\n\
         If you can confidently answer the question using your knowledge, \
         provide the answer.\n\
         If you cannot answer confidently, respond with exactly: \"{}\"",
        business_name,
        knowledge_context(entries),
        NEEDS_HELP_SENTINEL
    )
}

fn knowledge_context(entries: &[KnowledgeEntry]) -> String {
    if entries.is_empty() {
        return "No additional knowledge available.".to_string();
    }

    entries
        .iter()
        .map(|entry| format!("Q: {}\nA: {}", entry.question, entry.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}
