//! Input validation helpers shared by the engines and the API surface.

use std::sync::OnceLock;

use regex::Regex;

/// E.164-ish phone pattern: optional leading `+`, 2-15 digits, no leading
/// zero. Spaces and dashes are stripped before matching.
fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone regex"))
}

/// Validate a phone number, tolerating spaces and dashes.
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized: String = phone.chars().filter(|c| *c != ' ' && *c != '-').collect();
    phone_pattern().is_match(&normalized)
}

/// Sanitize a phone number for use as a document key.
///
/// `+` becomes `_`; spaces and dashes are removed.
pub fn sanitize_phone_key(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .map(|c| if c == '+' { '_' } else { c })
        .collect()
}

/// Validate that a text field length falls within `[min, max]` characters.
pub fn is_valid_text_length(text: &str, min: usize, max: usize) -> bool {
    let len = text.chars().count();
    min <= len && len <= max
}
