//! Shared utilities for the deckgen codebase

use regex::Regex;
use std::fmt;

/// A string wrapper that masks its contents in Debug/Display output.
/// Prevents accidental logging of API keys and other secrets.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Intentionally access the raw secret value (for headers, URLs, etc.)
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Derive a filename-safe slug from a topic. Keeps Latin and Cyrillic
/// letters plus digits, collapses everything else into single hyphens.
pub fn slugify(s: &str) -> String {
    let lowered = s.to_lowercase();
    let non_word = Regex::new(r"[^a-z0-9\u{0400}-\u{04FF}]+").expect("valid regex");
    let slug = non_word.replace_all(lowered.trim(), "-");
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "generated".to_string()
    } else {
        slug
    }
}

/// Truncate to at most `max_chars` characters, respecting char boundaries.
/// Used to cap the schema serialization embedded in draft prompts.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
