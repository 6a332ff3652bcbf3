use async_trait::async_trait;

use crate::error::ProviderError;

/// One generative text backend. Implementations request a JSON-biased
/// response where the API supports it and never retry internally:
/// retry/fallback is the stage executor's responsibility.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError>;
}

/// The fixed priority list a stage executor iterates: primary first, then
/// secondary. Either slot may be empty when no credential is configured.
pub struct ProviderSet {
    pub primary: Option<Box<dyn Provider>>,
    pub secondary: Option<Box<dyn Provider>>,
}

impl ProviderSet {
    /// No live backends at all; every stage goes straight to its heuristic.
    pub fn offline() -> Self {
        Self {
            primary: None,
            secondary: None,
        }
    }

    /// Providers in attempt order.
    pub fn ordered(&self) -> impl Iterator<Item = &dyn Provider> {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .map(|p| p.as_ref())
    }
}

/// Deterministic provider used for --dry-run. Returns canned responses
/// keyed on which stage prompt is calling, wrapped in the code fences real
/// models tend to emit so the extractor path is exercised too.
pub struct MockProvider;

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        if user_prompt.contains("Refine the provided deck") {
            // Review stage: echo a trimmed deck.
            Ok(r#"```json
{"slides": [
  {"layout_key": "Title Slide", "fields": {"title": "Mock Deck", "subtitle": "Generated offline"}},
  {"layout_key": "Summary / Thank You Slide", "fields": {"title": "Summary", "points": ["One", "Two"], "thanks": "Thanks!"}}
]}
```"#
                .to_string())
        } else if user_prompt.contains("key 'slides'") {
            // Draft stage
            Ok(r#"```json
{"slides": [
  {"layout_key": "Title Slide", "fields": {"title": "Mock Deck", "subtitle": "Generated offline"}},
  {"layout_key": "Summary / Thank You Slide", "fields": {"title": "Summary", "points": ["One", "Two"], "thanks": "Thanks!"}}
]}
```"#
                .to_string())
        } else if user_prompt.contains("key 'outline'") {
            // Plan stage
            Ok(r#"```json
{"outline": [
  {"layout_key": "Title Slide", "title": "Mock Deck"},
  {"layout_key": "Summary / Thank You Slide", "title": "Summary"}
]}
```"#
                .to_string())
        } else {
            Ok(r#"{"status": "mock"}"#.to_string())
        }
    }
}
