//! The per-stage execution ladder: primary provider, secondary provider,
//! deterministic heuristic.
//!
//! Each live attempt consumes one budget unit; the heuristic consumes
//! nothing and never fails. Failures are per-attempt values inspected here,
//! never propagated upward.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::budget::CallBudget;
use crate::deck::{Deck, Slide};
use crate::error::AttemptError;
use crate::extract::extract_json;
use crate::llm::client::ProviderSet;
use crate::llm::prompts;

/// The three content-production stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Plan,
    Draft,
    Review,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Plan => "plan",
            Stage::Draft => "draft",
            Stage::Review => "review",
        }
    }

    /// Budget units required before this stage attempts any live call.
    /// Plan reserves a unit for Draft; Draft and Review need only their own.
    pub fn min_budget(self) -> u32 {
        match self {
            Stage::Plan => 2,
            Stage::Draft | Stage::Review => 1,
        }
    }
}

/// Run one stage: iterate the provider priority list, short-circuit on the
/// first successful parse, fall back to the stage heuristic otherwise.
pub async fn run_stage<T, P, F>(
    stage: Stage,
    providers: &ProviderSet,
    budget: &mut CallBudget,
    user_prompt: &str,
    parse: P,
    heuristic: F,
) -> T
where
    P: Fn(&str) -> Result<T, AttemptError>,
    F: FnOnce() -> T,
{
    if !budget.has(stage.min_budget()) {
        info!(
            "{} stage: call budget exhausted ({} left, {} required), using heuristic",
            stage.name(),
            budget.remaining(),
            stage.min_budget()
        );
        return heuristic();
    }

    for provider in providers.ordered() {
        if !budget.try_consume() {
            break;
        }
        debug!("{} stage: attempting provider '{}'", stage.name(), provider.name());
        let attempt = match provider.generate(prompts::SYSTEM_PROMPT, user_prompt).await {
            Ok(text) => parse(extract_json(&text)),
            Err(e) => Err(e.into()),
        };
        match attempt {
            Ok(value) => {
                info!("{} stage: provider '{}' succeeded", stage.name(), provider.name());
                return value;
            }
            Err(e) => {
                warn!(
                    "{} stage: provider '{}' attempt failed: {}",
                    stage.name(),
                    provider.name(),
                    e
                );
            }
        }
    }

    info!("{} stage: all providers exhausted, using heuristic", stage.name());
    heuristic()
}

/// Maximum bullet items kept per list field by the review heuristic.
const MAX_BULLET_ITEMS: usize = 6;
/// Maximum words kept per bullet item.
const MAX_BULLET_WORDS: usize = 8;

fn trim_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        text.to_string()
    } else {
        words[..max_words].join(" ")
    }
}

fn trim_slide_bullets(slide: &mut Slide) {
    for value in slide.fields.values_mut() {
        let Some(items) = value.as_array() else {
            continue;
        };
        if !items.iter().all(Value::is_string) {
            continue;
        }
        let trimmed: Vec<Value> = items
            .iter()
            .take(MAX_BULLET_ITEMS)
            .map(|item| {
                Value::String(trim_words(item.as_str().unwrap_or_default(), MAX_BULLET_WORDS))
            })
            .collect();
        *value = Value::Array(trimmed);
    }
}

/// The review stage's deterministic fallback: keep the draft, bound every
/// bullet-style field to a fixed item count and per-item word count.
pub fn heuristic_review(mut deck: Deck) -> Deck {
    for slide in &mut deck.slides {
        trim_slide_bullets(slide);
    }
    deck
}
