//! Prompt construction for the three production stages.
//!
//! Every call sends the same system directive describing the expected JSON
//! shapes plus a stage-specific user prompt. Providers are told not to fence
//! their output; the extractor copes when they do anyway.

use crate::util::truncate_chars;

/// Fixed system directive sent with every provider call.
pub const SYSTEM_PROMPT: &str = "You are a slide generation agent. Always output strict JSON only. \
     Never include markdown fences. \
     Shape: either {\"outline\": [...]} or {\"slides\": [...]}.";

/// Character cap for the template-schema serialization embedded in prompts.
pub const SCHEMA_CHAR_CAP: usize = 8000;

/// Plan stage: ask for a deck outline constrained to the allowed layouts.
pub fn plan_prompt(topic: &str, lang: &str, max_slides: usize, allowed_layouts: &[String]) -> String {
    format!(
        "Language: {}. Produce JSON only with key 'outline'. \
         Each outline item: {{layout_key, title?, intent?}}. Max {} items. \
         Use these layout_key values only: {}. \
         Topic: {}",
        lang,
        max_slides,
        allowed_layouts.join(", "),
        topic
    )
}

/// Draft stage: populate every outline entry with layout-conformant fields.
pub fn draft_prompt(topic: &str, lang: &str, outline_json: &str, templates_json: &str) -> String {
    format!(
        "Language: {}. Produce JSON only with key 'slides'. \
         Respect provided outline order and layout_key strictly. \
         Fields must match layout conventions from templates. \
         Keep bullets concise (<= 8 words, 3-6 items). Topic: {}. \
         Outline JSON: {} \
         Templates JSON (sample schemas): {}",
        lang,
        topic,
        outline_json,
        truncate_chars(templates_json, SCHEMA_CHAR_CAP)
    )
}

/// Review stage: re-assert layout/field constraints on the draft deck.
pub fn review_prompt(topic: &str, lang: &str, deck_json: &str, allowed_layouts: &[String]) -> String {
    format!(
        "Language: {}. Refine the provided deck. Produce JSON only with key 'slides'. \
         Use these layout_key values only: {}. \
         Trim bullet lists to at most 6 items of <= 8 words each. \
         Keep layout_key values and field names unchanged. Topic: {}. \
         Deck JSON: {}",
        lang,
        allowed_layouts.join(", "),
        topic,
        deck_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_prompt_contains_inputs() {
        let allowed = vec!["Title Slide".to_string(), "Comparison Slide".to_string()];
        let prompt = plan_prompt("Renewable Energy", "en", 5, &allowed);
        assert!(prompt.contains("key 'outline'"));
        assert!(prompt.contains("Max 5 items"));
        assert!(prompt.contains("Title Slide, Comparison Slide"));
        assert!(prompt.contains("Topic: Renewable Energy"));
    }

    #[test]
    fn test_draft_prompt_caps_templates() {
        let big_schema = "x".repeat(SCHEMA_CHAR_CAP + 500);
        let prompt = draft_prompt("T", "uk", "[]", &big_schema);
        assert!(prompt.contains("key 'slides'"));
        // The oversized tail is not embedded.
        assert!(prompt.len() < big_schema.len() + 300);
    }

    #[test]
    fn test_review_prompt_mentions_bounds() {
        let allowed = vec!["Title Slide".to_string()];
        let prompt = review_prompt("T", "en", "{\"slides\":[]}", &allowed);
        assert!(prompt.contains("Refine the provided deck"));
        assert!(prompt.contains("at most 6 items"));
        assert!(prompt.contains("Deck JSON"));
    }
}
