//! Core data model: outline items, plans, slides, decks.
//!
//! These are the canonical shapes every pipeline stage produces and consumes.
//! Provider output is normalized into them (see `pipeline::normalize`) before
//! any downstream logic runs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of a deck plan: which layout to use and what it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineItem {
    pub layout_key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

/// The deck structure agreed on before any field content is filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub title: String,
    pub outline: Vec<OutlineItem>,
}

/// A fully populated slide record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub layout_key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Slide {
    pub fn new(layout_key: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            layout_key: layout_key.into(),
            fields,
        }
    }
}

/// The final externally visible artifact: an ordered slide sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slide_roundtrip() {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!("Intro"));
        fields.insert("items".to_string(), json!(["a", "b"]));
        let slide = Slide::new("Agenda / Outline Slide", fields);

        let text = serde_json::to_string(&slide).unwrap();
        let back: Slide = serde_json::from_str(&text).unwrap();
        assert_eq!(back, slide);
        assert_eq!(back.layout_key, "Agenda / Outline Slide");
    }

    #[test]
    fn test_slide_fields_default_to_empty() {
        let slide: Slide = serde_json::from_str(r#"{"layout_key": "Title Slide"}"#).unwrap();
        assert!(slide.fields.is_empty());
    }

    #[test]
    fn test_outline_item_intent_optional() {
        let item: OutlineItem =
            serde_json::from_str(r#"{"layout_key": "Title Slide", "title": "T"}"#).unwrap();
        assert!(item.intent.is_none());
        // intent absent from serialization when None
        let text = serde_json::to_string(&item).unwrap();
        assert!(!text.contains("intent"));
    }

    #[test]
    fn test_deck_len() {
        let deck = Deck::new(vec![Slide::new("Title Slide", Map::new())]);
        assert_eq!(deck.len(), 1);
        assert!(!deck.is_empty());
    }
}
