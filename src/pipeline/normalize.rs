//! Normalization of provider output into canonical pipeline types.
//!
//! Models answer in several recognized shapes despite the system directive:
//! a wrapping object with a `plan`/`outline` key, a bare outline array, or a
//! full slide array where only an outline was requested. Each shape is a
//! variant of an untagged union here, mapped to the canonical `Plan`/`Deck`
//! before any downstream logic runs.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::deck::{Deck, OutlineItem, Plan, Slide};
use crate::error::FormatError;

#[derive(Debug, Deserialize)]
struct RawOutlineItem {
    layout_key: Option<String>,
    title: Option<String>,
    intent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSlide {
    layout_key: Option<String>,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PlanBody {
    title: Option<String>,
    outline: Vec<RawOutlineItem>,
}

/// The recognized plan output shapes, most specific first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlanShape {
    Wrapped { plan: PlanBody },
    Keyed { title: Option<String>, outline: Vec<RawOutlineItem> },
    // Degraded: the model produced full slides; reduce them to titles.
    Slides { slides: Vec<RawSlide> },
    Bare(Vec<RawOutlineItem>),
}

/// The recognized deck output shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeckShape {
    Wrapped { slides: Vec<RawSlide> },
    Bare(Vec<RawSlide>),
}

fn outline_from_raw(
    items: Vec<RawOutlineItem>,
    allowed_layouts: &[String],
) -> Vec<OutlineItem> {
    items
        .into_iter()
        .filter_map(|item| {
            let layout_key = item.layout_key?;
            if !allowed_layouts.contains(&layout_key) {
                return None;
            }
            let title = item.title.unwrap_or_else(|| layout_key.clone());
            Some(OutlineItem {
                layout_key,
                title,
                intent: item.intent,
            })
        })
        .collect()
}

fn outline_from_slides(slides: Vec<RawSlide>, allowed_layouts: &[String]) -> Vec<OutlineItem> {
    slides
        .into_iter()
        .filter_map(|slide| {
            let layout_key = slide.layout_key?;
            if !allowed_layouts.contains(&layout_key) {
                return None;
            }
            let title = slide
                .fields
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| layout_key.clone());
            Some(OutlineItem {
                layout_key,
                title,
                intent: None,
            })
        })
        .collect()
}

/// Normalize extracted plan JSON to the canonical `Plan`.
///
/// Outline items are filtered to the allowed layouts and truncated to
/// `max_slides`; an outline with nothing left afterwards is a shape error so
/// the stage executor moves on to its next attempt.
pub fn normalize_plan(
    json_text: &str,
    topic: &str,
    allowed_layouts: &[String],
    max_slides: usize,
) -> Result<Plan, FormatError> {
    let value: Value = serde_json::from_str(json_text)?;
    let shape: PlanShape =
        serde_json::from_value(value).map_err(|_| FormatError::Shape { expected: "plan" })?;

    let (title, mut outline) = match shape {
        PlanShape::Wrapped { plan } => (plan.title, outline_from_raw(plan.outline, allowed_layouts)),
        PlanShape::Keyed { title, outline } => (title, outline_from_raw(outline, allowed_layouts)),
        PlanShape::Slides { slides } => (None, outline_from_slides(slides, allowed_layouts)),
        PlanShape::Bare(items) => (None, outline_from_raw(items, allowed_layouts)),
    };

    outline.truncate(max_slides.max(1));
    if outline.is_empty() {
        return Err(FormatError::Shape { expected: "plan" });
    }

    Ok(Plan {
        title: title.filter(|t| !t.is_empty()).unwrap_or_else(|| topic.to_string()),
        outline,
    })
}

/// Normalize extracted deck JSON to the canonical `Deck`, keeping only
/// slides whose layout key is allowed.
pub fn normalize_deck(json_text: &str, allowed_layouts: &[String]) -> Result<Deck, FormatError> {
    let value: Value = serde_json::from_str(json_text)?;
    let shape: DeckShape =
        serde_json::from_value(value).map_err(|_| FormatError::Shape { expected: "slides" })?;

    let raw = match shape {
        DeckShape::Wrapped { slides } => slides,
        DeckShape::Bare(slides) => slides,
    };

    let slides: Vec<Slide> = raw
        .into_iter()
        .filter_map(|slide| {
            let layout_key = slide.layout_key?;
            if !allowed_layouts.contains(&layout_key) {
                return None;
            }
            Some(Slide::new(layout_key, slide.fields))
        })
        .collect();

    if slides.is_empty() {
        return Err(FormatError::Shape { expected: "slides" });
    }
    Ok(Deck::new(slides))
}
