//! Deterministic, network-free deck builder.
//!
//! Serves as the default content when no credentials are configured, as the
//! per-stage heuristic for Plan and Draft, and as the wholesale fallback at
//! assembly when every generated slide was dropped. Same inputs always
//! produce the same deck; there is no failure mode.

use serde_json::{json, Map, Value};

use crate::context::DataContext;
use crate::deck::{Deck, OutlineItem, Plan, Slide};

fn is_ukrainian(lang: &str) -> bool {
    lang.starts_with("uk")
}

/// Fixed preference order of stub outline entries with their slide titles.
fn preferred_outline(topic: &str, uk: bool) -> Vec<(&'static str, String)> {
    vec![
        ("Title Slide", topic.to_string()),
        (
            "Agenda / Outline Slide",
            if uk { "План" } else { "Agenda" }.to_string(),
        ),
        (
            "Title and Content",
            if uk { "Вступ" } else { "Introduction" }.to_string(),
        ),
        (
            "Text + Image Slide",
            if uk { "Ключові ідеї" } else { "Key Ideas" }.to_string(),
        ),
        (
            "Comparison Slide",
            if uk {
                "Порівняння підходів"
            } else {
                "Comparing Approaches"
            }
            .to_string(),
        ),
        (
            "Quote / Key Message Slide",
            if uk { "Цитата" } else { "Quote" }.to_string(),
        ),
        (
            "Summary / Thank You Slide",
            if uk { "Підсумок" } else { "Summary" }.to_string(),
        ),
    ]
}

/// Build the deterministic plan: preferred layouts filtered to the allowed
/// set, truncated to `max_slides` (at least one entry when any layout is
/// allowed).
pub fn stub_plan(topic: &str, lang: &str, max_slides: usize, ctx: &DataContext) -> Plan {
    let uk = is_ukrainian(lang);
    let title = if topic.is_empty() {
        if uk {
            "Автоматично згенерована презентація".to_string()
        } else {
            "Auto-generated Presentation".to_string()
        }
    } else {
        topic.to_string()
    };

    let mut outline: Vec<OutlineItem> = preferred_outline(topic, uk)
        .into_iter()
        .filter(|(key, _)| ctx.is_allowed(key))
        .map(|(key, item_title)| OutlineItem {
            layout_key: key.to_string(),
            title: item_title,
            intent: None,
        })
        .collect();

    // None of the preferred layouts are allowed: fall back to the first
    // allowed layout so the deck is never empty.
    if outline.is_empty() {
        if let Some(key) = ctx.allowed_layouts.first() {
            outline.push(OutlineItem {
                layout_key: key.clone(),
                title: title.clone(),
                intent: None,
            });
        }
    }

    outline.truncate(max_slides.min(outline.len()).max(1));
    Plan { title, outline }
}

/// Expand one outline entry into a layout-specific field set with fixed
/// strings in the requested language family.
pub fn populate_slide(item: &OutlineItem, topic: &str, lang: &str) -> Slide {
    let uk = is_ukrainian(lang);
    let generic_title = if uk {
        "Автоматично згенерована презентація"
    } else {
        "Auto-generated Presentation"
    };

    let fields: Map<String, Value> = match item.layout_key.as_str() {
        "Title Slide" => obj(json!({
            "title": if topic.is_empty() { generic_title } else { topic },
            "subtitle": generic_title,
        })),
        "Agenda / Outline Slide" => obj(json!({
            "title": if uk { "План" } else { "Agenda" },
            "items": if uk {
                json!(["Мета", "Підхід", "Етапи"])
            } else {
                json!(["Goals", "Approach", "Milestones"])
            },
        })),
        "Title and Content" => obj(json!({
            "title": if uk { "Вступ" } else { "Introduction" },
            "body": if uk {
                json!(["Контекст", "Завдання", "Очікування"])
            } else {
                json!(["Context", "Objectives", "Expectations"])
            },
        })),
        "Text + Image Slide" => obj(json!({
            "title": if uk { "Ключові ідеї" } else { "Key Ideas" },
            "body": if uk {
                json!(["Проблема", "Рішення", "Вплив"])
            } else {
                json!(["Problem", "Solution", "Impact"])
            },
            "image": {"src": "example.png", "alt": if uk { "Ілюстрація" } else { "Illustration" }},
        })),
        "Comparison Slide" => obj(json!({
            "title": if uk { "Порівняння" } else { "Comparison" },
            "a_title": "A",
            "a": if uk { json!(["Плюси", "Мінуси"]) } else { json!(["Pros", "Cons"]) },
            "b_title": "B",
            "b": if uk { json!(["Плюси", "Мінуси"]) } else { json!(["Pros", "Cons"]) },
        })),
        "Quote / Key Message Slide" => obj(json!({
            "title": if uk { "Головна думка" } else { "Key Message" },
            "quote": if uk {
                "Коротко, чітко, по суті."
            } else {
                "Short, clear, to the point."
            },
        })),
        "Summary / Thank You Slide" => obj(json!({
            "title": if uk { "Підсумок" } else { "Summary" },
            "points": if uk {
                json!(["Результати", "Кроки далі"])
            } else {
                json!(["Results", "Next Steps"])
            },
            "thanks": if uk { "Дякую за увагу!" } else { "Thank you for your attention!" },
        })),
        _ => obj(json!({"title": item.title})),
    };

    Slide::new(item.layout_key.clone(), fields)
}

/// Expand a plan into a full draft deck.
pub fn expand_plan(plan: &Plan, topic: &str, lang: &str) -> Deck {
    Deck::new(
        plan.outline
            .iter()
            .map(|item| populate_slide(item, topic, lang))
            .collect(),
    )
}

/// The complete offline deck for a topic.
pub fn stub_deck(topic: &str, lang: &str, max_slides: usize, ctx: &DataContext) -> Deck {
    let plan = stub_plan(topic, lang, max_slides, ctx);
    expand_plan(&plan, topic, lang)
}

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
