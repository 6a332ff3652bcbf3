//! Command-level tests: generate writes a deck file, validate checks one.

use std::fs;

use deckgen::cli::generate::{self, GenerateOptions};
use deckgen::cli::validate;
use deckgen::deck::Deck;

const TEMPLATES: &str = r#"[
    {"layout_key": "Title Slide", "fieldsSchema": {"title": "string", "subtitle": "string?"}},
    {"layout_key": "Agenda / Outline Slide", "fieldsSchema": {"title": "string", "items": "string[]"}},
    {"layout_key": "Summary / Thank You Slide", "fieldsSchema": {"title": "string", "points": "string[]"}}
]"#;

const THEMES: &str = r##"{"default": {"background": "#ffffff"}}"##;

fn seed_data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("templates.json"), TEMPLATES).unwrap();
    fs::write(dir.path().join("themes.json"), THEMES).unwrap();
    dir
}

fn offline_opts(dir: &tempfile::TempDir) -> GenerateOptions {
    GenerateOptions {
        topic: Some("Renewable Energy".to_string()),
        prompt_file: None,
        data_dir: Some(dir.path().to_string_lossy().to_string()),
        templates: None,
        themes: None,
        out: None,
        lang: Some("en".to_string()),
        max_slides: Some(3),
        budget: Some(0),
        config_path: None,
        model: None,
        offline: true,
        dry_run: false,
    }
}

#[test]
fn test_theme_fixture_keeps_hex_colors() {
    let dir = seed_data_dir();
    let text = fs::read_to_string(dir.path().join("themes.json")).unwrap();
    let themes: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(themes["default"]["background"], "#ffffff");
}

#[tokio::test]
async fn test_generate_offline_writes_slug_named_deck() {
    let dir = seed_data_dir();
    generate::run(offline_opts(&dir)).await.unwrap();

    let out = dir.path().join("slides_renewable-energy.json");
    let text = fs::read_to_string(&out).unwrap();
    let deck: Deck = serde_json::from_str(&text).unwrap();
    assert!(!deck.is_empty());
    assert!(deck.len() <= 3);
    for slide in &deck.slides {
        assert!(slide.fields.contains_key("title"));
    }
}

#[tokio::test]
async fn test_generate_explicit_out_path() {
    let dir = seed_data_dir();
    let out = dir.path().join("nested").join("deck.json");
    let mut opts = offline_opts(&dir);
    opts.out = Some(out.to_string_lossy().to_string());
    generate::run(opts).await.unwrap();

    let deck: Deck = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert!(!deck.is_empty());
}

#[tokio::test]
async fn test_generate_dry_run_uses_mock_provider() {
    let dir = seed_data_dir();
    let out = dir.path().join("mock.json");
    let mut opts = offline_opts(&dir);
    opts.offline = false;
    opts.dry_run = true;
    opts.budget = Some(3);
    opts.out = Some(out.to_string_lossy().to_string());
    generate::run(opts).await.unwrap();

    let deck: Deck = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert!(!deck.is_empty());
    for slide in &deck.slides {
        assert!(
            slide.layout_key == "Title Slide"
                || slide.layout_key == "Agenda / Outline Slide"
                || slide.layout_key == "Summary / Thank You Slide"
        );
    }
}

#[tokio::test]
async fn test_generate_topic_from_prompt_file() {
    let dir = seed_data_dir();
    let brief = dir.path().join("brief.md");
    fs::write(&brief, "Hydrogen storage at grid scale\n").unwrap();

    let mut opts = offline_opts(&dir);
    opts.topic = None;
    opts.prompt_file = Some(brief.to_string_lossy().to_string());
    generate::run(opts).await.unwrap();

    let out = dir.path().join("slides_hydrogen-storage-at-grid-scale.json");
    assert!(out.exists());
}

#[tokio::test]
async fn test_generate_missing_templates_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate::run(offline_opts(&dir)).await.unwrap_err();
    assert!(err.to_string().contains("templates"));
}

#[tokio::test]
async fn test_generated_deck_passes_validate() {
    let dir = seed_data_dir();
    generate::run(offline_opts(&dir)).await.unwrap();

    let slides = dir.path().join("slides_renewable-energy.json");
    let templates = dir.path().join("templates.json");
    validate::run(
        slides.to_str().unwrap(),
        templates.to_str().unwrap(),
    )
    .unwrap();
}

#[test]
fn test_validate_rejects_broken_deck() {
    let dir = seed_data_dir();
    let slides = dir.path().join("bad.json");
    fs::write(
        &slides,
        r#"{"slides": [{"layout_key": "Title Slide", "fields": {}}]}"#,
    )
    .unwrap();
    let templates = dir.path().join("templates.json");
    assert!(validate::run(slides.to_str().unwrap(), templates.to_str().unwrap()).is_err());
}
