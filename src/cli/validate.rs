use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::deck::Deck;
use crate::schema;

/// One-shot validation of an existing slides JSON against templates.
/// Prints every diagnostic; fails when any slide would be dropped.
pub fn run(slides_path: &str, templates_path: &str) -> Result<()> {
    let slides_text = fs::read_to_string(slides_path)
        .with_context(|| format!("failed to read {}", slides_path))?;
    let deck: Deck = serde_json::from_str(&slides_text)
        .with_context(|| format!("invalid deck JSON in {}", slides_path))?;

    let templates_text = fs::read_to_string(templates_path)
        .with_context(|| format!("failed to read {}", templates_path))?;
    let templates = serde_json::from_str(&templates_text)
        .with_context(|| format!("invalid JSON in {}", templates_path))?;

    let (valid, diagnostics) = schema::validate_deck(&deck.slides, &templates);
    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }

    let dropped = deck.slides.len() - valid.len();
    println!(
        "{}: {} slides, {} valid, {} dropped",
        Path::new(slides_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| slides_path.to_string()),
        deck.slides.len(),
        valid.len(),
        dropped
    );

    if dropped > 0 {
        bail!("{} slide(s) fail required-field validation", dropped);
    }
    Ok(())
}
