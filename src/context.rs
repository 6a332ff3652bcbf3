//! DataContext: templates, themes, and the derived allowed-layout list.
//!
//! Built once per invocation from the templates/themes JSON files and
//! read-only for the life of a request.

use anyhow::{Context as _, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Fallback layout list used when templates carry no layout keys.
const DEFAULT_LAYOUTS: &[&str] = &[
    "Title Slide",
    "Title and Content",
    "Image Only",
    "Video Slide",
    "Markmap Export",
    "Agenda / Outline Slide",
    "Text + Image Slide",
    "Comparison Slide",
    "Chart / Graph Slide",
    "Process / Flow Slide",
    "Problem-Solution Slide",
    "Quote / Key Message Slide",
    "Team / Organizational Slide",
    "Summary / Thank You Slide",
];

#[derive(Debug, Clone)]
pub struct DataContext {
    pub templates: Value,
    pub themes: Value,
    pub allowed_layouts: Vec<String>,
}

impl DataContext {
    /// Build a context from already-parsed templates and themes.
    pub fn new(templates: Value, themes: Value) -> Self {
        let mut allowed = Vec::new();
        if let Some(list) = templates.as_array() {
            for template in list {
                if let Some(key) = template.get("layout_key").and_then(Value::as_str) {
                    allowed.push(key.to_string());
                }
            }
        }
        if allowed.is_empty() {
            debug!("templates carry no layout keys, using default layout list");
            allowed = DEFAULT_LAYOUTS.iter().map(|s| s.to_string()).collect();
        }
        Self {
            templates,
            themes,
            allowed_layouts: allowed,
        }
    }

    pub fn is_allowed(&self, layout_key: &str) -> bool {
        self.allowed_layouts.iter().any(|k| k == layout_key)
    }
}

/// Read a JSON file, tolerating a UTF-8 BOM.
fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    serde_json::from_str(content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Load the context from templates/themes files.
pub fn load_datacontext(templates_path: &Path, themes_path: &Path) -> Result<DataContext> {
    let templates = read_json(templates_path)?;
    let themes = read_json(themes_path)?;
    Ok(DataContext::new(templates, themes))
}
