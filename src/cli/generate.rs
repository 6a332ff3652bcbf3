use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::context::load_datacontext;
use crate::llm::factory;
use crate::pipeline::orchestrator::{GenerateRequest, Orchestrator};
use crate::util::slugify;

/// Options for one `deckgen generate` invocation, resolved from CLI args.
pub struct GenerateOptions {
    pub topic: Option<String>,
    pub prompt_file: Option<String>,
    pub data_dir: Option<String>,
    pub templates: Option<String>,
    pub themes: Option<String>,
    pub out: Option<String>,
    pub lang: Option<String>,
    pub max_slides: Option<usize>,
    pub budget: Option<u32>,
    pub config_path: Option<String>,
    pub model: Option<String>,
    pub offline: bool,
    pub dry_run: bool,
}

fn resolve_topic(opts: &GenerateOptions) -> Result<String> {
    if let Some(topic) = &opts.topic {
        return Ok(topic.clone());
    }
    let path = opts
        .prompt_file
        .as_ref()
        .context("either --topic or --prompt-file is required")?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read prompt file {}", path))?;
    Ok(text.trim().to_string())
}

fn resolve_data_paths(opts: &GenerateOptions) -> (PathBuf, PathBuf) {
    let data_dir = opts
        .data_dir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    let templates = opts
        .templates
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("templates.json"));
    let themes = opts
        .themes
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("themes.json"));
    (templates, themes)
}

pub async fn run(opts: GenerateOptions) -> Result<()> {
    let mut config = Config::load_with_path(opts.config_path.clone())?;
    if let Some(model) = &opts.model {
        config.primary.model = model.clone();
    }

    let topic = resolve_topic(&opts)?;
    let (templates_path, themes_path) = resolve_data_paths(&opts);
    let ctx = load_datacontext(&templates_path, &themes_path)?;
    info!("{} layouts allowed", ctx.allowed_layouts.len());

    let lang = opts
        .lang
        .clone()
        .unwrap_or_else(|| config.generation.language.clone());
    let max_slides = opts.max_slides.unwrap_or(config.generation.max_slides);
    let budget = opts.budget.unwrap_or(config.generation.call_budget);

    let providers = factory::create_provider_set(&config, opts.offline, opts.dry_run)?;
    let orchestrator = Orchestrator::new(providers).with_call_budget(budget);

    let request = GenerateRequest {
        topic: &topic,
        language: &lang,
        max_slides,
        ctx: &ctx,
    };
    let output = orchestrator.generate(&request).await;

    let out_path = match &opts.out {
        Some(path) => PathBuf::from(path),
        None => {
            let dir = templates_path.parent().unwrap_or(Path::new("."));
            dir.join(format!("slides_{}.json", slugify(&topic)))
        }
    };
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&output.deck)?;
    fs::write(&out_path, json)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    if !output.diagnostics.is_empty() {
        info!("{} validation diagnostics (advisory)", output.diagnostics.len());
    }
    println!("Saved: {}", out_path.display());
    Ok(())
}
