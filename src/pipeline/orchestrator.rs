//! Sequences the three production stages and performs final assembly.
//!
//! The orchestrator owns the call budget for one request and guarantees a
//! non-empty, schema-conformant deck under any combination of provider
//! failures: total failure degrades to the deterministic stub deck. Nothing
//! here returns an error to the caller.

use tracing::{info, warn};

use super::budget::CallBudget;
use super::normalize::{normalize_deck, normalize_plan};
use super::stages::{heuristic_review, run_stage, Stage};
use crate::context::DataContext;
use crate::deck::{Deck, Slide};
use crate::llm::client::ProviderSet;
use crate::llm::prompts;
use crate::schema;
use crate::stub;

/// One generation request. The context is built once per invocation and
/// read-only for the request's life.
pub struct GenerateRequest<'a> {
    pub topic: &'a str,
    pub language: &'a str,
    pub max_slides: usize,
    pub ctx: &'a DataContext,
}

/// The result of one request: the final deck plus advisory diagnostics and
/// the number of live provider calls actually attempted.
pub struct GenerateOutput {
    pub deck: Deck,
    pub diagnostics: Vec<String>,
    pub calls_used: u32,
}

pub struct Orchestrator {
    providers: ProviderSet,
    call_budget: u32,
}

impl Orchestrator {
    pub fn new(providers: ProviderSet) -> Self {
        Self {
            providers,
            call_budget: 3,
        }
    }

    pub fn with_call_budget(mut self, call_budget: u32) -> Self {
        self.call_budget = call_budget;
        self
    }

    pub async fn generate(&self, req: &GenerateRequest<'_>) -> GenerateOutput {
        let ctx = req.ctx;
        let allowed = &ctx.allowed_layouts;
        let mut budget = CallBudget::new(self.call_budget);

        info!(
            "generating deck for '{}' (language {}, max {} slides, budget {})",
            req.topic, req.language, req.max_slides, self.call_budget
        );

        // Plan
        let plan_prompt = prompts::plan_prompt(req.topic, req.language, req.max_slides, allowed);
        let plan = run_stage(
            Stage::Plan,
            &self.providers,
            &mut budget,
            &plan_prompt,
            |text| normalize_plan(text, req.topic, allowed, req.max_slides).map_err(Into::into),
            || stub::stub_plan(req.topic, req.language, req.max_slides, ctx),
        )
        .await;
        info!("plan ready: {} outline items", plan.outline.len());

        // Draft
        let outline_json = serde_json::to_string(&plan.outline).unwrap_or_default();
        let templates_json = serde_json::to_string(&ctx.templates).unwrap_or_default();
        let draft_prompt =
            prompts::draft_prompt(req.topic, req.language, &outline_json, &templates_json);
        let draft = run_stage(
            Stage::Draft,
            &self.providers,
            &mut budget,
            &draft_prompt,
            |text| normalize_deck(text, allowed).map_err(Into::into),
            || stub::expand_plan(&plan, req.topic, req.language),
        )
        .await;
        info!("draft ready: {} slides", draft.len());

        // Review
        let deck_json = serde_json::to_string(&draft).unwrap_or_default();
        let review_prompt = prompts::review_prompt(req.topic, req.language, &deck_json, allowed);
        let fallback_draft = draft.clone();
        let reviewed = run_stage(
            Stage::Review,
            &self.providers,
            &mut budget,
            &review_prompt,
            |text| normalize_deck(text, allowed).map_err(Into::into),
            || heuristic_review(fallback_draft),
        )
        .await;

        // Assembly: re-assert layout closure, then validate/repair fields.
        let filtered: Vec<Slide> = reviewed
            .slides
            .into_iter()
            .filter(|slide| ctx.is_allowed(&slide.layout_key))
            .collect();
        let (valid, diagnostics) = schema::validate_deck(&filtered, &ctx.templates);
        for diagnostic in &diagnostics {
            warn!("validation: {}", diagnostic);
        }

        let deck = if valid.is_empty() {
            info!("no slide survived validation, substituting stub deck");
            stub::stub_deck(req.topic, req.language, req.max_slides, ctx)
        } else {
            Deck::new(valid)
        };

        let calls_used = self.call_budget - budget.remaining();
        info!(
            "deck assembled: {} slides, {} live calls used",
            deck.len(),
            calls_used
        );

        GenerateOutput {
            deck,
            diagnostics,
            calls_used,
        }
    }
}
