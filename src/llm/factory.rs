use anyhow::{bail, Result};
use tracing::{debug, warn};

use super::client::{MockProvider, Provider, ProviderSet};
use super::client_impl::{GeminiProvider, OpenAIProvider};
use crate::config::{Config, ProviderConfig};

/// Create one provider from its config section.
pub fn create_provider(cfg: &ProviderConfig, api_key: String) -> Result<Box<dyn Provider>> {
    let max_tokens = cfg.get_max_tokens();

    match cfg.provider.as_str() {
        "gemini" => Ok(Box::new(GeminiProvider::new(
            api_key,
            cfg.model.clone(),
            max_tokens,
            cfg.timeout_secs,
        )?)),

        "openai" => Ok(Box::new(OpenAIProvider::new(
            api_key,
            cfg.model.clone(),
            max_tokens,
            cfg.timeout_secs,
        )?)),

        "openai-compatible" => {
            let base_url = cfg
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434/v1".to_string());

            Ok(Box::new(OpenAIProvider::with_base_url(
                api_key,
                cfg.model.clone(),
                base_url,
                max_tokens,
                cfg.timeout_secs,
            )?))
        }

        unknown => bail!("Unknown provider: {}", unknown),
    }
}

/// Build the primary/secondary provider pair from configuration.
///
/// A missing credential disables that slot rather than failing the run: the
/// pipeline degrades to its offline heuristics. `offline` forces both slots
/// empty; `dry_run` installs the deterministic mock as primary.
pub fn create_provider_set(config: &Config, offline: bool, dry_run: bool) -> Result<ProviderSet> {
    if offline {
        debug!("offline mode: no providers configured");
        return Ok(ProviderSet::offline());
    }
    if dry_run {
        return Ok(ProviderSet {
            primary: Some(Box::new(MockProvider::new())),
            secondary: None,
        });
    }

    let primary = match config.primary.resolve_api_key() {
        Ok(key) => Some(create_provider(&config.primary, key)?),
        Err(e) => {
            warn!("primary provider unavailable ({}), relying on fallbacks", e);
            None
        }
    };

    let secondary = match &config.secondary {
        Some(cfg) => match cfg.resolve_api_key() {
            Ok(key) => Some(create_provider(cfg, key)?),
            Err(e) => {
                debug!("secondary provider unavailable ({})", e);
                None
            }
        },
        None => None,
    };

    Ok(ProviderSet { primary, secondary })
}
