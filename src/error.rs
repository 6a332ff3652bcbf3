//! Error taxonomy for the generation pipeline.
//!
//! Provider and format failures never escape the stage executor: they are
//! recorded per attempt and trigger fallback to the next provider, then to
//! the stage heuristic. Validation problems surface as advisory diagnostics
//! at assembly, not as errors.

use thiserror::Error;

/// A live provider call failed. One variant per failure class so the stage
/// executor can log a precise reason for each fallback step.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider}: authentication rejected (HTTP {status})")]
    Auth { provider: &'static str, status: u16 },

    #[error("{provider}: request failed: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: API error {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider}: empty response (no usable text)")]
    Empty { provider: &'static str },
}

/// Provider output survived the call but is not usable as structured data.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("response is not valid JSON after extraction: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response JSON has no recognized {expected} shape")]
    Shape { expected: &'static str },
}

/// The per-attempt failure inspected by the stage executor's fallback ladder.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Format(#[from] FormatError),
}
