//! Request-level error classification.

use reqwest::StatusCode;
use thiserror::Error;

use super::retry::AttemptOutcome;

/// Failure of a single request attempt against the info endpoint.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("rate limited by Hyperliquid API (HTTP 429)")]
    RateLimited,

    #[error("Hyperliquid API error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// How the retry loop should treat this failure. `None` means the
    /// response arrived but could not be decoded, which retrying will not
    /// fix; it is propagated immediately.
    pub fn retry_class(&self) -> Option<AttemptOutcome> {
        match self {
            RequestError::RateLimited => Some(AttemptOutcome::RateLimited),
            RequestError::Status { .. } | RequestError::Transport(_) => {
                Some(AttemptOutcome::Transient)
            }
            RequestError::Decode(_) => None,
        }
    }
}
