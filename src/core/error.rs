//! Provider failure taxonomy. These never leave a provider.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: {status}")]
    UpstreamStatus { status: StatusCode },

    #[error("Failed to parse XML response: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response is missing expected node: {0}")]
    MissingNode(&'static str),
}

impl ProviderError {
    /// Timeouts and connection failures are expected to clear on their own.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ProviderError::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Logs the failure at the severity its kind warrants.
    pub fn report(&self, provider: &str) {
        if self.is_recoverable() {
            warn!(provider, error = %self, "Provider unreachable, serving no data");
        } else {
            error!(provider, error = %self, "Provider fetch failed, serving no data");
        }
    }
}
