//! Failure modes that end up rendered as a placeholder instead of bars.

use thiserror::Error;

/// Error type for obtaining usage data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// Credentials or settings file is missing or unreadable
    #[error("config unavailable: {0}")]
    ConfigUnavailable(String),

    /// Credentials were readable but carried no usable access token
    #[error("auth unavailable: {0}")]
    AuthUnavailable(String),

    /// Network error, timeout, or an error reported by the endpoint
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}

impl UsageError {
    /// Short label that fits in a statusline placeholder
    pub fn short_label(&self) -> &'static str {
        match self {
            UsageError::ConfigUnavailable(_) => "no creds",
            UsageError::AuthUnavailable(_) => "no token",
            UsageError::FetchFailed(_) => "offline",
        }
    }
}
