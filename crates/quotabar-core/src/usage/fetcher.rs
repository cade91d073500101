//! Single-attempt HTTP fetcher for the usage endpoint.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use super::credentials::read_access_token;
use crate::error::UsageError;

/// Usage endpoint for OAuth (subscription) accounts
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/api/oauth/usage";

/// Upper bound on the whole request, connect through body
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Beta header required by the OAuth usage endpoint
const OAUTH_BETA: &str = "oauth-2025-04-20";

/// Source of raw usage response bodies
pub trait UsageSource {
    /// Fetch the raw response body. Called at most once per render.
    fn fetch(&self) -> Result<String, UsageError>;

    /// Stable identity of the upstream, used to fingerprint the fetch cache
    fn source_id(&self) -> &str;
}

/// Fetches usage over HTTPS with a bearer token from the credentials file
#[derive(Debug, Clone)]
pub struct HttpUsageSource {
    endpoint: String,
    credentials_path: PathBuf,
    timeout: Duration,
}

impl HttpUsageSource {
    /// Create a fetcher for `endpoint` authenticated from `credentials_path`
    pub fn new(endpoint: impl Into<String>, credentials_path: PathBuf) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials_path,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl UsageSource for HttpUsageSource {
    fn fetch(&self) -> Result<String, UsageError> {
        let token = read_access_token(&self.credentials_path)?;

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .into();

        info!("Usage fetch: GET {}", self.endpoint);

        let mut response = agent
            .get(&self.endpoint)
            .header("Authorization", &format!("Bearer {}", token))
            .header("anthropic-beta", OAUTH_BETA)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| UsageError::FetchFailed(e.to_string()))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| UsageError::FetchFailed(format!("failed to read body: {}", e)))?;

        debug!("Usage fetch: received {} bytes", body.len());
        Ok(body)
    }

    fn source_id(&self) -> &str {
        &self.endpoint
    }
}
