//! Access token lookup from the Claude Code credentials file
//!
//! The file lives at `~/.claude/.credentials.json`:
//! ```text
//! { "claudeAiOauth": { "accessToken": "sk-ant-oat01-...", "expiresAt": 1767225600000 } }
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::UsageError;

/// OAuth section of the credentials file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OAuthCredentials {
    #[serde(default)]
    access_token: Option<String>,
}

/// Credentials file (only fields we care about)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsFile {
    #[serde(default)]
    claude_ai_oauth: Option<OAuthCredentials>,
}

/// Default credentials location (`~/.claude/.credentials.json`)
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude").join(".credentials.json"))
}

/// Read the OAuth access token from a credentials file.
///
/// A missing or unparsable file is [`UsageError::ConfigUnavailable`];
/// an absent or blank token is [`UsageError::AuthUnavailable`].
pub fn read_access_token(path: &Path) -> Result<String, UsageError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        UsageError::ConfigUnavailable(format!("cannot read {}: {}", path.display(), e))
    })?;

    let file: CredentialsFile = serde_json::from_str(&content).map_err(|e| {
        UsageError::ConfigUnavailable(format!("cannot parse {}: {}", path.display(), e))
    })?;

    file.claude_ai_oauth
        .and_then(|oauth| oauth.access_token)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            UsageError::AuthUnavailable(format!("no access token in {}", path.display()))
        })
}
