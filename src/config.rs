/// Client configuration for the Connectly core.
///
/// Hosts usually ship this as a small JSON blob alongside the app bundle;
/// every field is optional and falls back to `Default`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::MIN_PASSWORD_LEN;
use crate::membership::Candidate;
use crate::validation::{validate_password_change, FormError, PasswordChange};

/// Development backend the client has always pointed at.
pub const DEFAULT_API_BASE_URL: &str = "http://192.168.5.39:8000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("api_base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("max_selection_limit must be at least 1")]
    ZeroSelectionLimit,
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin; relative avatar/icon paths are resolved against it.
    pub api_base_url: String,
    /// Max members that may be staged on the add-members screen.
    /// `None` = only the hard cap applies.
    pub max_selection_limit: Option<usize>,
    /// Minimum accepted password length.
    pub min_password_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_selection_limit: None,
            min_password_len: MIN_PASSWORD_LEN,
        }
    }
}

impl ClientConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidBaseUrl(self.api_base_url.clone()));
        }
        if self.max_selection_limit == Some(0) {
            return Err(ConfigError::ZeroSelectionLimit);
        }
        Ok(())
    }

    /// Resolve a server-supplied avatar or icon path.
    ///
    /// Absolute `http…` URLs pass through; anything else is appended to the
    /// base URL. Empty paths mean "no image".
    pub fn resolve_avatar_url(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http") {
            return Some(path.to_string());
        }
        let base = self.api_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            Some(format!("{}{}", base, path))
        } else {
            Some(format!("{}/{}", base, path))
        }
    }

    /// Rewrite each candidate's avatar path into a full URL.
    pub fn resolve_avatars(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates
            .into_iter()
            .map(|mut c| {
                c.avatar_ref = c
                    .avatar_ref
                    .as_deref()
                    .and_then(|path| self.resolve_avatar_url(path));
                c
            })
            .collect()
    }

    /// Validate a change-password form against `min_password_len`.
    pub fn check_password_change(
        &self,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<PasswordChange, FormError> {
        validate_password_change(
            old_password,
            new_password,
            confirm_password,
            self.min_password_len,
        )
    }
}
