//! Configuration module for Balze

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::api::supabase::DEFAULT_BUCKET;
use crate::theme::Theme;
use crate::validation::ContentRules;

/// Environment variable overriding the session user id
pub const USER_ID_ENV: &str = "BALZE_USER_ID";

/// Environment variable overriding the session access token
pub const ACCESS_TOKEN_ENV: &str = "BALZE_ACCESS_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Selected theme
    #[serde(default)]
    pub theme: Theme,

    /// Backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Signed-in session
    #[serde(default)]
    pub session: SessionConfig,

    /// Composer behavior
    #[serde(default)]
    pub composer: ComposerConfig,

    /// Admin gate behavior
    #[serde(default)]
    pub gate: GateConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// Public (anon) API key
    #[serde(default)]
    pub anon_key: String,

    /// Storage bucket for post media
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            bucket: default_bucket(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Stored session (issued by the auth service, not by this crate)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Signed-in user id
    #[serde(default)]
    pub user_id: Option<Uuid>,

    /// Access token for the signed-in user
    #[serde(default)]
    pub access_token: Option<String>,
}

/// A session with both fields present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user id
    pub user_id: Uuid,
    /// Access token
    pub access_token: String,
}

/// Composer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Content limits applied by both composers
    #[serde(default)]
    pub rules: ContentRules,

    /// Notify users mentioned in quote posts too
    #[serde(default)]
    pub notify_quote_mentions: bool,
}

/// Admin gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Where viewers without access are sent
    #[serde(default = "default_redirect")]
    pub redirect_to: String,
}

fn default_redirect() -> String {
    "/".to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            redirect_to: default_redirect(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        crate::paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// The session, with environment variables taking precedence
    pub fn session(&self) -> Result<Session> {
        let user_id = match std::env::var(USER_ID_ENV) {
            Ok(value) => Some(
                value
                    .trim()
                    .parse()
                    .with_context(|| format!("{USER_ID_ENV} is not a valid UUID"))?,
            ),
            Err(_) => self.session.user_id,
        };
        let access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .or_else(|| self.session.access_token.clone());

        match (user_id, access_token) {
            (Some(user_id), Some(access_token)) => Ok(Session {
                user_id,
                access_token,
            }),
            _ => anyhow::bail!(
                "Not signed in: set [session] in the config file or {USER_ID_ENV} and {ACCESS_TOKEN_ENV}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.backend.bucket, "profiles");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.gate.redirect_to, "/");
        assert!(!config.composer.notify_quote_mentions);
        assert_eq!(config.composer.rules, ContentRules::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.backend.url = "https://project.supabase.co".to_string();
        config.composer.rules.max_chars = 280;
        config.composer.notify_quote_mentions = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backend.url, "https://project.supabase.co");
        assert_eq!(loaded.composer.rules.max_chars, 280);
        assert!(loaded.composer.notify_quote_mentions);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[composer.rules]\nmax_chars = 10\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.composer.rules.max_chars, 10);
        assert_eq!(config.composer.rules.min_chars, 1);
    }
}
