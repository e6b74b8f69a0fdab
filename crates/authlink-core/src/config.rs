//! Client configuration.
//!
//! Holds the auth service base URL and request timeout. Values come from
//! `~/.config/authlink/config.json` when present, then environment
//! variables (`AUTHLINK_AUTH_URL`, `AUTHLINK_TIMEOUT_SECS`) override them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::AuthClientBuilder;

/// Application name used for the config directory path
const APP_NAME: &str = "authlink";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const AUTH_URL_ENV: &str = "AUTHLINK_AUTH_URL";
pub const TIMEOUT_ENV: &str = "AUTHLINK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub auth_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_url: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    pub fn new(auth_url: impl Into<String>) -> Self {
        Self {
            auth_url: auth_url.into(),
            ..Self::default()
        }
    }

    /// Load from the user config file (if any), then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Read settings from the environment only. The auth URL is required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from a variable lookup alone, starting at defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup (normally the process env).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(AUTH_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.auth_url = url.trim().to_string();
        }
        if let Some(secs) = lookup(TIMEOUT_ENV) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds, got {:?}", TIMEOUT_ENV, secs))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth_url.trim().is_empty() {
            anyhow::bail!("auth URL is required (--auth-url, {} or config file)", AUTH_URL_ENV);
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request timeout must be at least one second");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Start building a client from these settings.
    pub fn client_builder(&self) -> AuthClientBuilder {
        AuthClientBuilder::new(self.auth_url.clone()).timeout(self.request_timeout())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
