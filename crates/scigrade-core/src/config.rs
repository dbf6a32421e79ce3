//! Configuration for scigrade
//!
//! Configuration is read from `.scigrade/config.toml` when present (or an
//! explicit `--config` path), then overridden by `SCIGRADE_*` environment
//! variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bail_invalid;
use crate::error::{Result, ScigradeError};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".scigrade/config.toml";
/// Default managed-secrets file, relative to the working directory
pub const DEFAULT_SECRETS_PATH: &str = ".scigrade/secrets.toml";
/// Default environment file, relative to the working directory
pub const DEFAULT_DOTENV_PATH: &str = ".env";
/// Name of the credential, both as a secrets key and an environment variable
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Model identifier sent with every request
    pub model: String,

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Key looked up in the secrets file and the environment
    pub api_key_env: String,

    /// Managed-secrets file
    pub secrets_path: PathBuf,

    /// `KEY=value` environment file, consulted after the process environment
    pub dotenv_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH),
            dotenv_path: PathBuf::from(DEFAULT_DOTENV_PATH),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScigradeError::Other(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load an explicit config file, or the default one if it exists.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file silently yields the built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    tracing::debug!(path = %default_path.display(), "config_loaded");
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply `SCIGRADE_MODEL`, `SCIGRADE_API_BASE` and `SCIGRADE_TIMEOUT_SECS`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("SCIGRADE_MODEL").filter(|v| !v.trim().is_empty()) {
            self.model = model;
        }
        if let Some(base) = lookup("SCIGRADE_API_BASE").filter(|v| !v.trim().is_empty()) {
            self.api_base = base;
        }
        if let Some(raw) = lookup("SCIGRADE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => bail_invalid!("SCIGRADE_TIMEOUT_SECS", raw),
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail_invalid!("timeout_secs", "0 (must be at least 1)");
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            bail_invalid!("api_base", &self.api_base);
        }
        if self.model.trim().is_empty() {
            bail_invalid!("model", "(empty)");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the chat-completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}
