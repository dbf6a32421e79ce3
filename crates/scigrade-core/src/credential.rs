//! API credential lookup.
//!
//! Sources are tried in order: the managed-secrets file, the process
//! environment, then a `.env` file. Absence is not an error here; the evaluator reports it
//! before any request is built.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, DEFAULT_DOTENV_PATH};
use crate::error::ScigradeError;

/// Secret API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where a credential was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    SecretsFile(PathBuf),
    Environment(String),
    DotEnvFile(PathBuf),
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::SecretsFile(path) => write!(f, "secrets file {}", path.display()),
            CredentialSource::Environment(var) => write!(f, "environment variable {}", var),
            CredentialSource::DotEnvFile(path) => write!(f, "env file {}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CredentialProvider {
    secrets_path: PathBuf,
    dotenv_path: PathBuf,
    key_name: String,
}

impl CredentialProvider {
    pub fn new(secrets_path: impl Into<PathBuf>, key_name: impl Into<String>) -> Self {
        Self {
            secrets_path: secrets_path.into(),
            dotenv_path: PathBuf::from(DEFAULT_DOTENV_PATH),
            key_name: key_name.into(),
        }
    }

    pub fn with_dotenv(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = path.into();
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.secrets_path, &config.api_key_env).with_dotenv(&config.dotenv_path)
    }

    /// Resolve against the real process environment
    pub fn resolve(&self) -> Option<(ApiKey, CredentialSource)> {
        self.resolve_with(|var| std::env::var(var).ok())
    }

    pub fn resolve_with<F>(&self, lookup: F) -> Option<(ApiKey, CredentialSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = self.from_secrets_file() {
            return Some((key, CredentialSource::SecretsFile(self.secrets_path.clone())));
        }

        if let Some(value) = lookup(&self.key_name).filter(|value| !value.trim().is_empty()) {
            return Some((
                ApiKey::new(value.trim()),
                CredentialSource::Environment(self.key_name.clone()),
            ));
        }

        read_dotenv(&self.dotenv_path, &self.key_name)
            .map(|key| (key, CredentialSource::DotEnvFile(self.dotenv_path.clone())))
    }

    /// The error reported when no source yields a credential
    pub fn missing_error(&self) -> ScigradeError {
        ScigradeError::MissingCredential {
            env_var: self.key_name.clone(),
            secrets: self.secrets_path.display().to_string(),
        }
    }

    fn from_secrets_file(&self) -> Option<ApiKey> {
        read_secret(&self.secrets_path, &self.key_name)
    }
}

/// Read `key` from a TOML secrets file. Unreadable or malformed files are
/// skipped with a warning so the environment can still supply the key.
fn read_secret(path: &Path, key: &str) -> Option<ApiKey> {
    if !path.exists() {
        return None;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "secrets_unreadable");
            return None;
        }
    };

    let table: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "secrets_malformed");
            return None;
        }
    };

    table
        .get(key)
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ApiKey::new)
}

/// Read `key` from a `.env` file without touching the process environment.
fn read_dotenv(path: &Path, key: &str) -> Option<ApiKey> {
    if !path.exists() {
        return None;
    }

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "dotenv_unreadable");
            return None;
        }
    };

    for entry in entries {
        match entry {
            Ok((name, value)) if name == key => {
                let value = value.trim();
                return (!value.is_empty()).then(|| ApiKey::new(value));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "dotenv_malformed");
                return None;
            }
        }
    }
    None
}
