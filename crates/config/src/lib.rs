pub mod error;
pub mod provider;
pub mod settings;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

pub use error::ConfigError;
pub use provider::{CredentialProvider, FlagProvider, Prompt, StoredProvider};
pub use settings::{ConnectionSettings, MatchField};

/// Behaviour options stored on disk. Connection credentials live in the
/// credential store, not here.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub match_field: Option<MatchField>,
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the provided path or the default config file.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file at {}", path.display()))?;

        if raw.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed YAML in config file {}", path.display()))
    }

    /// Flag value wins over the file, which wins over the default.
    pub fn resolve_match_field(&self, requested: Option<MatchField>) -> MatchField {
        requested.or(self.match_field).unwrap_or_default()
    }

    fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".dradis-search");
        path.push("config.yaml");
        path
    }
}
