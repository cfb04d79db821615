use clap::ValueEnum;
use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, Result};

/// Issue field the search term is compared against.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    /// The issue title
    #[default]
    Title,
    /// The issue's free-text body
    Text,
}

/// Everything needed to talk to Dradis for one run. Built once, never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    base_url: String,
    api_key: String,
    term: String,
}

impl ConnectionSettings {
    pub fn new(
        base_url: impl AsRef<str>,
        api_key: impl AsRef<str>,
        term: impl AsRef<str>,
    ) -> Result<Self> {
        let base_url = required("base URL", base_url.as_ref())?;
        let api_key = required("API key", api_key.as_ref())?;
        // The term is matched verbatim; surrounding spaces are significant.
        let term = term.as_ref();
        if term.trim().is_empty() {
            return Err(ConfigError::MissingField("search term"));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            term: term.to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Render `path` into the base URL template: `{base_url}/{path}`.
    pub fn resource_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

// Keep the API key out of debug logs.
impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("term", &self.term)
            .finish()
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConfigError::MissingField(field))
    } else {
        Ok(value)
    }
}
