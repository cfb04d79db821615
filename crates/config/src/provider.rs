//! Strategies for resolving [`ConnectionSettings`] at startup.
//!
//! [`FlagProvider`] takes values supplied on the command line or through the
//! environment. [`StoredProvider`] reads the credential store and, on first
//! use, asks for the missing values and saves them.

use std::io;

use dradis_search_auth::{CredentialStore, API_KEY_KEY, BASE_URL_KEY};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::settings::ConnectionSettings;

pub trait CredentialProvider {
    fn resolve(&mut self) -> Result<ConnectionSettings>;
}

/// Source of interactive answers.
pub trait Prompt {
    /// Ask for a value. `secret` answers must not be echoed.
    fn ask(&mut self, label: &str, secret: bool) -> io::Result<String>;
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn ask(&mut self, label: &str, secret: bool) -> io::Result<String> {
        (**self).ask(label, secret)
    }
}

#[derive(Debug, Clone)]
pub struct FlagProvider {
    base_url: Option<String>,
    api_key: Option<String>,
    term: String,
}

impl FlagProvider {
    pub fn new(base_url: Option<String>, api_key: Option<String>, term: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key,
            term: term.into(),
        }
    }
}

impl CredentialProvider for FlagProvider {
    fn resolve(&mut self) -> Result<ConnectionSettings> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(ConfigError::MissingField("base URL"))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingField("API key"))?;

        ConnectionSettings::new(base_url, api_key, &self.term)
    }
}

pub struct StoredProvider<P> {
    store: CredentialStore,
    prompt: P,
    term: String,
}

impl<P: Prompt> StoredProvider<P> {
    pub fn new(store: CredentialStore, prompt: P, term: impl Into<String>) -> Self {
        Self {
            store,
            prompt,
            term: term.into(),
        }
    }

    fn load(&self) -> Result<(Option<String>, Option<String>)> {
        let mut creds = self.store.load()?;
        let non_empty = |v: String| Some(v).filter(|s| !s.trim().is_empty());
        Ok((
            creds.remove(BASE_URL_KEY).and_then(non_empty),
            creds.remove(API_KEY_KEY).and_then(non_empty),
        ))
    }

    fn ask(&mut self, field: &'static str, label: &str, secret: bool) -> Result<String> {
        let answer = self
            .prompt
            .ask(label, secret)
            .map_err(|source| ConfigError::Prompt { field, source })?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ConfigError::MissingField(field));
        }
        Ok(answer.to_string())
    }

    fn bootstrap(&mut self) -> Result<(String, String)> {
        info!(
            path = %self.store.path().display(),
            "No saved Dradis connection settings, requesting them"
        );

        let base_url = self.ask("base URL", "Dradis base URL: ", false)?;
        let api_key = self.ask("API key", "Dradis API key: ", true)?;

        // Reject a bad URL before it gets persisted.
        ConnectionSettings::new(&base_url, &api_key, &self.term)?;

        self.store
            .set_all([(BASE_URL_KEY, base_url.as_str()), (API_KEY_KEY, api_key.as_str())])?;

        match self.load()? {
            (Some(stored_url), _) if stored_url != base_url => Err(ConfigError::RoundTrip("base URL")),
            (_, Some(stored_key)) if stored_key != api_key => Err(ConfigError::RoundTrip("API key")),
            (Some(stored_url), Some(stored_key)) => {
                info!(path = %self.store.path().display(), "Connection settings saved");
                Ok((stored_url, stored_key))
            }
            (None, _) => Err(ConfigError::RoundTrip("base URL")),
            (_, None) => Err(ConfigError::RoundTrip("API key")),
        }
    }
}

impl<P: Prompt> CredentialProvider for StoredProvider<P> {
    fn resolve(&mut self) -> Result<ConnectionSettings> {
        let (base_url, api_key) = match self.load()? {
            (Some(base_url), Some(api_key)) => {
                debug!(path = %self.store.path().display(), "Loaded saved connection settings");
                (base_url, api_key)
            }
            _ => self.bootstrap()?,
        };

        ConnectionSettings::new(base_url, api_key, &self.term)
    }
}
