use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

/// Key holding the Dradis base URL.
pub const BASE_URL_KEY: &str = "BASE_URL";
/// Key holding the Dradis API key.
pub const API_KEY_KEY: &str = "API_KEY";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Unable to access credentials file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed credentials file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Flat key-value store backed by a JSON file readable only by its owner.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.dradis-search/credentials`.
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(Self::new(home.join(".dradis-search").join("credentials")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored entry. A missing file is an empty store.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No credentials file");
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_all([(key, value)])
    }

    /// Merge `entries` into the store and rewrite the file.
    pub fn set_all<'a, I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut creds = self.load()?;
        for (key, value) in entries {
            creds.insert(key.to_string(), value.to_string());
        }
        self.write(&creds)
    }

    fn write(&self, creds: &BTreeMap<String, String>) -> Result<()> {
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(creds).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;

        debug!(path = %self.path.display(), entries = creds.len(), "Credentials saved");
        Ok(())
    }
}
