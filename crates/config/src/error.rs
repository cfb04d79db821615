use dradis_search_auth::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to read {field} from the terminal: {source}")]
    Prompt {
        field: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to load or save connection settings: {0}")]
    Persist(#[from] StoreError),

    #[error("Stored {0} did not match the value just written")]
    RoundTrip(&'static str),
}

impl ConfigError {
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ConfigError::MissingField("search term") => {
                Some("Pass a non-blank term with --term, e.g. --term \"sql injection\"")
            }
            ConfigError::MissingField(_) => Some(
                "Pass --base-url and --api-key, or run without them to be prompted and save them",
            ),
            ConfigError::InvalidBaseUrl { .. } => {
                Some("Use the full Dradis address, e.g. https://dradis.example.com/pro")
            }
            ConfigError::Persist(_) | ConfigError::RoundTrip(_) => {
                Some("Check that the credentials file location is writable")
            }
            ConfigError::Prompt { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
