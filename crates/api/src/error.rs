use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("{status}: resource at {url} not found")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Invalid response format from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl ApiError {
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::UnexpectedStatus { status: 401, .. } => {
                Some("Verify your Dradis API key (see your Dradis profile page)")
            }
            ApiError::UnexpectedStatus { status: 403, .. } => {
                Some("Your account may not have access to this project")
            }
            ApiError::UnexpectedStatus { status: 404, .. } => {
                Some("Check the base URL; it usually ends with /pro")
            }
            ApiError::Timeout { .. } => Some("Check your network connection or try again later"),
            ApiError::InvalidResponse { .. } => {
                Some("The base URL may not point at a Dradis Pro instance")
            }
            ApiError::InvalidHeader(_) => Some("The API key contains characters that cannot be sent"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
