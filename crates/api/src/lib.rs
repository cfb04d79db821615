pub mod error;
pub mod search;
pub mod types;

use std::time::Duration;

use dradis_search_config::ConnectionSettings;
use error::{ApiError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

pub use search::{matches, Match, SearchEngine};
pub use types::{Issue, Project};

/// Media type selecting version 2 of the Dradis Pro API.
pub const API_MEDIA_TYPE: &str = "application/vnd.dradisapi; v=2";

/// Header scoping an issues request to a single project.
pub const PROJECT_HEADER: &str = "Dradis-Project-Id";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct DradisClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl DradisClient {
    pub fn new(settings: &ConnectionSettings) -> Result<Self> {
        // Trailing slash keeps any path prefix (e.g. `/pro`) when joining.
        let base_url = Url::parse(&format!("{}/", settings.base_url()))?;

        let mut auth = HeaderValue::from_str(&format!("Token token=\"{}\"", settings.api_key()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(API_MEDIA_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(format!("dradis-search/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET {base}/api/projects`
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_collection("api/projects", None).await
    }

    /// `GET {base}/api/issues` scoped to `project_id`.
    pub async fn list_issues(&self, project_id: u64) -> Result<Vec<Issue>> {
        self.get_collection("api/issues", Some(project_id)).await
    }

    async fn get_collection<T: DeserializeOwned>(
        &self,
        resource: &str,
        project_id: Option<u64>,
    ) -> Result<Vec<T>> {
        let url = self.base_url.join(resource)?;

        debug!(method = "GET", url = %url, project_id, "Sending request");

        let mut req = self.client.get(url.clone()).timeout(self.timeout);
        if let Some(id) = project_id {
            req = req.header(PROJECT_HEADER, id.to_string());
        }

        let response = req.send().await.map_err(|e| self.transport_error(e, &url))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e, &url))?;

        serde_json::from_slice(&body).map_err(|e| {
            error!("Failed to parse JSON response: {}", e);
            ApiError::InvalidResponse {
                url: url.to_string(),
                message: e.to_string(),
            }
        })
    }

    fn transport_error(&self, err: reqwest::Error, url: &Url) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            ApiError::RequestFailed(err)
        }
    }
}
