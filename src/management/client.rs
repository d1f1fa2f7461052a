//! HTTP implementation of [`LogStreamApi`] backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::error::ManagementError;
use super::model::LogStream;
use super::LogStreamApi;

const LOG_STREAMS_PATH: &str = "/api/v2/log-streams";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Default timeout applied to every management API request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the log-stream endpoints of the management API.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl ManagementClient {
    /// Create a client for a tenant domain such as `example.us.auth0.com`.
    ///
    /// A domain that already carries a scheme (`http://` or `https://`) is
    /// used as-is, which lets tests point the client at a local server.
    pub fn new(domain: &str, api_token: impl Into<String>) -> Result<Self, ManagementError> {
        Self::with_timeout(domain, api_token, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        domain: &str,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ManagementError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url(domain),
            api_token: api_token.into(),
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, LOG_STREAMS_PATH)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, LOG_STREAMS_PATH, id)
    }
}

#[async_trait]
impl LogStreamApi for ManagementClient {
    #[instrument(skip(self, log_stream), name = "management.create")]
    async fn create(&self, log_stream: &LogStream) -> Result<LogStream, ManagementError> {
        let response = self
            .http
            .post(self.collection_url())
            .bearer_auth(&self.api_token)
            .json(log_stream)
            .send()
            .await?;
        decode(response).await
    }

    #[instrument(skip(self), name = "management.read")]
    async fn read(&self, id: &str) -> Result<LogStream, ManagementError> {
        let response = self
            .http
            .get(self.item_url(id))
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        decode(response).await
    }

    #[instrument(skip(self, log_stream), name = "management.update")]
    async fn update(&self, id: &str, log_stream: &LogStream) -> Result<LogStream, ManagementError> {
        let response = self
            .http
            .patch(self.item_url(id))
            .bearer_auth(&self.api_token)
            .json(log_stream)
            .send()
            .await?;
        decode(response).await
    }

    #[instrument(skip(self), name = "management.delete")]
    async fn delete(&self, id: &str) -> Result<(), ManagementError> {
        let response = self
            .http
            .delete(self.item_url(id))
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await?;
        Err(error_from_body(status, &body))
    }
}

/// Error body returned by the management API.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ManagementError> {
    let status = response.status();
    let body = response.bytes().await?;
    debug!(status = status.as_u16(), bytes = body.len(), "management API response");

    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }
    Ok(serde_json::from_slice(&body)?)
}

fn error_from_body(status: StatusCode, body: &[u8]) -> ManagementError {
    let parsed: ApiErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let error = parsed
        .error
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string());
    let message = parsed
        .message
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
    ManagementError::status(status.as_u16(), error, message)
}

fn base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{}", domain)
    }
}
