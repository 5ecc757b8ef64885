use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;

// Form field carrying the request document
pub const OTA_REQUEST_FIELD: &str = "OTA_request";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),
}

// The server expects `&` as %26 and nothing else percent-encoded
pub fn encode_form_value(value: &str) -> String {
    value.replace('&', "%26")
}

// `value` must already be encoded with `encode_form_value`
pub fn form_body(field: &str, value: &str) -> String {
    format!("{}={}", field, value)
}

/// Sends one form-encoded POST and hands back the raw response text.
///
/// The value arrives already encoded and is sent exactly as given.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(
        &self,
        endpoint: &str,
        field: &str,
        value: &str,
    ) -> Result<String, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_form(
        &self,
        endpoint: &str,
        field: &str,
        value: &str,
    ) -> Result<String, TransportError> {
        let body = form_body(field, value);
        debug!(endpoint, bytes = body.len(), "Posting form");

        let mut request = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
