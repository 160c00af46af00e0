//! HTTP client abstraction for testability

use std::time::Duration;

use bytes::BytesMut;
use thiserror::Error;
use tracing::{debug, warn};

use super::request::HttpRequest;

/// Errors from the HTTP executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// Client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// Request could not be sent or timed out
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Upstream answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Response body could not be read
    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },
}

/// Trait for HTTP client operations.
///
/// Implementations write the response body of a successful request into
/// `buffer`. The production client appends, so a caller that reuses one
/// buffer across requests accumulates their bodies in request order.
pub trait HttpClient: Send + Sync {
    /// Performs one HTTP GET request.
    fn do_request(&self, request: &HttpRequest<'_>, buffer: &mut BytesMut) -> Result<(), HttpError>;
}

impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn do_request(&self, request: &HttpRequest<'_>, buffer: &mut BytesMut) -> Result<(), HttpError> {
        (**self).do_request(request, buffer)
    }
}

/// Real HTTP client implementation using blocking reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new ReqwestClient with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with a custom request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        Self::build(reqwest::blocking::Client::builder().timeout(Duration::from_secs(timeout_secs)))
    }

    /// Creates a client from the `[http]` settings.
    pub fn from_settings(settings: &crate::config::HttpSettings) -> Result<Self, HttpError> {
        Self::build(
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(settings.timeout))
                .connect_timeout(Duration::from_secs(settings.connect_timeout))
                .user_agent(settings.user_agent.clone()),
        )
    }

    fn build(builder: reqwest::blocking::ClientBuilder) -> Result<Self, HttpError> {
        let client = builder
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn do_request(&self, request: &HttpRequest<'_>, buffer: &mut BytesMut) -> Result<(), HttpError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().map_err(|e| HttpError::Request {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %request.url, status = status.as_u16(), "upstream returned error status");
            return Err(HttpError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| HttpError::Body {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        debug!(url = %request.url, bytes = body.len(), "upstream fetch complete");
        buffer.extend_from_slice(&body);
        Ok(())
    }
}
