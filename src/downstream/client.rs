//! HTTP client for a single downstream endpoint.
//!
//! # Responsibilities
//! - Issue one GET per attempt and decode the JSON payload
//! - Classify every failure into an `AttemptError`
//!
//! # Classification
//! ```text
//! connect/reset/DNS            → Transport   (transient)
//! client-side timeout          → Timeout     (transient)
//! body {"kind", "message"}     → Remote      (propagated unchanged)
//! 5xx or 408 without that body → Status      (transient)
//! any other non-2xx            → Rejected
//! 2xx with undecodable body    → Decode
//! ```

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::http::response::ErrorBody;
use crate::resilience::outcome::AttemptError;

/// Errors building a downstream client.
#[derive(Debug, Error)]
pub enum DownstreamError {
    #[error("invalid downstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A fixed downstream endpoint.
#[derive(Debug, Clone)]
pub struct HttpDownstream {
    client: reqwest::Client,
    url: Url,
    attempt_timeout: Duration,
}

impl HttpDownstream {
    /// `base_url` joined with `path`, e.g. `http://127.0.0.1:5005` + `/weatherforecast`.
    pub fn new(base_url: &str, path: &str, attempt_timeout: Duration) -> Result<Self, DownstreamError> {
        let url = Url::parse(base_url)
            .and_then(|base| base.join(path))
            .map_err(|source| DownstreamError::InvalidUrl {
                url: format!("{base_url}{path}"),
                source,
            })?;

        let client = reqwest::Client::builder()
            .timeout(attempt_timeout)
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            url,
            attempt_timeout,
        })
    }

    /// Endpoint identity, used as the breaker key.
    pub fn endpoint(&self) -> &str {
        self.url.as_str()
    }

    /// One attempt: GET and decode.
    pub async fn fetch_json<T: DeserializeOwned>(&self) -> Result<T, AttemptError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|e| AttemptError::Decode(e.to_string()));
        }

        if let Ok(ErrorBody { kind, message }) = serde_json::from_slice::<ErrorBody>(&body) {
            return Err(AttemptError::Remote { kind, message });
        }

        if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
            Err(AttemptError::Status(status.as_u16()))
        } else {
            Err(AttemptError::Rejected(status.as_u16()))
        }
    }

    fn classify(&self, err: reqwest::Error) -> AttemptError {
        if err.is_timeout() {
            AttemptError::Timeout(self.attempt_timeout)
        } else {
            AttemptError::Transport(err.to_string())
        }
    }
}
