//! The transport collaborator.
//!
//! Gateways never talk to the network themselves. They hand encoded bodies
//! to a [`Transport`] and interpret the `(status, body)` pair it returns.
//! Connection setup, pooling, authentication, and timeouts all live behind
//! this trait.

use async_trait::async_trait;
use serde::Deserialize;
use sift_core::{Error, Result};

/// Raw engine response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Return the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Engine`] carrying the status and the engine's
    /// reason for any other status.
    pub fn into_success_body(self) -> Result<Vec<u8>> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(Error::engine(self.status, engine_reason(&self.body)))
        }
    }
}

/// Error envelope returned by the engine on failure.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured {
        #[serde(rename = "type")]
        kind: Option<String>,
        reason: Option<String>,
    },
    Plain(String),
}

/// Best human-readable reason in an error body.
fn engine_reason(body: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        match envelope.error {
            ErrorDetail::Structured {
                kind: Some(kind),
                reason: Some(reason),
            } => return format!("{kind}: {reason}"),
            ErrorDetail::Structured {
                kind: None,
                reason: Some(text),
            }
            | ErrorDetail::Structured {
                kind: Some(text),
                reason: None,
            }
            | ErrorDetail::Plain(text) => return text,
            ErrorDetail::Structured {
                kind: None,
                reason: None,
            } => {}
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "empty response body".to_string()
    } else {
        text
    }
}

/// Capability to reach the search engine.
///
/// Implementations must be safe to share across tasks; gateways call them
/// concurrently without coordination.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Run a search against `index` with an encoded query body.
    async fn search(&self, index: &str, body: Vec<u8>) -> Result<TransportResponse>;

    /// Write `body` as document `id` in `index`, replacing any previous
    /// version. When `refresh` is set the document must be searchable
    /// before the call returns.
    async fn index(
        &self,
        index: &str,
        id: &str,
        body: Vec<u8>,
        refresh: bool,
    ) -> Result<TransportResponse>;

    /// Transport name for diagnostics.
    fn name(&self) -> &str;
}
