//! Search gateway.
//!
//! Sends a compiled [`QueryDocument`] to one index and returns the engine's
//! response untouched as a [`ResultSet`]. One transport call per search, no
//! retries.

use std::sync::Arc;

use serde_json::Value;
use sift_core::{QueryDocument, Result};

use crate::transport::Transport;

/// Raw engine search response.
///
/// Deliberately opaque: hit structure, totals, and aggregations are the
/// caller's business.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet(Value);

impl ResultSet {
    /// Borrow the response document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the response document.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<ResultSet> for Value {
    fn from(results: ResultSet) -> Self {
        results.0
    }
}

/// Runs compiled queries against a single index.
#[derive(Clone)]
pub struct SearchGateway {
    transport: Arc<dyn Transport>,
    index: String,
}

impl SearchGateway {
    /// Create a gateway for `index`.
    pub fn new(transport: Arc<dyn Transport>, index: impl Into<String>) -> Self {
        Self {
            transport,
            index: index.into(),
        }
    }

    /// Target index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Execute a search.
    ///
    /// # Errors
    ///
    /// - [`Error::Serialization`](sift_core::Error::Serialization) if the
    ///   document cannot be encoded or the response is not JSON
    /// - [`Error::Transport`](sift_core::Error::Transport) on connection
    ///   failure
    /// - [`Error::Engine`](sift_core::Error::Engine) on a non-2xx status
    pub async fn search(&self, document: &QueryDocument) -> Result<ResultSet> {
        let body = document.to_json_bytes()?;
        let response = self.transport.search(&self.index, body).await?;
        let body = response.into_success_body()?;
        Ok(ResultSet(serde_json::from_slice(&body)?))
    }
}

impl std::fmt::Debug for SearchGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchGateway")
            .field("transport", &self.transport.name())
            .field("index", &self.index)
            .finish()
    }
}
