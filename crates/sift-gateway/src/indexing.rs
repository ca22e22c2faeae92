//! Indexing gateway.
//!
//! Serializes an entity and writes it under an explicit id, replacing any
//! earlier document with that id. Whether the write must be searchable
//! before the call returns is a per-gateway option because forcing a
//! refresh on every write costs throughput.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sift_core::{Error, Result};

use crate::transport::Transport;

/// Indexing settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingOptions {
    /// Make each write searchable before `upsert` returns.
    #[serde(default)]
    pub immediate_visibility: bool,
}

/// Upserts documents into a single index.
#[derive(Clone)]
pub struct IndexingGateway {
    transport: Arc<dyn Transport>,
    index: String,
    options: IndexingOptions,
}

impl IndexingGateway {
    /// Create a gateway for `index`.
    pub fn new(
        transport: Arc<dyn Transport>,
        index: impl Into<String>,
        options: IndexingOptions,
    ) -> Self {
        Self {
            transport,
            index: index.into(),
            options,
        }
    }

    /// Target index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Indexing settings.
    pub fn options(&self) -> IndexingOptions {
        self.options
    }

    /// Create or overwrite document `id`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] for an empty id
    /// - [`Error::Serialization`] if `entity` cannot be encoded
    /// - [`Error::Transport`] / [`Error::Engine`] as for search
    pub async fn upsert<E>(&self, id: &str, entity: &E) -> Result<()>
    where
        E: Serialize + Sync + ?Sized,
    {
        if id.is_empty() {
            return Err(Error::invalid_field("id", "document id must not be empty"));
        }

        let body = serde_json::to_vec(entity)?;
        self.transport
            .index(&self.index, id, body, self.options.immediate_visibility)
            .await?
            .into_success_body()?;
        Ok(())
    }
}

impl std::fmt::Debug for IndexingGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexingGateway")
            .field("transport", &self.transport.name())
            .field("index", &self.index)
            .field("options", &self.options)
            .finish()
    }
}
