//! reqwest-backed [`Transport`].
//!
//! Endpoints follow the engine's REST layout:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | search | `POST {url}/{index}/_search` |
//! | index | `PUT {url}/{index}/_doc/{id}[?refresh=true]` |
//!
//! Index names and ids are percent-encoded as single path segments.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use sift_core::{Error, Result};

use crate::transport::{Transport, TransportResponse};

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpTransportConfig {
    /// Base URL of the engine.
    #[serde(default = "default_url")]
    pub url: String,

    /// Basic auth user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Basic auth password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Whole-request timeout, handed straight to the HTTP client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            timeout_secs: None,
        }
    }
}

/// HTTP transport to a single engine endpoint.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl HttpTransport {
    /// Create a transport from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unusable URL and
    /// [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &HttpTransportConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url)
            .map_err(|e| Error::config(format!("invalid engine url '{}': {e}", config.url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "engine url '{}' cannot carry a path",
                config.url
            )));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::transport_with_source("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("engine url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<TransportResponse> {
        let request = match self.username {
            Some(ref user) => request.basic_auth(user, self.password.as_ref()),
            None => request,
        };

        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "engine request failed");
                Error::transport_with_source(format!("request to {url} failed"), e)
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            Error::transport_with_source(format!("failed to read response from {url}"), e)
        })?;

        tracing::debug!(%url, status, bytes = body.len(), "engine responded");
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn search(&self, index: &str, body: Vec<u8>) -> Result<TransportResponse> {
        let url = self.endpoint(&[index, "_search"])?;
        tracing::debug!(%url, "sending search request");
        self.send(self.client.post(url.clone()).body(body), &url)
            .await
    }

    async fn index(
        &self,
        index: &str,
        id: &str,
        body: Vec<u8>,
        refresh: bool,
    ) -> Result<TransportResponse> {
        let mut url = self.endpoint(&[index, "_doc", id])?;
        if refresh {
            url.query_pairs_mut().append_pair("refresh", "true");
        }
        tracing::debug!(%url, refresh, "sending index request");
        self.send(self.client.put(url.clone()).body(body), &url)
            .await
    }

    fn name(&self) -> &str {
        "http"
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpTransportConfig::default();
        assert_eq!(config.url, "http://localhost:9200");
        assert!(config.username.is_none());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_config_deserialization_with_defaults() {
        let config: HttpTransportConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.url, "http://localhost:9200");
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let config = HttpTransportConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let transport = HttpTransport::new(&HttpTransportConfig {
            url: "http://localhost:9200/engine/".to_string(),
            ..Default::default()
        })
        .unwrap();

        let url = transport.endpoint(&["customers", "_doc", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9200/engine/customers/_doc/a%2Fb%20c"
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let transport = HttpTransport::new(&HttpTransportConfig {
            username: Some("elastic".to_string()),
            password: Some("s3cret".to_string()),
            ..Default::default()
        })
        .unwrap();
        let debug = format!("{transport:?}");
        assert!(debug.contains("elastic"));
        assert!(!debug.contains("s3cret"));
    }
}
