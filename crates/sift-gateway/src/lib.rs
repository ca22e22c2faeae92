#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Sift Gateway
//!
//! Thin orchestration between compiled queries and a search engine:
//!
//! - [`SearchGateway`]: send a [`QueryDocument`](sift_core::QueryDocument),
//!   get the raw [`ResultSet`] back
//! - [`IndexingGateway`]: upsert a serializable entity under an explicit id
//! - [`Transport`]: the capability both gateways call through, with a
//!   reqwest-backed [`HttpTransport`] and an in-memory [`MockTransport`]
//!
//! Gateways hold no mutable state and never retry. Every call is
//! all-or-nothing and reports failures through [`sift_core::Error`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sift_core::{FilterRequest, QueryCompiler};
//! use sift_gateway::{HttpTransport, HttpTransportConfig, SearchGateway};
//!
//! let transport = Arc::new(HttpTransport::new(&HttpTransportConfig::default())?);
//! let gateway = SearchGateway::new(transport, "customer_index");
//!
//! let document = QueryCompiler::default()
//!     .compile(&FilterRequest::new(0, 10).filter("FirstName", "John"))?;
//! let results = gateway.search(&document).await?;
//! println!("{}", results.as_value());
//! ```

pub mod http;
pub mod indexing;
pub mod mock;
pub mod search;
pub mod transport;

pub use http::{HttpTransport, HttpTransportConfig};
pub use indexing::{IndexingGateway, IndexingOptions};
pub use mock::{MockTransport, RecordedCall};
pub use search::{ResultSet, SearchGateway};
pub use transport::{Transport, TransportResponse};
