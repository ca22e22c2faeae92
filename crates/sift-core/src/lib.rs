#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Sift Core
//!
//! Request construction for a document-oriented search engine: structured
//! filter requests, the query compiler that turns them into boolean query
//! documents, and the error taxonomy shared with the gateways.
//!
//! Nothing in this crate performs I/O.
//!
//! # Example
//!
//! ```
//! use sift_core::{FilterRequest, QueryCompiler};
//!
//! let request = FilterRequest::new(0, 10)
//!     .filter("FirstName", "John")
//!     .filter("City", "New York");
//!
//! let document = QueryCompiler::default().compile(&request)?;
//! assert_eq!(document.filter_group().map(|g| g.len()), Some(2));
//! # Ok::<(), sift_core::Error>(())
//! ```

pub mod compiler;
pub mod condition;
pub mod customer;
pub mod document;
pub mod error;
mod proptests;
pub mod request;
pub mod schema;

// Re-exports for convenience
pub use compiler::{CompilerConfig, QueryCompiler};
pub use condition::{FilterCondition, MatchMode};
pub use customer::{Customer, CustomerQuery};
pub use document::{Clause, QueryDocument, SortDirection, SortField};
pub use error::{Error, Result};
pub use request::{FieldFilter, FilterRequest};
pub use schema::FieldAllowList;
