//! Structured filter requests.
//!
//! A [`FilterRequest`] is what callers hand to the
//! [`QueryCompiler`](crate::QueryCompiler): pagination bounds, exact-match
//! field filters in caller-declared order, and an optional free-text term.
//!
//! # Example
//!
//! ```
//! use sift_core::FilterRequest;
//!
//! let request = FilterRequest::new(0, 10)
//!     .filter("FirstName", "John")
//!     .filter("City", "New York")
//!     .query("jo")
//!     .search_fields(["FirstName", "LastName"]);
//!
//! assert_eq!(request.field_filters.len(), 2);
//! assert_eq!(request.field_filters[0].field, "FirstName");
//! ```

use serde::{Deserialize, Serialize};

/// One exact-match filter. An empty `value` means "no filter on this field".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    /// Indexed field name.
    pub field: String,
    /// Value the field must match.
    pub value: String,
}

impl FieldFilter {
    /// Create a new field filter.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether this filter constrains anything.
    pub fn is_active(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Parameters for a filtered, paginated search.
///
/// `offset` and `limit` are signed so that out-of-range input survives
/// deserialization and is rejected by the compiler with a typed error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Number of hits to skip.
    #[serde(default)]
    pub offset: i64,

    /// Maximum number of hits to return.
    pub limit: i64,

    /// Exact-match filters, compiled in declaration order.
    #[serde(default)]
    pub field_filters: Vec<FieldFilter>,

    /// Free-text term matched against `free_text_fields`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_text_query: Option<String>,

    /// Fields eligible for free-text matching.
    #[serde(default)]
    pub free_text_fields: Vec<String>,
}

impl FilterRequest {
    /// Create a request with pagination only.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            field_filters: Vec::new(),
            free_text_query: None,
            free_text_fields: Vec::new(),
        }
    }

    /// Set an exact-match filter.
    ///
    /// A field already present keeps its position and takes the new value.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let filter = FieldFilter::new(field, value);
        match self.field_filters.iter_mut().find(|f| f.field == filter.field) {
            Some(existing) => existing.value = filter.value,
            None => self.field_filters.push(filter),
        }
        self
    }

    /// Set the free-text term.
    pub fn query(mut self, text: impl Into<String>) -> Self {
        self.free_text_query = Some(text.into());
        self
    }

    /// Replace the list of free-text fields.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.free_text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Filters that carry a non-empty value, in declaration order.
    pub fn active_filters(&self) -> impl Iterator<Item = &FieldFilter> {
        self.field_filters.iter().filter(|f| f.is_active())
    }

    /// The free-text term, if present and non-empty.
    pub fn active_query(&self) -> Option<&str> {
        self.free_text_query.as_deref().filter(|q| !q.is_empty())
    }
}
