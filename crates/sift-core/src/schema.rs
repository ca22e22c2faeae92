//! Caller-side field validation.
//!
//! The compiler accepts any field name. Deployments that want to reject
//! unknown fields before they reach the engine check requests against a
//! [`FieldAllowList`] first.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::request::FilterRequest;

/// Set of indexable field names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAllowList {
    fields: BTreeSet<String>,
}

impl FieldAllowList {
    /// Create an allow-list from field names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `field` is allowed.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Check every field named by `request`.
    ///
    /// Filters with empty values are checked too: an unknown name is a
    /// caller bug whether or not it is active on this call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] naming the first unknown field.
    pub fn check(&self, request: &FilterRequest) -> Result<()> {
        let named = request
            .field_filters
            .iter()
            .map(|f| f.field.as_str())
            .chain(request.free_text_fields.iter().map(String::as_str));

        for field in named {
            if !self.contains(field) {
                return Err(Error::invalid_field(field, "not an indexable field"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn allow_list() -> FieldAllowList {
        FieldAllowList::new(["FirstName", "LastName", "City"])
    }

    #[test]
    fn test_known_fields_pass() {
        let request = FilterRequest::new(0, 10)
            .filter("City", "Paris")
            .search_fields(["FirstName", "LastName"]);
        assert!(allow_list().check(&request).is_ok());
    }

    #[test]
    fn test_unknown_filter_field_rejected() {
        let request = FilterRequest::new(0, 10).filter("Nickname", "");
        let err = allow_list().check(&request).unwrap_err();
        let Error::InvalidRequest { field, .. } = err else {
            unreachable!("Expected InvalidRequest error variant");
        };
        assert_eq!(field.as_deref(), Some("Nickname"));
    }

    #[test]
    fn test_unknown_search_field_rejected() {
        let request = FilterRequest::new(0, 10).search_fields(["FirstName", "Bio"]);
        assert!(allow_list().check(&request).is_err());
    }
}
