//! Compiled query documents.
//!
//! A [`QueryDocument`] is the immutable output of the compiler. Its JSON
//! encoding is fixed, key order included:
//!
//! ```text
//! {
//!   "from": 0,
//!   "size": 10,
//!   "sort": [{"CreatedAt": {"order": "desc"}}],
//!   "query": {"bool": {"must": [
//!     {"match_all": {}},
//!     {"bool": {"must": [ ...filter conditions... ]}}
//!   ]}}
//! }
//! ```
//!
//! The second `must` element (the filter group) is present only when at
//! least one condition was compiled.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::condition::FilterCondition;
use crate::error::Result;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field to sort on.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

impl SortField {
    /// Create a sort key.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

#[derive(Serialize)]
struct SortOrder {
    order: SortDirection,
}

impl Serialize for SortField {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.field,
            &SortOrder {
                order: self.direction,
            },
        )?;
        map.end()
    }
}

/// An element of the top-level `must` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `{"match_all": {}}`
    MatchAll,
    /// Nested boolean AND over the compiled conditions.
    Group(Vec<FilterCondition>),
}

#[derive(Serialize)]
struct Empty {}

/// `{"must": [...]}`
#[derive(Serialize)]
struct BoolBody<'a, T: Serialize> {
    must: &'a [T],
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Clause::MatchAll => map.serialize_entry("match_all", &Empty {})?,
            Clause::Group(conditions) => {
                map.serialize_entry("bool", &BoolBody { must: conditions })?
            }
        }
        map.end()
    }
}

/// A complete search request body.
///
/// Only the compiler builds these, which keeps the "never empty" invariant:
/// `must_clauses` always starts with [`Clause::MatchAll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    offset: u64,
    limit: u64,
    sort: Vec<SortField>,
    must_clauses: Vec<Clause>,
}

impl QueryDocument {
    /// Base document: pagination, sort, and the match-everything clause.
    pub(crate) fn base(offset: u64, limit: u64, sort: Vec<SortField>) -> Self {
        Self {
            offset,
            limit,
            sort,
            must_clauses: vec![Clause::MatchAll],
        }
    }

    /// Append `conditions` as one nested AND group. No-op when empty.
    pub(crate) fn push_group(&mut self, conditions: Vec<FilterCondition>) {
        if !conditions.is_empty() {
            self.must_clauses.push(Clause::Group(conditions));
        }
    }

    /// Number of hits skipped (`from`).
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Page size (`size`).
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Sort keys, in priority order.
    pub fn sort(&self) -> &[SortField] {
        &self.sort
    }

    /// Top-level `must` clauses.
    pub fn must_clauses(&self) -> &[Clause] {
        &self.must_clauses
    }

    /// Conditions of the filter group, if any filter was active.
    pub fn filter_group(&self) -> Option<&[FilterCondition]> {
        self.must_clauses.iter().find_map(|clause| match clause {
            Clause::Group(conditions) => Some(conditions.as_slice()),
            Clause::MatchAll => None,
        })
    }

    /// Encode as the engine's JSON request body.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Encode as a JSON value (handy for inspection and tests).
    ///
    /// Object keys in the value are sorted, so use
    /// [`to_json_bytes`](Self::to_json_bytes) wherever order matters.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Serialize for QueryDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Query<'a> {
            bool: BoolBody<'a, Clause>,
        }

        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("from", &self.offset)?;
        map.serialize_entry("size", &self.limit)?;
        map.serialize_entry("sort", &self.sort)?;
        map.serialize_entry(
            "query",
            &Query {
                bool: BoolBody {
                    must: &self.must_clauses,
                },
            },
        )?;
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn created_desc() -> Vec<SortField> {
        vec![SortField::new("CreatedAt", SortDirection::Desc)]
    }

    #[test]
    fn test_base_document_wire_form() {
        let doc = QueryDocument::base(0, 10, created_desc());
        let text = String::from_utf8(doc.to_json_bytes().unwrap()).unwrap();
        assert_eq!(
            text,
            r#"{"from":0,"size":10,"sort":[{"CreatedAt":{"order":"desc"}}],"query":{"bool":{"must":[{"match_all":{}}]}}}"#
        );
    }

    #[test]
    fn test_group_is_nested_bool_must() {
        let mut doc = QueryDocument::base(20, 5, created_desc());
        doc.push_group(vec![FilterCondition::exact("City", "Paris")]);

        let value = doc.to_json_value().unwrap();
        assert_eq!(
            value["query"]["bool"]["must"],
            json!([
                {"match_all": {}},
                {"bool": {"must": [{"match": {"City": "Paris"}}]}}
            ])
        );
        assert_eq!(value["from"], 20);
        assert_eq!(value["size"], 5);
    }

    #[test]
    fn test_empty_group_is_not_pushed() {
        let mut doc = QueryDocument::base(0, 10, created_desc());
        doc.push_group(Vec::new());
        assert_eq!(doc.must_clauses(), &[Clause::MatchAll]);
        assert!(doc.filter_group().is_none());
    }

    #[test]
    fn test_sort_direction_serialization() {
        let field = SortField::new("Age", SortDirection::Asc);
        assert_eq!(
            serde_json::to_string(&field).unwrap(),
            r#"{"Age":{"order":"asc"}}"#
        );
    }
}
