//! Filter conditions and their wire encoding.
//!
//! A [`FilterCondition`] is one compiled constraint. It serializes to the
//! engine's query language:
//!
//! | Variant | Wire form |
//! |---------|-----------|
//! | `ExactFieldMatch` | `{"match": {field: value}}` |
//! | `MultiFieldTextMatch` | `{"multi_match": {"query", "fields", "type"}}` |

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Strategy used when matching a term against several fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Score by the single best-matching field.
    BestFields,
    /// Sum scores across all matching fields.
    MostFields,
    /// Treat the fields as one combined field.
    CrossFields,
    /// Exact phrase in any field.
    Phrase,
    /// Phrase with a prefix match on the last term.
    PhrasePrefix,
    /// Every term matched, the last one as a prefix (search-as-you-type).
    #[default]
    BoolPrefix,
}

impl MatchMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::BestFields => "best_fields",
            MatchMode::MostFields => "most_fields",
            MatchMode::CrossFields => "cross_fields",
            MatchMode::Phrase => "phrase",
            MatchMode::PhrasePrefix => "phrase_prefix",
            MatchMode::BoolPrefix => "bool_prefix",
        }
    }
}

/// A single compiled constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterCondition {
    /// `field` must match `value`.
    ExactFieldMatch {
        /// Indexed field name.
        field: String,
        /// Value to match.
        value: String,
    },
    /// `value` must match at least one of `fields` under `mode`.
    MultiFieldTextMatch {
        /// Fields searched, in declaration order.
        fields: Vec<String>,
        /// Free-text term.
        value: String,
        /// Matching strategy.
        mode: MatchMode,
    },
}

impl FilterCondition {
    /// Build an exact field match.
    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterCondition::ExactFieldMatch {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Build a multi-field text match.
    pub fn multi_field<I, S>(fields: I, value: impl Into<String>, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterCondition::MultiFieldTextMatch {
            fields: fields.into_iter().map(Into::into).collect(),
            value: value.into(),
            mode,
        }
    }
}

/// `{field: value}` as a one-entry map.
struct MatchBody<'a> {
    field: &'a str,
    value: &'a str,
}

impl Serialize for MatchBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field, self.value)?;
        map.end()
    }
}

#[derive(Serialize)]
struct MultiMatchBody<'a> {
    query: &'a str,
    fields: &'a [String],
    #[serde(rename = "type")]
    mode: MatchMode,
}

impl Serialize for FilterCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            FilterCondition::ExactFieldMatch { field, value } => {
                map.serialize_entry("match", &MatchBody { field, value })?;
            }
            FilterCondition::MultiFieldTextMatch {
                fields,
                value,
                mode,
            } => {
                map.serialize_entry(
                    "multi_match",
                    &MultiMatchBody {
                        query: value,
                        fields,
                        mode: *mode,
                    },
                )?;
            }
        }
        map.end()
    }
}
