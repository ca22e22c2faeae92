//! Query compilation.
//!
//! [`QueryCompiler`] turns a [`FilterRequest`] into a [`QueryDocument`]:
//!
//! 1. Validate pagination (`limit > 0`, `offset >= 0`) and reject field
//!    filters that name the same field twice.
//! 2. Seed the document with pagination, the configured sort, and a
//!    `match_all` clause.
//! 3. Compile one exact match per non-empty field filter, in declaration
//!    order.
//! 4. Compile one multi-field match when both a free-text term and
//!    free-text fields are present.
//! 5. Append the compiled conditions as a single nested AND group.
//!
//! Field names are not checked against any schema here; see
//! [`FieldAllowList`](crate::FieldAllowList) for caller-side validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::condition::{FilterCondition, MatchMode};
use crate::document::{QueryDocument, SortDirection, SortField};
use crate::error::{Error, Result};
use crate::request::FilterRequest;

/// Compiler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Timestamp-like field every result page is sorted on.
    #[serde(default = "default_sort_field")]
    pub sort_field: String,

    /// Direction of the sort.
    #[serde(default)]
    pub sort_direction: SortDirection,

    /// Strategy for free-text matching.
    #[serde(default)]
    pub match_mode: MatchMode,
}

fn default_sort_field() -> String {
    "CreatedAt".to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            sort_field: default_sort_field(),
            sort_direction: SortDirection::default(),
            match_mode: MatchMode::default(),
        }
    }
}

/// Compiles filter requests into query documents.
///
/// Holds only configuration; `compile` is pure and may be called from any
/// number of threads at once.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl QueryCompiler {
    /// Create a compiler with the given settings.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Get the settings.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] when `limit <= 0`, `offset < 0`,
    /// or a field appears in more than one field filter.
    pub fn compile(&self, request: &FilterRequest) -> Result<QueryDocument> {
        let (offset, limit) = validate_pagination(request)?;
        validate_unique_fields(request)?;

        let sort = vec![SortField::new(
            self.config.sort_field.clone(),
            self.config.sort_direction,
        )];
        let mut document = QueryDocument::base(offset, limit, sort);

        let mut conditions: Vec<FilterCondition> = request
            .active_filters()
            .map(|f| FilterCondition::exact(f.field.clone(), f.value.clone()))
            .collect();

        if let Some(text) = request.active_query()
            && !request.free_text_fields.is_empty()
        {
            conditions.push(FilterCondition::multi_field(
                request.free_text_fields.iter().cloned(),
                text,
                self.config.match_mode,
            ));
        }

        document.push_group(conditions);
        Ok(document)
    }
}

fn validate_pagination(request: &FilterRequest) -> Result<(u64, u64)> {
    if request.limit <= 0 {
        return Err(Error::invalid_field(
            "limit",
            format!("must be positive, got {}", request.limit),
        ));
    }
    let offset = u64::try_from(request.offset).map_err(|_| {
        Error::invalid_field(
            "offset",
            format!("must not be negative, got {}", request.offset),
        )
    })?;
    // limit > 0 was checked above
    let limit = request.limit.unsigned_abs();
    Ok((offset, limit))
}

fn validate_unique_fields(request: &FilterRequest) -> Result<()> {
    let mut seen = HashSet::new();
    for filter in &request.field_filters {
        if !seen.insert(filter.field.as_str()) {
            return Err(Error::invalid_field(
                filter.field.clone(),
                "declared more than once",
            ));
        }
    }
    Ok(())
}
