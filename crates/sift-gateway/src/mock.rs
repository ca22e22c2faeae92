//! In-memory [`Transport`] for tests and offline use.
//!
//! `MockTransport` behaves like a tiny engine: indexed documents are kept
//! per index and id, and searches evaluate the subset of the query language
//! the compiler emits (`match_all`, `match`, `multi_match`, nested
//! `bool.must`, `from`/`size`). Writes without `refresh` stay invisible
//! until [`MockTransport::refresh`] runs or a later write refreshes.
//!
//! It can also be told to fail every call, and it records every call so
//! tests can assert on exact wire bodies.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use sift_core::{Error, Result};

use crate::transport::{Transport, TransportResponse};

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// A search call.
    Search {
        /// Target index.
        index: String,
        /// Request body.
        body: Vec<u8>,
    },
    /// An index call.
    Index {
        /// Target index.
        index: String,
        /// Document id.
        id: String,
        /// Request body.
        body: Vec<u8>,
        /// Whether immediate visibility was requested.
        refresh: bool,
    },
}

#[derive(Debug, Clone)]
enum Behavior {
    Engine,
    Respond(TransportResponse),
    Unreachable(String),
}

#[derive(Debug, Default)]
struct Shard {
    visible: BTreeMap<String, Value>,
    pending: BTreeMap<String, Value>,
}

impl Shard {
    fn refresh(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        self.visible.extend(pending);
    }
}

#[derive(Debug, Default)]
struct State {
    shards: BTreeMap<String, Shard>,
    calls: Vec<RecordedCall>,
}

/// In-memory engine double.
#[derive(Debug)]
pub struct MockTransport {
    behavior: Behavior,
    state: Mutex<State>,
}

impl MockTransport {
    /// Create an empty in-memory engine.
    pub fn new() -> Self {
        Self {
            behavior: Behavior::Engine,
            state: Mutex::new(State::default()),
        }
    }

    /// Answer every call with the same status and body.
    pub fn with_response(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            behavior: Behavior::Respond(TransportResponse::new(status, body)),
            state: Mutex::new(State::default()),
        }
    }

    /// Fail every call with a transport error.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            behavior: Behavior::Unreachable(message.into()),
            state: Mutex::new(State::default()),
        }
    }

    /// Make all pending writes in every index searchable.
    pub fn refresh(&self) {
        let mut state = self.lock();
        for shard in state.shards.values_mut() {
            shard.refresh();
        }
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Number of searchable documents in `index`.
    pub fn visible_count(&self, index: &str) -> usize {
        self.lock()
            .shards
            .get(index)
            .map_or(0, |shard| shard.visible.len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked mid-call.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn canned(&self) -> Option<Result<TransportResponse>> {
        match &self.behavior {
            Behavior::Engine => None,
            Behavior::Respond(response) => Some(Ok(response.clone())),
            Behavior::Unreachable(message) => Some(Err(Error::transport(message.clone()))),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn search(&self, index: &str, body: Vec<u8>) -> Result<TransportResponse> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Search {
            index: index.to_string(),
            body: body.clone(),
        });
        if let Some(canned) = self.canned() {
            return canned;
        }

        let Some(shard) = state.shards.get(index) else {
            return Ok(error_response(
                404,
                "index_not_found_exception",
                &format!("no such index [{index}]"),
            ));
        };
        let request: Value = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => return Ok(error_response(400, "parsing_exception", &e.to_string())),
        };

        let matched: Vec<(&String, &Value)> = shard
            .visible
            .iter()
            .filter(|(_, source)| matches(&request["query"], source))
            .collect();
        let from = request["from"].as_u64().unwrap_or(0) as usize;
        let size = request["size"].as_u64().unwrap_or(10) as usize;

        let hits: Vec<Value> = matched
            .iter()
            .skip(from)
            .take(size)
            .map(|(id, source)| json!({"_index": index, "_id": id, "_source": source}))
            .collect();
        let result = json!({
            "hits": {
                "total": {"value": matched.len(), "relation": "eq"},
                "hits": hits,
            }
        });
        Ok(TransportResponse::new(200, result.to_string()))
    }

    async fn index(
        &self,
        index: &str,
        id: &str,
        body: Vec<u8>,
        refresh: bool,
    ) -> Result<TransportResponse> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Index {
            index: index.to_string(),
            id: id.to_string(),
            body: body.clone(),
            refresh,
        });
        if let Some(canned) = self.canned() {
            return canned;
        }

        let source: Value = match serde_json::from_slice(&body) {
            Ok(source) => source,
            Err(e) => return Ok(error_response(400, "document_parsing_exception", &e.to_string())),
        };

        let shard = state.shards.entry(index.to_string()).or_default();
        let existed = shard.visible.contains_key(id) || shard.pending.contains_key(id);
        shard.pending.insert(id.to_string(), source);
        if refresh {
            shard.refresh();
        }

        let (status, result) = if existed {
            (200, "updated")
        } else {
            (201, "created")
        };
        let body = json!({"_index": index, "_id": id, "result": result});
        Ok(TransportResponse::new(status, body.to_string()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn error_response(status: u16, kind: &str, reason: &str) -> TransportResponse {
    let body = json!({"error": {"type": kind, "reason": reason}, "status": status});
    TransportResponse::new(status, body.to_string())
}

/// Evaluate a query clause against a document source.
fn matches(clause: &Value, source: &Value) -> bool {
    let Some(object) = clause.as_object() else {
        return true;
    };
    object.iter().all(|(kind, body)| match kind.as_str() {
        "match_all" => true,
        "bool" => body["must"]
            .as_array()
            .is_none_or(|must| must.iter().all(|c| matches(c, source))),
        "match" => body.as_object().is_some_and(|fields| {
            fields
                .iter()
                .all(|(field, value)| field_text(source, field) == value_text(value))
        }),
        "multi_match" => {
            let query = body["query"].as_str().unwrap_or_default().to_lowercase();
            body["fields"].as_array().is_some_and(|fields| {
                fields.iter().filter_map(Value::as_str).any(|field| {
                    field_text(source, field)
                        .is_some_and(|text| text.to_lowercase().starts_with(&query))
                })
            })
        }
        _ => false,
    })
}

fn field_text(source: &Value, field: &str) -> Option<String> {
    value_text(source.get(field)?)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
