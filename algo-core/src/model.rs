//! Typed request and response bodies for each endpoint.
//!
//! Requests are validated from the raw JSON payload so the exact payload can
//! still be logged when validation fails. Echo fields stay as raw
//! [`Value`]s to keep the caller's shape and key order.

use crate::error::AlgoError;
use crate::value::NodeId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub const BODY_NOT_OBJECT: &str = "Request body must be a JSON object";

// ─────────────────────────────────────────────────────────────
// Algorithm names
// ─────────────────────────────────────────────────────────────

/// The algorithm behind an endpoint. `Display` yields the name written to logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    BinarySearch,
    QuickSort,
    Bfs,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::BinarySearch => "binary_search",
            Algorithm::QuickSort => "quick_sort",
            Algorithm::Bfs => "bfs",
        }
    }

    /// Fields that must be present in the request body.
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            Algorithm::BinarySearch => &["array", "target"],
            Algorithm::QuickSort => &["array"],
            Algorithm::Bfs => &["graph", "start_node"],
        }
    }

    /// Message returned when any required field is missing.
    pub fn missing_fields_message(self) -> &'static str {
        match self {
            Algorithm::BinarySearch => "Missing required fields: array and target required",
            Algorithm::QuickSort => "Missing required field: array",
            Algorithm::Bfs => "Missing required fields: graph and start_node required",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BinarySearchRequest {
    pub array: Vec<Value>,
    pub target: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickSortRequest {
    pub array: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BfsRequest {
    pub graph: HashMap<NodeId, Vec<NodeId>>,
    pub start_node: NodeId,
}

/// Validate a raw payload for `algorithm` and decode it into `T`.
///
/// Order of checks: payload is an object, every required field is present,
/// then the fields have the expected shape.
pub fn parse_request<T: DeserializeOwned>(
    algorithm: Algorithm,
    payload: Option<&Value>,
) -> Result<T, AlgoError> {
    let Some(Value::Object(fields)) = payload else {
        return Err(AlgoError::Validation(BODY_NOT_OBJECT.to_string()));
    };

    if algorithm
        .required_fields()
        .iter()
        .any(|name| !fields.contains_key(*name))
    {
        return Err(AlgoError::Validation(
            algorithm.missing_fields_message().to_string(),
        ));
    }

    serde_json::from_value(Value::Object(fields.clone()))
        .map_err(|e| AlgoError::Validation(format!("Invalid request payload: {e}")))
}

// ─────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    Online,
}

#[derive(Debug, Clone, Serialize)]
pub struct BinarySearchResponse {
    pub status: Status,
    pub original_array: Value,
    pub sorted_array: Vec<Value>,
    pub target: Value,
    pub found: bool,
    pub position: Option<usize>,
    pub execution_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickSortResponse {
    pub status: Status,
    pub original_array: Value,
    pub sorted_array: Vec<Value>,
    pub execution_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BfsResponse {
    pub status: Status,
    pub graph: Value,
    pub start_node: Value,
    pub traversal_path: Vec<Value>,
    pub execution_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: Status,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: Status,
    pub message: &'static str,
    pub endpoints: &'static [&'static str],
}

/// Every path the service answers on, bare paths first.
pub const ENDPOINTS: &[&str] = &[
    "/binary-search",
    "/quick-sort",
    "/bfs",
    "/api/binary-search",
    "/api/quick-sort",
    "/api/bfs",
];

impl HealthResponse {
    pub fn online() -> Self {
        Self {
            status: Status::Online,
            message: "Algorithm API is running",
            endpoints: ENDPOINTS,
        }
    }
}
