//! Records written to the transaction log, one JSON object per line.

use algo_core::Algorithm;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Timestamp layout shared by both log streams' entries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One API call, successful or rejected. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLogEntry {
    pub timestamp: String,
    /// Also printed on the matching operational log line.
    pub request_id: String,
    pub algorithm: Algorithm,
    /// Parsed request body; `null` when the body was missing or not JSON.
    pub request: Value,
    pub response: Value,
    /// Always serialized: `null` means no algorithm ran.
    pub execution_time_ms: Option<f64>,
}

impl TransactionLogEntry {
    pub fn new(
        algorithm: Algorithm,
        request: Option<&Value>,
        response: Value,
        execution_time_ms: Option<f64>,
    ) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            algorithm,
            request: request.cloned().unwrap_or(Value::Null),
            response,
            execution_time_ms,
        }
    }
}

/// Written once at startup so restarts are visible in the transaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceMarker {
    pub timestamp: String,
    pub event: String,
    pub message: String,
    pub version: String,
}

impl ServiceMarker {
    pub fn started(message: &str) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            event: "service_start".to_string(),
            message: message.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
