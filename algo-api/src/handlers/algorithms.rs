//! POST handlers for the three algorithms.
//!
//! Flow per call: parse body → validate into the typed request → run the
//! algorithm under a timer → build the response → log one transaction.

use super::{ApiResponse, Completed, elapsed_ms, payload_value, respond};
use crate::server::AppState;
use algo_core::algorithms;
use algo_core::model::{
    BfsRequest, BfsResponse, BinarySearchRequest, BinarySearchResponse, QuickSortRequest,
    QuickSortResponse, Status, parse_request,
};
use algo_core::{Algorithm, AlgoError, Comparable, NodeId};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

pub async fn binary_search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResponse {
    let algorithm = Algorithm::BinarySearch;
    let payload = payload_value(payload);
    let outcome =
        parse_request::<BinarySearchRequest>(algorithm, payload.as_ref()).and_then(run_binary_search);
    respond(&state, algorithm, payload.as_ref(), outcome)
}

pub async fn quick_sort(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResponse {
    let algorithm = Algorithm::QuickSort;
    let payload = payload_value(payload);
    let outcome =
        parse_request::<QuickSortRequest>(algorithm, payload.as_ref()).and_then(run_quick_sort);
    respond(&state, algorithm, payload.as_ref(), outcome)
}

pub async fn bfs(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResponse {
    let algorithm = Algorithm::Bfs;
    let payload = payload_value(payload);
    let outcome = parse_request::<BfsRequest>(algorithm, payload.as_ref())
        .and_then(|req| run_bfs(req, payload.as_ref()));
    respond(&state, algorithm, payload.as_ref(), outcome)
}

/// Sorts by natural order first; only the search itself is timed.
fn run_binary_search(req: BinarySearchRequest) -> Result<Completed, AlgoError> {
    let mut sorted = Comparable::collect(&req.array)?;
    sorted.sort();

    // An empty array never compares against the target.
    let target = if sorted.is_empty() {
        None
    } else {
        let target = Comparable::new(req.target.clone())?;
        target.ensure_same_kind(&sorted)?;
        Some(target)
    };

    let start = Instant::now();
    let position = target
        .as_ref()
        .and_then(|t| algorithms::binary_search(&sorted, t));
    let execution_time_ms = elapsed_ms(start);

    let response = BinarySearchResponse {
        status: Status::Success,
        original_array: Value::Array(req.array),
        sorted_array: sorted.into_iter().map(Comparable::into_value).collect(),
        target: req.target,
        found: position.is_some(),
        position,
        execution_time_ms,
    };

    Ok(Completed {
        body: serde_json::to_value(response)?,
        execution_time_ms,
    })
}

fn run_quick_sort(req: QuickSortRequest) -> Result<Completed, AlgoError> {
    let items = Comparable::collect(&req.array)?;

    let start = Instant::now();
    let sorted = algorithms::quick_sort(&items);
    let execution_time_ms = elapsed_ms(start);

    let response = QuickSortResponse {
        status: Status::Success,
        original_array: Value::Array(req.array),
        sorted_array: sorted.into_iter().map(Comparable::into_value).collect(),
        execution_time_ms,
    };

    Ok(Completed {
        body: serde_json::to_value(response)?,
        execution_time_ms,
    })
}

/// `payload` is the raw body; `graph` and `start_node` are echoed from it
/// so the caller's key order is preserved.
fn run_bfs(req: BfsRequest, payload: Option<&Value>) -> Result<Completed, AlgoError> {
    let echo = |field: &str| {
        payload
            .and_then(|p| p.get(field))
            .cloned()
            .unwrap_or(Value::Null)
    };

    let start = Instant::now();
    let traversal = algorithms::bfs(&req.graph, &req.start_node);
    let execution_time_ms = elapsed_ms(start);

    let response = BfsResponse {
        status: Status::Success,
        graph: echo("graph"),
        start_node: echo("start_node"),
        traversal_path: traversal.into_iter().map(NodeId::into_value).collect(),
        execution_time_ms,
    };

    Ok(Completed {
        body: serde_json::to_value(response)?,
        execution_time_ms,
    })
}
