pub mod algorithms;
pub mod health;

use crate::server::AppState;
use algo_core::model::ErrorResponse;
use algo_core::{Algorithm, AlgoError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, warn};

pub type ApiResponse = (StatusCode, Json<Value>);

/// Serialized response body plus the algorithm's execution time.
pub(crate) struct Completed {
    pub body: Value,
    pub execution_time_ms: f64,
}

/// The parsed body, or `None` when it was absent or not JSON.
pub(crate) fn payload_value(payload: Result<Json<Value>, JsonRejection>) -> Option<Value> {
    match payload {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            debug!(error = %rejection, "Request body rejected");
            None
        }
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Turn a handler outcome into a response, logging exactly one transaction.
pub(crate) fn respond(
    state: &AppState,
    algorithm: Algorithm,
    request: Option<&Value>,
    outcome: Result<Completed, AlgoError>,
) -> ApiResponse {
    match outcome {
        Ok(done) => {
            debug!(%algorithm, execution_time_ms = done.execution_time_ms, "Algorithm call completed");
            state
                .logger
                .log_algorithm_call(algorithm, request, &done.body, Some(done.execution_time_ms));
            (StatusCode::OK, Json(done.body))
        }
        Err(e) if e.is_validation() => {
            warn!(%algorithm, error = %e, "Rejected request");
            failure(state, algorithm, request, StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            error!(%algorithm, error = %e, "Algorithm failed");
            state.logger.log_error(&format!("{algorithm} failed"), Some(&e));
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            failure(state, algorithm, request, status, format!("Algorithm failed: {e}"))
        }
    }
}

fn failure(
    state: &AppState,
    algorithm: Algorithm,
    request: Option<&Value>,
    status: StatusCode,
    message: String,
) -> ApiResponse {
    let body = serde_json::to_value(ErrorResponse::new(message))
        .unwrap_or_else(|_| serde_json::json!({"status": "error"}));
    state.logger.log_algorithm_call(algorithm, request, &body, None);
    (status, Json(body))
}
