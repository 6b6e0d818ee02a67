use algo_core::model::HealthResponse;
use axum::response::Json;

/// Liveness plus the fixed list of endpoints. Not logged as a transaction.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::online())
}
