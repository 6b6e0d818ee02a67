use crate::handlers;
use algo_observability::TransactionLogger;
use axum::{
    Router,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the API handlers.
pub struct AppState {
    pub logger: TransactionLogger,
}

impl AppState {
    pub fn new(logger: TransactionLogger) -> Self {
        Self { logger }
    }
}

/// Build the axum router. Each algorithm answers on a bare path and an
/// `/api/` alias backed by the same handler.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/binary-search", post(handlers::algorithms::binary_search))
        .route("/api/binary-search", post(handlers::algorithms::binary_search))
        .route("/quick-sort", post(handlers::algorithms::quick_sort))
        .route("/api/quick-sort", post(handlers::algorithms::quick_sort))
        .route("/bfs", post(handlers::algorithms::bfs))
        .route("/api/bfs", post(handlers::algorithms::bfs))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Algorithm API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Algorithm API stopped");
    Ok(())
}
