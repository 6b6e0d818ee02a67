// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Algorithm API
//
//  HTTP:     axum on a tokio multi-thread runtime
//  Logs:     operational (size-rotated) + transactions (JSON lines)
//  Config:   defaults ← YAML file ← ALGO_API_* env ← CLI flags
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use algo_api::AppState;
use algo_core::ServiceConfig;
use algo_observability::TransactionLogger;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "algo-api", version, about = "Binary search, quicksort and BFS over HTTP")]
struct Cli {
    /// Path to configuration file (skipped when missing)
    #[arg(short, long, default_value = "algo-api.yaml")]
    config: PathBuf,

    /// Log level for console diagnostics (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Listen address, e.g. 127.0.0.1:5000
    #[arg(long)]
    addr: Option<String>,

    /// Directory for app.log and transactions.log
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Verbose console logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Config ──
    let mut config = ServiceConfig::load(&cli.config)?;
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }
    if let Some(dir) = cli.log_dir {
        config.logging.dir = dir;
    }
    config.server.debug |= cli.debug;

    // ── Tracing ──
    let default_level = cli.log_level.unwrap_or_else(|| {
        let level = if config.server.debug { "debug" } else { "info" };
        level.to_string()
    });
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_level)),
        )
        .with_target(false)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "Algorithm API starting"
    );

    // ── Logger ──
    let logger = TransactionLogger::new(&config.logging)?;
    logger.log_service_start();
    info!(
        operational = %config.logging.operational_path().display(),
        transactions = %config.logging.transaction_path().display(),
        "Log streams opened"
    );

    // ── Serve ──
    let state = Arc::new(AppState::new(logger));
    algo_api::serve(&config.server.addr, state, shutdown_signal()).await
}

/// Resolves on Ctrl+C or SIGTERM (docker stop).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping...");
}
