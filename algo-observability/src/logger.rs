use crate::rotating_file::{RotatingFileConfig, RotatingFileWriter, RotationPolicy};
use crate::transaction_log::{ServiceMarker, TransactionLogEntry};
use algo_core::Algorithm;
use algo_core::config::{LoggingConfig, RotationMode};
use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io;
use tracing::{debug, error};

pub const STARTUP_MESSAGE: &str = "Algorithm API Service started";

const LOGGER_NAME: &str = "algorithm_app";

#[derive(Debug, Clone, Copy)]
enum Level {
    Info,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        })
    }
}

/// Dual-stream logger for API calls.
///
/// * operational log — leveled, human-readable lines, size-rotated
/// * transaction log — one JSON object per call, daily- or size-rotated
///
/// Constructed once at startup and shared through the API state. Every write
/// is best-effort: I/O failures are reported on the console via `tracing` and
/// never reach the caller.
pub struct TransactionLogger {
    operational: RotatingFileWriter,
    transactions: RotatingFileWriter,
}

impl TransactionLogger {
    /// Create the log directory and open both streams.
    pub fn new(config: &LoggingConfig) -> io::Result<Self> {
        std::fs::create_dir_all(&config.dir)?;

        let operational = RotatingFileWriter::new(RotatingFileConfig {
            file_path: config.operational_path(),
            policy: RotationPolicy::Size {
                max_bytes: config.operational.max_bytes,
            },
            backup_count: config.operational.backup_count,
        })?;

        let transaction_policy = match config.transactions.rotation {
            RotationMode::Daily => RotationPolicy::Daily,
            RotationMode::Size => RotationPolicy::Size {
                max_bytes: config.transactions.max_bytes,
            },
        };
        let transactions = RotatingFileWriter::new(RotatingFileConfig {
            file_path: config.transaction_path(),
            policy: transaction_policy,
            backup_count: config.transactions.backup_count,
        })?;

        debug!(dir = %config.dir.display(), "Transaction logger ready");

        Ok(Self {
            operational,
            transactions,
        })
    }

    /// Record one API call on both streams.
    ///
    /// `request` is `None` when the body was absent or unparseable;
    /// `execution_time_ms` is `None` when no algorithm ran.
    pub fn log_algorithm_call(
        &self,
        algorithm: Algorithm,
        request: Option<&Value>,
        response: &Value,
        execution_time_ms: Option<f64>,
    ) {
        let entry = TransactionLogEntry::new(algorithm, request, response.clone(), execution_time_ms);

        let time = match execution_time_ms {
            Some(ms) => ms.to_string(),
            None => "None".to_string(),
        };
        self.operational_line(
            Level::Info,
            &format!(
                "API Call: {algorithm} - Execution time: {time}ms - request_id={}",
                entry.request_id
            ),
        );

        self.transaction_record(&entry);
    }

    /// Operational `ERROR` line, with the cause appended when given.
    pub fn log_error(&self, message: &str, error: Option<&dyn fmt::Display>) {
        match error {
            Some(e) => self.operational_line(Level::Error, &format!("{message}: {e}")),
            None => self.operational_line(Level::Error, message),
        }
    }

    /// Startup marker on both streams.
    pub fn log_service_start(&self) {
        self.operational_line(Level::Info, STARTUP_MESSAGE);
        self.transaction_record(&ServiceMarker::started(STARTUP_MESSAGE));
    }

    fn operational_line(&self, level: Level, message: &str) {
        let line = format!(
            "{} - {LOGGER_NAME} - {level} - {message}",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f")
        );
        if let Err(e) = self.operational.write_line(&line) {
            error!(
                error = %e,
                path = %self.operational.path().display(),
                "Operational log write failed"
            );
        }
    }

    fn transaction_record<T: Serialize>(&self, record: &T) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "Failed to serialize transaction record");
                return;
            }
        };
        if let Err(e) = self.transactions.write_line(&line) {
            error!(
                error = %e,
                path = %self.transactions.path().display(),
                "Transaction log write failed"
            );
        }
    }
}
