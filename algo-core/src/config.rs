use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    /// Raises the console log level to `debug`.
    #[serde(default)]
    pub debug: bool,
}

/// Where and how the two log streams are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub operational: OperationalLogConfig,
    #[serde(default)]
    pub transactions: TransactionLogConfig,
}

/// Operational log: human-readable, size-rotated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalLogConfig {
    #[serde(default = "default_operational_file")]
    pub file: String,
    #[serde(default = "default_operational_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_operational_backups")]
    pub backup_count: usize,
}

/// Transaction log: one JSON object per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLogConfig {
    #[serde(default = "default_transaction_file")]
    pub file: String,
    #[serde(default)]
    pub rotation: RotationMode,
    /// Only used with `rotation: size`.
    #[serde(default = "default_transaction_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_transaction_backups")]
    pub backup_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationMode {
    #[default]
    Daily,
    Size,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_addr() -> String { "127.0.0.1:5000".into() }
fn default_log_dir() -> PathBuf { PathBuf::from("logs") }
fn default_operational_file() -> String { "app.log".into() }
fn default_operational_max_bytes() -> u64 { 10 * 1024 * 1024 }
fn default_operational_backups() -> usize { 5 }
fn default_transaction_file() -> String { "transactions.log".into() }
fn default_transaction_max_bytes() -> u64 { 10 * 1024 * 1024 }
fn default_transaction_backups() -> usize { 30 }

// ── Impls ─────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            debug: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            operational: OperationalLogConfig::default(),
            transactions: TransactionLogConfig::default(),
        }
    }
}

impl Default for OperationalLogConfig {
    fn default() -> Self {
        Self {
            file: default_operational_file(),
            max_bytes: default_operational_max_bytes(),
            backup_count: default_operational_backups(),
        }
    }
}

impl Default for TransactionLogConfig {
    fn default() -> Self {
        Self {
            file: default_transaction_file(),
            rotation: RotationMode::Daily,
            max_bytes: default_transaction_max_bytes(),
            backup_count: default_transaction_backups(),
        }
    }
}

impl LoggingConfig {
    /// Log directory rooted at `dir`, all other settings default.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn operational_path(&self) -> PathBuf {
        self.dir.join(&self.operational.file)
    }

    pub fn transaction_path(&self) -> PathBuf {
        self.dir.join(&self.transactions.file)
    }
}

impl ServiceConfig {
    /// Load defaults, then the YAML file if it exists, then `ALGO_API_*` env
    /// overrides (`__` separates nested keys, e.g. `ALGO_API_SERVER__ADDR`).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(ServiceConfig::default()));
        if path.exists() {
            figment = figment.merge(Yaml::file(path));
        }
        let config: ServiceConfig = figment
            .merge(Env::prefixed("ALGO_API_").split("__"))
            .extract()?;
        Ok(config)
    }
}
