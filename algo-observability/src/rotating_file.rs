//! Append-only log file with size-based or daily rotation.
//!
//! Size rotation keeps numbered backups (`app.log.1` is the newest, shifted
//! up on every rotation). Daily rotation renames the file with the date that
//! just ended (`transactions.log.2025-01-15`) at the first write after local
//! midnight. Either way at most `backup_count` backups are retained.
//!
//! Thread-safe: a `Mutex` guards the file so each `write_line` lands as one
//! complete line, never interleaved with another appender.

use chrono::{DateTime, Local, NaiveDate};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

// ── Configuration ────────────────────────────────────────────────────────────

/// When the active file is closed and a new one started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPolicy {
    /// Rotate once the file has reached `max_bytes`. 0 disables rotation.
    Size { max_bytes: u64 },
    /// Rotate at the first write on a new local calendar day.
    Daily,
}

#[derive(Debug, Clone)]
pub struct RotatingFileConfig {
    /// Active file path, e.g. `logs/transactions.log`.
    pub file_path: PathBuf,
    pub policy: RotationPolicy,
    /// Backups to keep. For daily rotation 0 means unlimited; for size
    /// rotation 0 means the file is truncated without keeping a backup.
    pub backup_count: usize,
}

// ── Writer ───────────────────────────────────────────────────────────────────

pub struct RotatingFileWriter {
    config: RotatingFileConfig,
    inner: Mutex<WriterState>,
}

struct WriterState {
    writer: BufWriter<File>,
    current_date: NaiveDate,
    current_size: u64,
}

impl RotatingFileWriter {
    /// Open (or create) the active file in append mode.
    pub fn new(config: RotatingFileConfig) -> io::Result<Self> {
        Self::open_on(config, Local::now().date_naive())
    }

    fn open_on(config: RotatingFileConfig, today: NaiveDate) -> io::Result<Self> {
        if let Some(parent) = config.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = open_append(&config.file_path)?;
        let metadata = file.metadata()?;
        let current_size = metadata.len();
        // A non-empty file left by an earlier run belongs to the day it was
        // last written, not to the day it is reopened.
        let current_date = match metadata.modified() {
            Ok(modified) if current_size > 0 => {
                DateTime::<Local>::from(modified).date_naive().min(today)
            }
            _ => today,
        };

        debug!(path = %config.file_path.display(), "Log file opened");

        Ok(Self {
            config,
            inner: Mutex::new(WriterState {
                writer: BufWriter::new(file),
                current_date,
                current_size,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config.file_path
    }

    /// Append one line (a trailing newline is added). Rotates first if needed.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        self.write_line_on(line, Local::now().date_naive())
    }

    fn write_line_on(&self, line: &str, today: NaiveDate) -> io::Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?;

        let rotate = match self.config.policy {
            RotationPolicy::Size { max_bytes } => max_bytes > 0 && state.current_size >= max_bytes,
            RotationPolicy::Daily => today != state.current_date,
        };

        if rotate {
            state.writer.flush()?;

            match self.config.policy {
                RotationPolicy::Size { .. } => self.shift_numbered_backups(),
                RotationPolicy::Daily => self.archive_day(state.current_date),
            }

            // Replacing the writer closes the old handle.
            state.writer = BufWriter::new(open_append(&self.config.file_path)?);
            state.current_date = today;
            state.current_size = 0;
        }

        let bytes = line.as_bytes();
        state.writer.write_all(bytes)?;
        state.writer.write_all(b"\n")?;
        state.writer.flush()?;
        state.current_size += bytes.len() as u64 + 1;

        Ok(())
    }

    /// `name.(n-1)` → `name.n`, …, `name` → `name.1`; drops anything past the limit.
    fn shift_numbered_backups(&self) {
        let base = &self.config.file_path;
        let keep = self.config.backup_count;

        if keep == 0 {
            if let Err(e) = File::create(base) {
                error!(error = %e, path = %base.display(), "Failed to truncate log file");
            }
            return;
        }

        let oldest = rotated_file_path(base, &keep.to_string());
        if oldest.exists() {
            if let Err(e) = fs::remove_file(&oldest) {
                warn!(error = %e, path = %oldest.display(), "Failed to remove oldest backup");
            }
        }

        for n in (1..keep).rev() {
            let from = rotated_file_path(base, &n.to_string());
            if from.exists() {
                let to = rotated_file_path(base, &(n + 1).to_string());
                if let Err(e) = fs::rename(&from, &to) {
                    warn!(error = %e, from = %from.display(), "Failed to shift backup");
                }
            }
        }

        self.rename_active(&rotated_file_path(base, "1"));
    }

    /// Rename the active file with the finished day's date and prune old days.
    fn archive_day(&self, day: NaiveDate) {
        let base = &self.config.file_path;
        let mut target = rotated_file_path(base, &day.format("%Y-%m-%d").to_string());

        // A restart on the same day may already have archived it.
        let mut n = 1;
        while target.exists() {
            target = rotated_file_path(base, &format!("{}.{n}", day.format("%Y-%m-%d")));
            n += 1;
        }

        self.rename_active(&target);

        if self.config.backup_count > 0 {
            if let Err(e) = prune_rotated_files(base, self.config.backup_count) {
                warn!(error = %e, "Failed to prune old log files");
            }
        }
    }

    fn rename_active(&self, to: &Path) {
        let from = &self.config.file_path;
        if !from.exists() {
            return;
        }
        match fs::rename(from, to) {
            Ok(()) => info!(from = %from.display(), to = %to.display(), "Rotated log file"),
            Err(e) => error!(
                error = %e,
                from = %from.display(),
                to = %to.display(),
                "Failed to rotate log file"
            ),
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// `transactions.log` + `2025-01-15` → `transactions.log.2025-01-15`.
fn rotated_file_path(base: &Path, suffix: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(suffix);
    PathBuf::from(path)
}

/// Remove old date-suffixed files, keeping only the newest `keep`.
fn prune_rotated_files(base_path: &Path, keep: usize) -> io::Result<()> {
    let parent = base_path.parent().unwrap_or(Path::new("."));
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let base_name = base_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();

    let mut rotated_files: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&*base_name)
            && name.len() > base_name.len()
            && name.as_bytes()[base_name.len()] == b'.'
        {
            rotated_files.push(entry.path());
        }
    }

    // ISO dates sort lexicographically — newest last
    rotated_files.sort();

    if rotated_files.len() > keep {
        let to_remove = rotated_files.len() - keep;
        for path in rotated_files.iter().take(to_remove) {
            debug!(path = %path.display(), "Pruning old rotated log");
            fs::remove_file(path)?;
        }
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────
