//! Append-only audit trail of user-visible actions and failures.
//!
//! The raster core never logs; the editing layer records what happened
//! through an injected [`AuditSink`]. Each record becomes one line:
//!
//! ```text
//! [2026-10-18 14:03:12] [ACTION] Loaded image: beach.jpg
//! [2026-10-18 14:03:20] [ERROR] Edge detection failed: Image too small ...
//! ```
//!
//! [`FileAuditLog`] opens its file once in append mode and flushes after
//! every line. Write failures go to stderr and are otherwise ignored so that
//! auditing can never abort an edit. Every record is also forwarded to the
//! [`log`] facade under the `audit` target; [`init_stderr_logger`] installs a
//! backend that prints those records for `--verbose` runs.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Error,
    Action,
}

impl AuditLevel {
    fn log_level(self) -> log::Level {
        match self {
            Self::Error => log::Level::Error,
            Self::Info | Self::Action => log::Level::Info,
        }
    }
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
            Self::Action => "ACTION",
        })
    }
}

/// Destination for audit records.
pub trait AuditSink: Send + Sync {
    fn record(&self, level: AuditLevel, message: &str);

    fn info(&self, message: &str) {
        self.record(AuditLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.record(AuditLevel::Error, message);
    }

    fn action(&self, message: &str) {
        self.record(AuditLevel::Action, message);
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format one audit line (without the trailing newline).
pub fn format_line(timestamp: &str, level: AuditLevel, message: &str) -> String {
    format!("[{timestamp}] [{level}] {message}")
}

/// Audit sink appending to a file.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileAuditLog {
    /// Open (creating if needed) `path` for appending.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, level: AuditLevel, message: &str) {
        log::log!(target: "audit", level.log_level(), "{message}");
        let line = format_line(&timestamp(), level, message);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{line}").and_then(|_| file.flush()) {
            eprintln!("Failed to write audit log {}: {e}", self.path.display());
        }
    }
}

/// `log` backend printing every enabled record to stderr.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{}",
                format_record(record.level(), record.target(), &record.args().to_string())
            );
        }
    }

    fn flush(&self) {}
}

static STDERR_LOGGER: StderrLogger = StderrLogger;

fn format_record(level: log::Level, target: &str, message: &str) -> String {
    format!("[{level}] {target}: {message}")
}

/// Install the stderr backend for the `log` facade. Fails if a logger is
/// already set.
pub fn init_stderr_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&STDERR_LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

/// A recorded audit event, as kept by [`MemoryAuditLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub level: AuditLevel,
    pub message: String,
}

/// In-memory sink, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, level: AuditLevel, message: &str) {
        log::log!(target: "audit", level.log_level(), "{message}");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(AuditEntry {
                level,
                message: message.to_string(),
            });
    }
}
