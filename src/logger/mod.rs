//! Multi-stream rotating file logger
//!
//! Manages three rotation-enabled log files per logger: an ingress file
//! for input events, a general file for debug/info/warning messages, and
//! an error file for error/critical messages and structured error
//! reports. The general and error streams can optionally be mirrored to
//! stdout and stderr; the ingress stream never is.
//!
//! ```ignore
//! let log = Logger::new(LoggerConfig {
//!     log_dir: "logs".into(),
//!     log_name: "my_app".to_string(),
//!     ..LoggerConfig::default()
//! })
//! .await?;
//!
//! log.info("Application started.").await?;
//! log.error("Something went wrong!").await?;
//! log.close().await?;
//! ```

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::validate::{ensure_non_empty, ensure_range, Validate, ValidationError};
use crate::Result;

mod tests;
mod writer;

pub use writer::{ConsoleSink, ConsoleTarget, LineSink, RotatingWriter};

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    const NAMES: [&'static str; 5] = ["debug", "info", "warning", "error", "critical"];

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            other => Err(ValidationError::NotOneOf {
                field: "level".to_string(),
                value: other.to_string(),
                allowed: Self::NAMES.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

/// Configuration for a [`Logger`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Directory the log files are written to
    pub log_dir: PathBuf,
    /// Base name for the three log files
    pub log_name: String,
    /// Minimum level; records below it are dropped
    pub level: LogLevel,
    /// File size in bytes that triggers rotation
    pub rotation_size: u64,
    /// Rotated files retained per stream
    pub backup_count: usize,
    /// Mirror general/error streams to stdout/stderr
    pub enable_console: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_name: "project".to_string(),
            level: LogLevel::Debug,
            rotation_size: 10 * 1024 * 1024, // 10MB
            backup_count: 7,
            enable_console: false,
        }
    }
}

impl Validate for LoggerConfig {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        ensure_non_empty("log_name", &self.log_name)?;
        ensure_range("rotation_size", self.rotation_size, 1, u64::MAX)?;
        Ok(())
    }
}

/// Structured description of a captured error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub id: Uuid,
    /// Short type name of the captured error
    pub kind: String,
    pub message: String,
    /// Messages of the `source()` chain, outermost cause first
    pub chain: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorReport {
    /// Build a report from any error, walking its source chain.
    pub fn from_error<E: std::error::Error>(err: &E) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }

        Self {
            id: Uuid::new_v4(),
            kind: short_type_name::<E>(),
            message: err.to_string(),
            chain,
            timestamp: Utc::now(),
        }
    }
}

/// Last segment of a type path, generic arguments stripped.
fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// One logger stream: a rotating file plus any mirror sinks.
struct Stream {
    path: PathBuf,
    sinks: Vec<Box<dyn LineSink>>,
}

impl Stream {
    async fn new(
        path: PathBuf,
        rotation_size: u64,
        backup_count: usize,
        console: Option<ConsoleTarget>,
    ) -> Result<Self> {
        let file = RotatingWriter::new(path.clone(), rotation_size, backup_count).await?;

        let mut sinks: Vec<Box<dyn LineSink>> = vec![Box::new(file)];
        if let Some(target) = console {
            sinks.push(Box::new(ConsoleSink::new(target)));
        }

        Ok(Self { path, sinks })
    }

    async fn write_line(&self, line: &str) -> Result<()> {
        for sink in &self.sinks {
            sink.write_line(line).await?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        for sink in &self.sinks {
            sink.flush().await?;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        for sink in &self.sinks {
            sink.close().await?;
        }
        Ok(())
    }
}

/// Application logger with separate ingress, general, and error streams.
///
/// Routing follows the record level: `debug`/`info`/`warning` go to the
/// general file, `error`/`critical` to the error file, and [`ingress`]
/// records to the ingress file. [`close`] flushes and releases all files
/// and is idempotent; logging after close is a no-op.
///
/// [`ingress`]: Logger::ingress
/// [`close`]: Logger::close
pub struct Logger {
    level: LogLevel,
    ingress: Stream,
    general: Stream,
    error: Stream,
    closed: AtomicBool,
}

impl Logger {
    /// Create a logger, validating the config and opening all three files.
    pub async fn new(config: LoggerConfig) -> Result<Self> {
        config.validate()?;

        let file_path = |suffix: &str| {
            config
                .log_dir
                .join(format!("{}_{}.log", config.log_name, suffix))
        };

        let console = |target| config.enable_console.then_some(target);

        // Ingress is never mirrored to the console
        let ingress = Stream::new(
            file_path("ingress"),
            config.rotation_size,
            config.backup_count,
            None,
        )
        .await?;
        let general = Stream::new(
            file_path("general"),
            config.rotation_size,
            config.backup_count,
            console(ConsoleTarget::Stdout),
        )
        .await?;
        let error = Stream::new(
            file_path("error"),
            config.rotation_size,
            config.backup_count,
            console(ConsoleTarget::Stderr),
        )
        .await?;

        Ok(Self {
            level: config.level,
            ingress,
            general,
            error,
            closed: AtomicBool::new(false),
        })
    }

    /// Path of the ingress log file.
    pub fn ingress_path(&self) -> &Path {
        &self.ingress.path
    }

    /// Path of the general log file.
    pub fn general_path(&self) -> &Path {
        &self.general.path
    }

    /// Path of the error log file.
    pub fn error_path(&self) -> &Path {
        &self.error.path
    }

    fn format_line(level: LogLevel, message: &str) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!("{} - {:<8} {}", timestamp, level.as_str(), message)
    }

    async fn emit(&self, stream: &Stream, level: LogLevel, message: &str) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) || level < self.level {
            return Ok(());
        }
        stream.write_line(&Self::format_line(level, message)).await
    }

    /// Log a debug message to the general stream.
    pub async fn debug(&self, message: &str) -> Result<()> {
        self.emit(&self.general, LogLevel::Debug, message).await
    }

    /// Log an info message to the general stream.
    pub async fn info(&self, message: &str) -> Result<()> {
        self.emit(&self.general, LogLevel::Info, message).await
    }

    /// Log a warning message to the general stream.
    pub async fn warning(&self, message: &str) -> Result<()> {
        self.emit(&self.general, LogLevel::Warning, message).await
    }

    /// Log an error message to the error stream.
    pub async fn error(&self, message: &str) -> Result<()> {
        self.emit(&self.error, LogLevel::Error, message).await
    }

    /// Log a critical message to the error stream.
    pub async fn critical(&self, message: &str) -> Result<()> {
        self.emit(&self.error, LogLevel::Critical, message).await
    }

    /// Record an input/ingress event, at info level.
    pub async fn ingress(&self, message: &str) -> Result<()> {
        self.emit(&self.ingress, LogLevel::Info, message).await
    }

    /// Capture an error as a structured report.
    ///
    /// The report is written to the error stream as one JSON line and
    /// returned to the caller. Reports are explicit captures and bypass
    /// the minimum-level filter.
    pub async fn capture_error<E: std::error::Error>(&self, err: &E) -> Result<ErrorReport> {
        let report = ErrorReport::from_error(err);

        if !self.closed.load(Ordering::SeqCst) {
            let line = serde_json::to_string(&report)?;
            self.error.write_line(&line).await?;
        }

        Ok(report)
    }

    /// Flush all streams.
    pub async fn flush(&self) -> Result<()> {
        self.ingress.flush().await?;
        self.general.flush().await?;
        self.error.flush().await?;
        Ok(())
    }

    /// Flush and release all log files. Idempotent; logging afterwards
    /// is a no-op.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.ingress.close().await?;
        self.general.close().await?;
        self.error.close().await?;
        Ok(())
    }
}
