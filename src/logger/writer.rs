//! Line sink implementations for logger streams

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::info;

/// Trait for writing formatted log lines to a destination
#[async_trait]
pub trait LineSink: Send + Sync {
    /// Write a single line (newline appended by the sink)
    async fn write_line(&self, line: &str) -> Result<()>;

    /// Flush any buffered data
    async fn flush(&self) -> Result<()>;

    /// Flush and release the destination; later writes become no-ops
    async fn close(&self) -> Result<()>;
}

/// Size-rotated log file writer
///
/// Appends lines to a single file; once the file reaches the rotation
/// threshold it is renamed to a timestamped sibling and a fresh file is
/// started. Rotated siblings beyond `backup_count` are pruned oldest-first.
pub struct RotatingWriter {
    file_path: PathBuf,
    writer: Arc<Mutex<Option<BufWriter<File>>>>,
    rotation_size: u64,
    backup_count: usize,
    current_size: Arc<Mutex<u64>>,
    rotation_seq: AtomicU64,
}

impl RotatingWriter {
    /// Open (or create) a rotating writer for the given path
    pub async fn new(file_path: PathBuf, rotation_size: u64, backup_count: usize) -> Result<Self> {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create log directory")?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await
            .context("Failed to open log file")?;

        let metadata = file.metadata().await?;
        let current_size = metadata.len();

        Ok(Self {
            file_path,
            writer: Arc::new(Mutex::new(Some(BufWriter::new(file)))),
            rotation_size,
            backup_count,
            current_size: Arc::new(Mutex::new(current_size)),
            rotation_seq: AtomicU64::new(0),
        })
    }

    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Rotate the log file if it has reached the threshold
    async fn rotate_if_needed(&self) -> Result<()> {
        let current_size = *self.current_size.lock().await;

        if current_size >= self.rotation_size {
            let mut writer_guard = self.writer.lock().await;

            // Close current file
            if let Some(mut writer) = writer_guard.take() {
                writer.flush().await?;
            }

            // The sequence number keeps rotated names unique when two
            // rotations land in the same timestamp tick
            let seq = self.rotation_seq.fetch_add(1, Ordering::SeqCst);
            let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f");
            let rotation_path = self
                .file_path
                .with_extension(format!("{}_{:04}.log", timestamp, seq));

            fs::rename(&self.file_path, &rotation_path)
                .await
                .context("Failed to rotate log file")?;

            // Open new file
            let file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&self.file_path)
                .await?;

            *writer_guard = Some(BufWriter::new(file));

            let mut size_guard = self.current_size.lock().await;
            *size_guard = 0;

            info!("Rotated log to {:?}", rotation_path);

            drop(size_guard);
            drop(writer_guard);
            self.prune_backups().await?;
        }

        Ok(())
    }

    /// Remove rotated siblings beyond the retention count, oldest first
    async fn prune_backups(&self) -> Result<()> {
        let Some(parent) = self.file_path.parent() else {
            return Ok(());
        };
        let Some(stem) = self.file_path.file_stem().and_then(|s| s.to_str()) else {
            return Ok(());
        };

        let prefix = format!("{}.", stem);
        let mut rotated = Vec::new();

        let mut entries = fs::read_dir(parent)
            .await
            .context("Failed to read log directory")?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            // Rotated files carry a sortable timestamp between the stem
            // and the .log extension
            if name.starts_with(&prefix)
                && name.ends_with(".log")
                && entry.path() != self.file_path
            {
                rotated.push(entry.path());
            }
        }

        if rotated.len() <= self.backup_count {
            return Ok(());
        }

        rotated.sort();
        let excess = rotated.len() - self.backup_count;
        for path in rotated.into_iter().take(excess) {
            fs::remove_file(&path)
                .await
                .context("Failed to prune rotated log file")?;
        }

        Ok(())
    }
}

#[async_trait]
impl LineSink for RotatingWriter {
    async fn write_line(&self, line: &str) -> Result<()> {
        self.rotate_if_needed().await?;

        let mut writer_guard = self.writer.lock().await;
        if let Some(writer) = writer_guard.as_mut() {
            writer
                .write_all(line.as_bytes())
                .await
                .context("Failed to write log line")?;
            writer.write_all(b"\n").await?;

            let mut size_guard = self.current_size.lock().await;
            *size_guard += line.len() as u64 + 1;
        }

        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let mut writer_guard = self.writer.lock().await;
        if let Some(writer) = writer_guard.as_mut() {
            writer.flush().await?;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut writer_guard = self.writer.lock().await;
        if let Some(mut writer) = writer_guard.take() {
            writer.flush().await?;
        }
        Ok(())
    }
}

/// Which console stream a sink mirrors to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

/// Console sink for mirroring log lines to stdout or stderr
pub struct ConsoleSink {
    target: ConsoleTarget,
}

impl ConsoleSink {
    pub fn new(target: ConsoleTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl LineSink for ConsoleSink {
    async fn write_line(&self, line: &str) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => println!("{}", line),
            ConsoleTarget::Stderr => eprintln!("{}", line),
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        // Console streams are line-flushed
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
