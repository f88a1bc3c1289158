//! JSONL telemetry logger with file rotation.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;

/// One parsed telemetry line with its arrival time
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    pub timestamp: DateTime<Utc>,
    pub values: Vec<f64>,
}

impl TelemetryRecord {
    /// Record the given values as arriving now
    pub fn now(values: Vec<f64>) -> Self {
        Self {
            timestamp: Utc::now(),
            values,
        }
    }
}

/// Rotating JSONL log writer
///
/// Writes one JSON object per line into sequence-numbered files
/// (`telemetry-00001.jsonl`, ...). A new file starts after
/// `max_records_per_file` records; once more than `max_files_to_keep`
/// files exist, the oldest are deleted.
#[derive(Debug)]
pub struct JsonlLogger {
    dir: PathBuf,
    file: Option<File>,
    sequence: u64,
    records_in_file: usize,
    max_records_per_file: usize,
    max_files_to_keep: usize,
}

impl JsonlLogger {
    /// Create a logger writing into `dir`
    ///
    /// The directory is created if missing. The file sequence continues
    /// from whatever is already on disk, so restarts never overwrite
    /// earlier logs.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be created or scanned.
    pub fn create<P: AsRef<Path>>(
        dir: P,
        max_records_per_file: usize,
        max_files_to_keep: usize,
    ) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let sequence = highest_sequence(&dir)?;

        Ok(Self {
            dir,
            file: None,
            sequence,
            records_in_file: 0,
            max_records_per_file,
            max_files_to_keep,
        })
    }

    /// Append one record, rotating and pruning as needed
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure. The main loop logs and ignores this;
    /// telemetry logging is never fatal.
    pub fn append(&mut self, record: &TelemetryRecord) -> Result<()> {
        if self.file.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{}", line)?;
            self.records_in_file += 1;
        }

        Ok(())
    }

    /// Open the next file in the sequence and prune old ones
    fn rotate(&mut self) -> Result<()> {
        self.sequence += 1;
        let path = self.dir.join(format!("telemetry-{:05}.jsonl", self.sequence));
        debug!("Rotating telemetry log to {}", path.display());

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        self.file = Some(file);
        self.records_in_file = 0;

        self.prune()?;
        Ok(())
    }

    /// Delete the oldest files beyond the retention limit
    fn prune(&self) -> Result<()> {
        let mut files = log_files(&self.dir)?;
        files.sort();

        while files.len() > self.max_files_to_keep {
            let oldest = files.remove(0);
            debug!("Pruning telemetry log {}", oldest.display());
            fs::remove_file(oldest)?;
        }

        Ok(())
    }
}

/// Sequence number of the newest existing log file, or 0
fn highest_sequence(dir: &Path) -> Result<u64> {
    let mut highest = 0u64;
    for path in log_files(dir)? {
        if let Some(seq) = parse_sequence(&path) {
            highest = highest.max(seq);
        }
    }
    Ok(highest)
}

/// All telemetry log files in `dir`
fn log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if parse_sequence(&path).is_some() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Parse the sequence number out of a `telemetry-NNNNN.jsonl` file name
fn parse_sequence(path: &Path) -> Option<u64> {
    path.file_name()?
        .to_str()?
        .strip_prefix("telemetry-")?
        .strip_suffix(".jsonl")?
        .parse()
        .ok()
}
