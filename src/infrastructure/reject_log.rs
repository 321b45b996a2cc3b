// Append-only rejection log
use crate::application::trip_io::RejectLog;
use crate::domain::point::{RawRecord, RejectReason};
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileRejectLog {
    path: PathBuf,
}

impl FileRejectLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RejectLog for FileRejectLog {
    // Opened and closed per line so earlier entries are never truncated
    fn record_rejection(&self, record: &RawRecord, reason: &RejectReason) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open reject log {}", self.path.display()))?;

        writeln!(file, "Reject row {record}: {reason}")
            .with_context(|| format!("Failed to write reject log {}", self.path.display()))
    }
}
