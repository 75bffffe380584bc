//! Rolling JSON-lines record files.
//!
//! Consensus time is split into `period_secs` windows; every record whose
//! consensus second falls in a window goes to that window's file, named after
//! the consensus time of its first record (`2024-01-05T10_00_02.000000001Z.rcd.jsonl`).

use crate::domain::{RecordLine, RecordStreamError, StreamedRecord};
use crate::ports::outbound::RecordSink;
use chrono::{DateTime, SecondsFormat};
use shared_types::Timestamp;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

struct OpenFile {
    window: i64,
    path: PathBuf,
    writer: BufWriter<File>,
}

pub struct RollingFileSink {
    log_dir: PathBuf,
    period_secs: i64,
    current: Option<OpenFile>,
}

impl RollingFileSink {
    pub fn new(log_dir: impl AsRef<Path>, period_secs: u64) -> Self {
        Self {
            log_dir: log_dir.as_ref().to_path_buf(),
            period_secs: i64::try_from(period_secs.max(1)).unwrap_or(i64::MAX),
            current: None,
        }
    }

    /// Path of the file currently being written, if any.
    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_ref().map(|f| f.path.as_path())
    }

    fn window_of(&self, time: &Timestamp) -> i64 {
        time.seconds - time.seconds.rem_euclid(self.period_secs)
    }

    fn file_name(time: &Timestamp) -> String {
        match DateTime::from_timestamp(time.seconds, time.nanos) {
            Some(dt) => format!(
                "{}.rcd.jsonl",
                dt.to_rfc3339_opts(SecondsFormat::Nanos, true).replace(':', "_")
            ),
            None => format!("{}.rcd.jsonl", time),
        }
    }

    fn open(&self, window: i64, first: &Timestamp) -> Result<OpenFile, RecordStreamError> {
        fs::create_dir_all(&self.log_dir).map_err(|source| RecordStreamError::Io {
            path: self.log_dir.clone(),
            source,
        })?;
        let path = self.log_dir.join(Self::file_name(first));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RecordStreamError::Io {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), "Opened record file");
        Ok(OpenFile {
            window,
            path,
            writer: BufWriter::new(file),
        })
    }

    fn close_current(&mut self) -> Result<(), RecordStreamError> {
        if let Some(mut open) = self.current.take() {
            open.writer.flush().map_err(|source| RecordStreamError::Io {
                path: open.path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl RecordSink for RollingFileSink {
    fn accept(&mut self, entry: &StreamedRecord) -> Result<(), RecordStreamError> {
        let time = entry.object.consensus_time;
        let window = self.window_of(&time);
        if self.current.as_ref().map(|f| f.window) != Some(window) {
            self.close_current()?;
            self.current = Some(self.open(window, &time)?);
        }

        let line = serde_json::to_string(&RecordLine::from(entry))
            .map_err(|e| RecordStreamError::Encode(e.to_string()))?;
        if let Some(open) = self.current.as_mut() {
            writeln!(open.writer, "{line}").map_err(|source| RecordStreamError::Io {
                path: open.path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RecordStreamError> {
        match self.current.as_mut() {
            Some(open) => open.writer.flush().map_err(|source| RecordStreamError::Io {
                path: open.path.clone(),
                source,
            }),
            None => Ok(()),
        }
    }
}

impl Drop for RollingFileSink {
    fn drop(&mut self) {
        if let Err(e) = self.close_current() {
            warn!(error = %e, "Failed to flush record file on close");
        }
    }
}
