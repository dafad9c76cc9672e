//! Append-only CSV log of paired readings.
//!
//! Layout (CRLF line endings):
//! TIMESTAMP,DHT22,CPU
//! 2024-01-15 14:30:00,22.5,45.3
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{LoggerError, Result};

pub const HEADER: [&str; 3] = ["TIMESTAMP", "DHT22", "CPU"];
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row, already formatted for the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub dht22: String,
    pub cpu: String,
}

impl LogRecord {
    /// Readings are rendered with one fractional digit using the exact binary
    /// value, ties to even.
    pub fn new(at: NaiveDateTime, serial: f64, cpu: f64) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            dht22: format!("{serial:.1}"),
            cpu: format!("{cpu:.1}"),
        }
    }

    /// Row text without the line terminator.
    pub fn line(&self) -> String {
        format!("{},{},{}", self.timestamp, self.dht22, self.cpu)
    }
}

/// What `ensure_header` found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    /// File was absent and has been created with a header.
    Created,
    /// File existed but was empty; header written.
    Reinitialized,
    /// File already has content; nothing written.
    Present,
}

#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ensure_header(&self) -> Result<HeaderState> {
        let state = match fs::metadata(&self.path) {
            Ok(m) if m.len() > 0 => return Ok(HeaderState::Present),
            Ok(_) => HeaderState::Reinitialized,
            Err(e) if e.kind() == ErrorKind::NotFound => HeaderState::Created,
            Err(e) => return Err(self.err("stat", e)),
        };
        let mut w = self.writer()?;
        w.write_record(HEADER).map_err(|e| self.err("write header", e))?;
        w.flush().map_err(|e| self.err("flush", e))?;
        Ok(state)
    }

    pub fn append(&self, record: &LogRecord) -> Result<()> {
        let mut w = self.writer()?;
        w.serialize(record).map_err(|e| self.err("append row", e))?;
        w.flush().map_err(|e| self.err("flush", e))?;
        Ok(())
    }

    /// Header check followed by one appended row.
    pub fn write(
        &self,
        at: NaiveDateTime,
        serial: f64,
        cpu: f64,
    ) -> Result<(HeaderState, LogRecord)> {
        let state = self.ensure_header()?;
        let record = LogRecord::new(at, serial, cpu);
        self.append(&record)?;
        Ok((state, record))
    }

    fn writer(&self) -> Result<csv::Writer<File>> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.err("open", e))?;
        Ok(csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(file))
    }

    fn err(&self, what: &str, e: impl std::fmt::Display) -> eyre::Report {
        LoggerError::Log(format!("{what} {}: {e}", self.path.display())).into()
    }
}
