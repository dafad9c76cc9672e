//! Kernel thermal zone exposed as a pseudo-file holding milli-degrees Celsius.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use templog_traits::Thermometer;

use crate::error::{HwError, Result};

/// Convert a raw thermal-zone line (e.g. `"45321\n"`) to degrees Celsius.
pub fn parse_millidegrees(line: &str) -> Result<f64> {
    let raw: i32 = line
        .trim()
        .parse()
        .map_err(|e| HwError::Malformed(format!("{:?}: {e}", line.trim())))?;
    Ok(f64::from(raw) / 1000.0)
}

pub struct SysfsThermometer {
    path: PathBuf,
}

impl SysfsThermometer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// One attempt: open, read the first line, parse. No retry here.
    pub fn read_once(&self) -> Result<f64> {
        let file = File::open(&self.path)?;
        let mut line = String::new();
        BufReader::new(file).read_line(&mut line)?;
        let celsius = parse_millidegrees(&line)?;
        tracing::debug!(path = %self.path.display(), celsius, "cpu sample");
        Ok(celsius)
    }
}

impl Thermometer for SysfsThermometer {
    fn read_celsius(
        &mut self,
    ) -> std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.read_once()?)
    }
}
