//! Serial line protocol of the DHT22 sensor board.
//!
//! The board prints one frame per line, either `<temp>` or `<temp>;<humidity>`
//! with one decimal each, or `ERR` while its averaging buffer is still filling.
//! The port is opened per reading and the first complete line is thrown away,
//! since the read may have started in the middle of a transmission.
use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

use templog_traits::Thermometer;

use crate::error::{HwError, Result};

/// Marker the firmware prints while it has fewer samples than it averages over.
const NOT_READY: &str = "ERR";

/// One decoded measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub celsius: f64,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    Reading(Reading),
    NotReady,
}

impl Frame {
    /// Decode one line; surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.eq_ignore_ascii_case(NOT_READY) {
            return Ok(Frame::NotReady);
        }
        let (temp, humidity) = match line.split_once(';') {
            Some((t, h)) => (t, Some(h)),
            None => (line, None),
        };
        let celsius = parse_field(temp, line)?;
        let humidity = humidity.map(|h| parse_field(h, line)).transpose()?;
        Ok(Frame::Reading(Reading { celsius, humidity }))
    }
}

fn parse_field(field: &str, line: &str) -> Result<f64> {
    let v: f64 = field
        .trim()
        .parse()
        .map_err(|e| HwError::Malformed(format!("{line:?}: {e}")))?;
    if !v.is_finite() {
        return Err(HwError::Malformed(format!("{line:?}: non-finite value")));
    }
    Ok(v)
}

/// Read one `\n`-terminated line into `buf`, waiting through read timeouts.
///
/// Bytes received before a timeout are kept, so a line split across
/// timeouts is reassembled. A final unterminated line before EOF is returned
/// as-is; EOF with nothing buffered is a disconnect.
fn read_raw_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    cancel: &dyn Fn() -> bool,
) -> Result<()> {
    buf.clear();
    loop {
        match reader.read_until(b'\n', buf) {
            Ok(0) if buf.is_empty() => return Err(HwError::Disconnected),
            Ok(0) => return Ok(()),
            Ok(_) if buf.last() == Some(&b'\n') => return Ok(()),
            Ok(_) => continue,
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                if cancel() {
                    return Err(HwError::Cancelled);
                }
                tracing::trace!(buffered = buf.len(), "serial read timed out, waiting");
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
}

/// Take two non-empty lines from `reader`, discard the first and decode the second.
///
/// Only empty lines are skipped. The first non-empty line is dropped whatever
/// it holds; a not-ready marker on the second is malformed like any other
/// non-numeric text. A silent device keeps this waiting until `cancel`
/// reports true on a timeout.
pub fn read_sample<R: BufRead>(reader: &mut R, cancel: &dyn Fn() -> bool) -> Result<Reading> {
    let mut buf = Vec::with_capacity(32);
    let mut discarded = false;
    loop {
        read_raw_line(reader, &mut buf, cancel)?;
        let text = String::from_utf8_lossy(&buf);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if !discarded {
            tracing::trace!(line = text, "discarding first line");
            discarded = true;
            continue;
        }
        return match Frame::parse(text)? {
            Frame::Reading(r) => Ok(r),
            Frame::NotReady => Err(HwError::Malformed(format!("{text:?}: device not ready"))),
        };
    }
}

/// DHT22 board attached over USB serial.
pub struct SerialThermometer {
    path: String,
    baud_rate: u32,
    timeout: Duration,
    cancel: Option<Box<dyn Fn() -> bool + Send + Sync>>,
}

impl SerialThermometer {
    pub fn new(path: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            baud_rate,
            timeout,
            cancel: None,
        }
    }

    /// Abort a read stuck on a silent device once `check` returns true.
    pub fn with_cancel(mut self, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.cancel = Some(Box::new(check));
        self
    }

    /// Open the port, take one reading and close the port again.
    pub fn read_reading(&mut self) -> Result<Reading> {
        let port = serialport::new(self.path.as_str(), self.baud_rate)
            .timeout(self.timeout)
            .open()
            .map_err(|e| HwError::Open {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        let mut reader = BufReader::new(port);
        let cancel = || self.cancel.as_ref().is_some_and(|c| c());
        let reading = read_sample(&mut reader, &cancel)?;
        tracing::debug!(
            device = %self.path,
            celsius = reading.celsius,
            humidity = ?reading.humidity,
            "serial sample"
        );
        Ok(reading)
    }
}

impl Thermometer for SerialThermometer {
    fn read_celsius(
        &mut self,
    ) -> std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.read_reading()?.celsius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_with_humidity() {
        let f = Frame::parse("21.4;40.0\r\n").unwrap();
        assert_eq!(
            f,
            Frame::Reading(Reading {
                celsius: 21.4,
                humidity: Some(40.0)
            })
        );
    }

    #[test]
    fn frame_not_ready_is_case_insensitive() {
        assert_eq!(Frame::parse("err").unwrap(), Frame::NotReady);
    }

    #[test]
    fn frame_rejects_nan() {
        assert!(matches!(Frame::parse("NaN"), Err(HwError::Malformed(_))));
    }

    #[test]
    fn open_missing_device_fails_with_path() {
        let mut t = SerialThermometer::new(
            "/dev/templog-does-not-exist",
            115_200,
            Duration::from_millis(10),
        );
        match t.read_reading() {
            Err(HwError::Open { path, .. }) => assert_eq!(path, "/dev/templog-does-not-exist"),
            other => panic!("expected open error, got {other:?}"),
        }
    }
}
