#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Fixed runtime configuration for the temperature logger.
//!
//! The logger takes exactly one input from the operator (the serial device
//! path). Everything else is a constant, collected here so the rest of the
//! stack receives it explicitly instead of reaching for globals.
use std::path::PathBuf;
use std::time::Duration;

/// Serial line speed of the sensor board.
pub const BAUD_RATE: u32 = 115_200;
/// Per-read timeout on the serial port.
pub const SERIAL_READ_TIMEOUT_MS: u64 = 2_000;
/// Thermal zone exposed by the kernel, in milli-degrees Celsius.
pub const CPU_SENSOR_PATH: &str = "/sys/devices/virtual/thermal/thermal_zone0/temp";
/// Delay between failed CPU sensor reads.
pub const SENSOR_RETRY_DELAY_MS: u64 = 1_000;
/// CSV log, relative to the working directory.
pub const LOG_PATH: &str = "temp.csv";
/// Pause between two logged rows.
pub const SAMPLE_INTERVAL_S: u64 = 5 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialCfg {
    /// Device node, e.g. /dev/ttyACM3
    pub device: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorCfg {
    pub path: PathBuf,
    pub retry_delay_ms: u64,
    /// None retries forever.
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCfg {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub serial: SerialCfg,
    pub sensor: SensorCfg,
    pub log: LogCfg,
    pub sample_interval_s: u64,
}

impl Default for SerialCfg {
    fn default() -> Self {
        Self {
            device: String::new(),
            baud_rate: BAUD_RATE,
            read_timeout_ms: SERIAL_READ_TIMEOUT_MS,
        }
    }
}

impl Default for SensorCfg {
    fn default() -> Self {
        Self {
            path: PathBuf::from(CPU_SENSOR_PATH),
            retry_delay_ms: SENSOR_RETRY_DELAY_MS,
            max_attempts: None,
        }
    }
}

impl Default for LogCfg {
    fn default() -> Self {
        Self {
            path: PathBuf::from(LOG_PATH),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialCfg::default(),
            sensor: SensorCfg::default(),
            log: LogCfg::default(),
            sample_interval_s: SAMPLE_INTERVAL_S,
        }
    }
}

impl Config {
    /// Default configuration bound to the given serial device.
    pub fn for_device(device: impl Into<String>) -> Self {
        let mut cfg = Self::default();
        cfg.serial.device = device.into();
        cfg
    }

    #[inline]
    pub fn serial_timeout(&self) -> Duration {
        Duration::from_millis(self.serial.read_timeout_ms)
    }

    #[inline]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.sensor.retry_delay_ms)
    }

    #[inline]
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_s)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        // Serial
        if self.serial.device.trim().is_empty() {
            eyre::bail!("serial.device must not be empty");
        }
        if self.serial.baud_rate == 0 {
            eyre::bail!("serial.baud_rate must be > 0");
        }
        if self.serial.read_timeout_ms == 0 {
            eyre::bail!("serial.read_timeout_ms must be >= 1");
        }

        // Sensor
        if self.sensor.path.as_os_str().is_empty() {
            eyre::bail!("sensor.path must not be empty");
        }
        if self.sensor.retry_delay_ms == 0 {
            eyre::bail!("sensor.retry_delay_ms must be >= 1");
        }
        if self.sensor.max_attempts == Some(0) {
            eyre::bail!("sensor.max_attempts must be >= 1 when set");
        }

        // Log
        if self.log.path.as_os_str().is_empty() {
            eyre::bail!("log.path must not be empty");
        }

        if self.sample_interval_s == 0 {
            eyre::bail!("sample_interval_s must be >= 1");
        }
        if self.sample_interval_s > 24 * 60 * 60 {
            eyre::bail!("sample_interval_s is unreasonably large (>24h)");
        }

        Ok(())
    }
}
