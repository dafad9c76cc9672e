//! Builder for `Session`.
//!
//! Probes and the log file are required; everything else defaults to the
//! field-logging constants from `templog_config`.

use std::time::Duration;

use chrono::NaiveDateTime;
use templog_config::Config;
use templog_traits::clock::{Clock, MonotonicClock};
use templog_traits::Thermometer;

use crate::error::{BuildError, Result};
use crate::logger::CsvLog;
use crate::retry::RetryPolicy;
use crate::session::Session;
use crate::shutdown::Shutdown;

/// Local wall time, second precision is applied when formatting.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub struct SessionBuilder {
    serial: Option<Box<dyn Thermometer>>,
    cpu: Option<Box<dyn Thermometer>>,
    log: Option<CsvLog>,
    clock: Option<Box<dyn Clock>>,
    retry: RetryPolicy,
    interval: Duration,
    shutdown: Option<Shutdown>,
    wall_clock: Option<Box<dyn Fn() -> NaiveDateTime>>,
    device: String,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            serial: None,
            cpu: None,
            log: None,
            clock: None,
            retry: RetryPolicy::default(),
            interval: Duration::from_secs(templog_config::SAMPLE_INTERVAL_S),
            shutdown: None,
            wall_clock: None,
            device: String::new(),
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take retry, interval, log path and device label from `cfg`.
    pub fn with_config(self, cfg: &Config) -> Self {
        self.with_retry(RetryPolicy::from(&cfg.sensor))
            .with_interval(cfg.sample_interval())
            .with_log(CsvLog::new(cfg.log.path.clone()))
            .with_device_label(cfg.serial.device.clone())
    }

    pub fn with_serial(mut self, t: impl Thermometer + 'static) -> Self {
        self.serial = Some(Box::new(t));
        self
    }

    pub fn with_cpu(mut self, t: impl Thermometer + 'static) -> Self {
        self.cpu = Some(Box::new(t));
        self
    }

    pub fn with_log(mut self, log: CsvLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Override the source of row timestamps.
    pub fn with_wall_clock(mut self, now: impl Fn() -> NaiveDateTime + 'static) -> Self {
        self.wall_clock = Some(Box::new(now));
        self
    }

    /// Name shown in progress output.
    pub fn with_device_label(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    pub fn build(self) -> Result<Session> {
        let serial = self
            .serial
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSerial))?;
        let cpu = self
            .cpu
            .ok_or_else(|| eyre::Report::new(BuildError::MissingCpu))?;
        let log = self
            .log
            .ok_or_else(|| eyre::Report::new(BuildError::MissingLog))?;
        if self.retry.max_attempts == Some(0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "retry.max_attempts must be >= 1",
            )));
        }
        Ok(Session {
            serial,
            cpu,
            log,
            clock: self.clock.unwrap_or_else(|| Box::new(MonotonicClock::new())),
            retry: self.retry,
            interval: self.interval,
            shutdown: self.shutdown.unwrap_or_default(),
            wall_clock: self.wall_clock.unwrap_or_else(|| Box::new(local_now)),
            device: self.device,
        })
    }
}
