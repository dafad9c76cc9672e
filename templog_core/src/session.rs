//! The sampling loop: serial reading, CPU reading, one CSV row, sleep.
//!
//! A stop request is honoured between steps and during the sleep. Serial and
//! log failures end the loop with an error; CPU sensor failures are retried.

use std::io::Write;
use std::time::Duration;

use chrono::NaiveDateTime;
use templog_traits::{Clock, Thermometer};

use crate::builder::SessionBuilder;
use crate::error::{LoggerError, Result, is_cancelled};
use crate::hw_error::map_hw_error;
use crate::logger::{CsvLog, HeaderState};
use crate::retry::{RetryPolicy, read_with_retry};
use crate::shutdown::Shutdown;
use crate::status::{Cycle, LoopState, Stopped};

pub struct Session {
    pub(crate) serial: Box<dyn Thermometer>,
    pub(crate) cpu: Box<dyn Thermometer>,
    pub(crate) log: CsvLog,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) retry: RetryPolicy,
    pub(crate) interval: Duration,
    pub(crate) shutdown: Shutdown,
    pub(crate) wall_clock: Box<dyn Fn() -> NaiveDateTime>,
    pub(crate) device: String,
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("device", &self.device)
            .field("log", &self.log.path())
            .field("retry", &self.retry)
            .field("interval", &self.interval)
            .field("stopping", &self.shutdown.is_triggered())
            .finish()
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Token that stops this session when triggered.
    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn log(&self) -> &CsvLog {
        &self.log
    }

    /// One serial → cpu → log pass. Progress text goes to `out`.
    pub fn run_cycle<W: Write>(&mut self, out: &mut W) -> Result<Cycle> {
        if self.shutdown.is_triggered() {
            return Ok(Cycle::Interrupted);
        }
        writeln!(out, "Collecting data... (USB = {})", self.device)?;
        let started = self.clock.now();

        let serial = match self.serial.read_celsius() {
            Ok(v) => v,
            Err(e) => match map_hw_error(&*e) {
                LoggerError::Cancelled => return Ok(Cycle::Interrupted),
                fatal => {
                    tracing::error!(device = %self.device, error = %fatal, "serial read failed");
                    return Err(fatal.into());
                }
            },
        };
        if self.shutdown.is_triggered() {
            return Ok(Cycle::Interrupted);
        }

        let shutdown = &self.shutdown;
        let cancel = || shutdown.is_triggered();
        let cpu = match read_with_retry(
            self.cpu.as_mut(),
            &self.retry,
            self.clock.as_ref(),
            &cancel,
        ) {
            Ok(v) => v,
            Err(e) if is_cancelled(&e) => return Ok(Cycle::Interrupted),
            Err(e) => {
                tracing::error!(error = %e, "cpu sensor gave up");
                return Err(e);
            }
        };
        if self.shutdown.is_triggered() {
            return Ok(Cycle::Interrupted);
        }

        let (header, record) = self.log.write((self.wall_clock)(), serial, cpu)?;
        match header {
            HeaderState::Created => {
                writeln!(out, "Creating log file: {}", self.log.path().display())?;
            }
            HeaderState::Reinitialized => {
                tracing::warn!(path = %self.log.path().display(), "log file was empty, header rewritten");
                writeln!(out, "Creating log file headers")?;
            }
            HeaderState::Present => {}
        }
        writeln!(out, "Log: {}", record.line())?;
        tracing::info!(
            dht22 = %record.dht22,
            cpu = %record.cpu,
            elapsed_ms = self.clock.ms_since(started),
            "row logged"
        );
        Ok(Cycle::Logged(record))
    }

    /// Sample until a stop is requested or a fatal error occurs.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<Stopped> {
        let mut state = LoopState::Running;
        let mut cycles: u64 = 0;
        while state == LoopState::Running {
            match self.run_cycle(out)? {
                Cycle::Logged(_) => {
                    cycles += 1;
                    writeln!(out, "Zzz...")?;
                    out.flush()?;
                    if self.shutdown.wait(self.interval) {
                        state = LoopState::Terminated;
                    }
                }
                Cycle::Interrupted => state = LoopState::Terminated,
            }
        }
        tracing::info!(cycles, "sampling stopped");
        Ok(Stopped { cycles })
    }
}
