//! Retry policy for the CPU thermal sensor.
//!
//! A missing or half-written pseudo-file is transient; the read is retried
//! after a fixed delay. With the default unbounded policy the only way out
//! besides a reading is an operator interrupt.
use std::time::Duration;

use templog_config::SensorCfg;
use templog_traits::{Clock, Thermometer};

use crate::error::{LoggerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    /// None retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    pub fn bounded(delay: Duration, max_attempts: u32) -> Self {
        Self {
            delay,
            max_attempts: Some(max_attempts),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_millis(templog_config::SENSOR_RETRY_DELAY_MS))
    }
}

impl From<&SensorCfg> for RetryPolicy {
    fn from(c: &SensorCfg) -> Self {
        Self {
            delay: Duration::from_millis(c.retry_delay_ms),
            max_attempts: c.max_attempts,
        }
    }
}

/// Read `probe` until it yields a value, sleeping `policy.delay` between attempts.
///
/// `cancel` is polled before each sleep; when it reports true the loop ends
/// with `LoggerError::Cancelled`. A bounded policy ends with
/// `LoggerError::SensorUnavailable` once its attempts are used up.
pub fn read_with_retry<T, C>(
    probe: &mut T,
    policy: &RetryPolicy,
    clock: &C,
    cancel: &dyn Fn() -> bool,
) -> Result<f64>
where
    T: Thermometer + ?Sized,
    C: Clock + ?Sized,
{
    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);
        match probe.read_celsius() {
            Ok(v) => {
                if attempts > 1 {
                    tracing::debug!(attempts, "cpu sensor recovered");
                }
                return Ok(v);
            }
            Err(e) => {
                tracing::debug!(attempt = attempts, error = %e, "cpu sensor read failed");
                if let Some(max) = policy.max_attempts
                    && attempts >= max
                {
                    return Err(LoggerError::SensorUnavailable {
                        attempts,
                        last: e.to_string(),
                    }
                    .into());
                }
                if cancel() {
                    return Err(LoggerError::Cancelled.into());
                }
                clock.sleep(policy.delay);
            }
        }
    }
}
