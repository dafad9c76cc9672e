//! Test and helper mocks for templog_core

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use templog_traits::Thermometer;

pub type ProbeError = Box<dyn std::error::Error + Send + Sync>;

/// A thermometer replaying a fixed script of results.
///
/// Once the script runs out it keeps returning `fallback` (or an error when
/// no fallback is set). An optional hook runs after every read, e.g. to
/// request a shutdown from inside a test.
pub struct ScriptedThermometer {
    script: VecDeque<Result<f64, ProbeError>>,
    fallback: Option<f64>,
    reads: Arc<AtomicUsize>,
    after_read: Option<Box<dyn Fn(usize) + Send>>,
}

impl ScriptedThermometer {
    pub fn new(script: impl IntoIterator<Item = Result<f64, ProbeError>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: None,
            reads: Arc::new(AtomicUsize::new(0)),
            after_read: None,
        }
    }

    /// Always returns `v`.
    pub fn constant(v: f64) -> Self {
        Self::new(Vec::new()).with_fallback(v)
    }

    pub fn with_fallback(mut self, v: f64) -> Self {
        self.fallback = Some(v);
        self
    }

    /// Called with the 1-based read count after each read.
    pub fn after_read(mut self, hook: impl Fn(usize) + Send + 'static) -> Self {
        self.after_read = Some(Box::new(hook));
        self
    }

    /// Shared read counter, usable after the probe moved into a session.
    pub fn reads(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }
}

impl Thermometer for ScriptedThermometer {
    fn read_celsius(&mut self) -> Result<f64, ProbeError> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        let out = match self.script.pop_front() {
            Some(r) => r,
            None => self
                .fallback
                .ok_or_else(|| ProbeError::from("script exhausted")),
        };
        if let Some(hook) = &self.after_read {
            hook(n);
        }
        out
    }
}
