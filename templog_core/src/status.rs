//! Outcomes of the sampling loop.

use crate::logger::LogRecord;

/// Loop state: sampling continues until an interrupt or a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Result of a single serial → cpu → log pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// A row was written to the log.
    Logged(LogRecord),
    /// A stop was requested before the row was written; nothing was appended.
    Interrupted,
}

/// Summary returned when the loop ends on an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped {
    pub cycles: u64,
}
