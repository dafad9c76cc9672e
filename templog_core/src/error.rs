use thiserror::Error;

/// Failures of one sampling cycle.
///
/// Everything here is fatal except `Cancelled`, which is how an operator
/// interrupt surfaces from a blocking read. CPU sensor failures never show
/// up here under an unbounded retry policy; they are absorbed by the retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoggerError {
    #[error("serial device error: {0}")]
    Serial(String),
    #[error("malformed serial reading: {0}")]
    Malformed(String),
    #[error("cpu sensor unavailable after {attempts} attempts: {last}")]
    SensorUnavailable { attempts: u32, last: String },
    #[error("log file error: {0}")]
    Log(String),
    #[error("interrupted")]
    Cancelled,
}

impl LoggerError {
    #[inline]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LoggerError::Cancelled)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing serial thermometer")]
    MissingSerial,
    #[error("missing cpu thermometer")]
    MissingCpu,
    #[error("missing log file")]
    MissingLog,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// True when `err` carries an operator interrupt rather than a failure.
pub fn is_cancelled(err: &Report) -> bool {
    matches!(err.downcast_ref::<LoggerError>(), Some(LoggerError::Cancelled))
}
