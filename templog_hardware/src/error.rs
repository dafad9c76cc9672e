use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("open serial port {path}: {reason}")]
    Open { path: String, reason: String },
    #[error("serial device closed the stream")]
    Disconnected,
    #[error("malformed reading: {0}")]
    Malformed(String),
    #[error("read cancelled")]
    Cancelled,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
