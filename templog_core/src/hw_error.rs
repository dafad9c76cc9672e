//! Maps `Box<dyn Error>` from trait boundaries to typed `LoggerError`.
//!
//! The traits in `templog_traits` use `Box<dyn Error + Send + Sync>` so probes
//! stay free of core types; this module converts those to our typed error
//! enum, with an optional feature-gated path for `templog_hardware::HwError`.

use crate::error::LoggerError;

/// Map a serial-probe error to a typed `LoggerError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> LoggerError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<templog_hardware::HwError>() {
            return match hw {
                templog_hardware::HwError::Malformed(msg) => LoggerError::Malformed(msg.clone()),
                templog_hardware::HwError::Cancelled => LoggerError::Cancelled,
                other => LoggerError::Serial(other.to_string()),
            };
        }
    }

    if let Some(le) = e.downcast_ref::<LoggerError>() {
        return le.clone();
    }

    // Fallback: string-based detection
    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("cancelled") {
        LoggerError::Cancelled
    } else if lower.contains("malformed") || lower.contains("invalid float") {
        LoggerError::Malformed(s)
    } else {
        LoggerError::Serial(s)
    }
}
