//! Human-readable error descriptions and exit codes.

use templog_core::error::{BuildError, LoggerError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(le) = err.downcast_ref::<LoggerError>() {
        return match le {
            LoggerError::Malformed(line) => format!(
                "What happened: The serial device sent a reading that is not a number ({line}).\nLikely causes: Wrong device, wrong baud rate, or firmware printing something other than temperatures.\nHow to fix: Check the device path and that the board prints one temperature per line at 115200 baud."
            ),
            LoggerError::Serial(msg) => format!(
                "What happened: The serial device could not be read ({msg}).\nLikely causes: Device unplugged, wrong path, or missing permission (dialout group).\nHow to fix: Check the path (e.g. /dev/ttyACM3) and access rights, then rerun."
            ),
            LoggerError::Log(msg) => format!(
                "What happened: Writing the CSV log failed ({msg}).\nLikely causes: Read-only directory, full disk, or missing permission.\nHow to fix: Run from a writable directory or free up space."
            ),
            LoggerError::SensorUnavailable { attempts, last } => format!(
                "What happened: The CPU temperature sensor did not answer after {attempts} attempts (last error: {last}).\nLikely causes: No thermal zone on this machine.\nHow to fix: Check that /sys/devices/virtual/thermal/thermal_zone0/temp exists and is readable."
            ),
            LoggerError::Cancelled => "Interrupted before a reading was taken.".to_string(),
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: The logger could not be assembled ({be}).\nHow to fix: This is a bug; re-run with RUST_LOG=debug and report the output."
        );
    }

    let msg = err.to_string();
    if msg.contains("serial.") || msg.contains("sensor.") || msg.contains("log.") {
        return format!(
            "What happened: Invalid configuration ({msg}).\nHow to fix: Pass a device path, e.g. `templog /dev/ttyACM3`."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with RUST_LOG=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per failure kind; anything unclassified is 1.
pub fn exit_code_for_error(err: &eyre::Report) -> u8 {
    match err.downcast_ref::<LoggerError>() {
        Some(LoggerError::Malformed(_)) => 3,
        Some(LoggerError::Serial(_)) => 4,
        Some(LoggerError::Log(_)) => 5,
        Some(LoggerError::SensorUnavailable { .. }) => 6,
        Some(LoggerError::Cancelled) => 0,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_maps_to_three_with_hint() {
        let e = eyre::Report::new(LoggerError::Malformed("\"abc\"".into()));
        assert_eq!(exit_code_for_error(&e), 3);
        assert!(humanize(&e).contains("not a number"));
    }

    #[test]
    fn serial_open_failure_mentions_permissions() {
        let e = eyre::Report::new(LoggerError::Serial("open serial port /dev/x: denied".into()));
        assert_eq!(exit_code_for_error(&e), 4);
        assert!(humanize(&e).contains("dialout"));
    }

    #[test]
    fn untyped_errors_fall_back_to_one() {
        let e = eyre::eyre!("serial.device must not be empty");
        assert_eq!(exit_code_for_error(&e), 1);
        assert!(humanize(&e).contains("Invalid configuration"));
    }
}
