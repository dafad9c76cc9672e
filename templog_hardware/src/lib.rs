//! Temperature probes backed by real devices.
//!
//! - `serial`: DHT22 board over USB serial (`serialport`)
//! - `sysfs`: CPU thermal zone pseudo-file
pub mod error;
pub mod serial;
pub mod sysfs;

pub use error::HwError;
pub use serial::{Frame, Reading, SerialThermometer, read_sample};
pub use sysfs::{SysfsThermometer, parse_millidegrees};
