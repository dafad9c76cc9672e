//! CLI argument definitions.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "templog", version, about = "Log temp from USB device")]
pub struct Cli {
    /// A USB serial device, for example /dev/ttyACM3
    #[arg(value_name = "USBDEVICE")]
    pub device: String,
}
