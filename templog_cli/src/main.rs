//! `templog`: sample a USB serial thermometer and the CPU thermal zone every
//! five minutes and append both to `temp.csv`.

mod cli;
mod error_fmt;

use std::process::ExitCode;

use clap::Parser;
use eyre::{Result, WrapErr};
use templog_config::Config;
use templog_core::{Session, Shutdown, Stopped};
use templog_hardware::{SerialThermometer, SysfsThermometer};

use crate::cli::Cli;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> Result<Stopped> {
    let cfg = Config::for_device(cli.device.as_str());
    cfg.validate()?;

    let shutdown = Shutdown::new();
    let handler = shutdown.clone();
    ctrlc::set_handler(move || handler.trigger()).wrap_err("install Ctrl+C handler")?;
    println!("Press Ctrl+C to quit");

    let serial = SerialThermometer::new(
        cfg.serial.device.clone(),
        cfg.serial.baud_rate,
        cfg.serial_timeout(),
    )
    .with_cancel(shutdown.checker());
    let cpu = SysfsThermometer::new(cfg.sensor.path.clone());

    let mut session = Session::builder()
        .with_config(&cfg)
        .with_serial(serial)
        .with_cpu(cpu)
        .with_shutdown(shutdown)
        .build()?;
    tracing::debug!(?session, "session ready");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    session.run(&mut out)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = color_eyre::install();
    init_tracing();

    match run(&cli) {
        Ok(stopped) => {
            tracing::info!(cycles = stopped.cycles, "interrupted by operator");
            println!("You pressed Ctrl+C! Quitting application");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("{}", error_fmt::humanize(&e));
            ExitCode::from(error_fmt::exit_code_for_error(&e))
        }
    }
}
