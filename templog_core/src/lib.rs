#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core logging loop (hardware-agnostic).
//!
//! All device access goes through `templog_traits::Thermometer`, so the loop
//! runs the same against a USB serial board or a scripted probe.
//!
//! ## Architecture
//!
//! - **Session**: serial → cpu → log, then sleep (`session`, `builder`)
//! - **Retry**: fixed-delay retry of the CPU sensor (`retry`)
//! - **Log**: append-only CSV with a header on first write (`logger`)
//! - **Shutdown**: cooperative stop request from the interrupt handler (`shutdown`)
//! - **Errors**: fatal vs. cancelled outcomes (`error`, `hw_error`)

pub mod builder;
pub mod error;
pub mod hw_error;
pub mod logger;
pub mod mocks;
pub mod retry;
pub mod session;
pub mod shutdown;
pub mod status;

pub use builder::{SessionBuilder, local_now};
pub use error::{BuildError, LoggerError, Result};
pub use logger::{CsvLog, HEADER, HeaderState, LogRecord};
pub use retry::{RetryPolicy, read_with_retry};
pub use session::Session;
pub use shutdown::Shutdown;
pub use status::{Cycle, LoopState, Stopped};
