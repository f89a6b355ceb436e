pub mod backup;
pub mod checkin;
pub mod checkout;
pub mod config;
pub mod credential;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod location;
pub mod log;
pub mod stats;
pub mod status;

use crate::cli::parser::Cli;
use crate::core::ports::{Clock, FixedClock, SystemClock};
use crate::errors::{AppError, AppResult};

/// Resolve the clock: frozen when --at is given, wall clock otherwise.
pub(crate) fn resolve_clock(cli: &Cli) -> AppResult<Box<dyn Clock>> {
    match &cli.at {
        Some(s) => FixedClock::parse(s)
            .map(|c| Box::new(c) as Box<dyn Clock>)
            .ok_or_else(|| AppError::InvalidTime(format!("--at expects 'YYYY-MM-DD HH:MM', got '{s}'"))),
        None => Ok(Box::new(SystemClock)),
    }
}
