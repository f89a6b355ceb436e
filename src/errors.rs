//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.
//!
//! Note the split mandated by the marking workflow: precondition refusals
//! ("window closed", "already checked in") are values (`MarkOutcome::Refused`),
//! not errors. AppError covers platform and environment failures only.

use crate::core::ports::LocationError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid attendance status: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Timetable / geofence errors
    // ---------------------------
    #[error("Invalid timetable: {0}")]
    InvalidTimetable(String),

    #[error("No geofence area registered with id {0}")]
    UnknownArea(i64),

    #[error("No active geofence area is configured")]
    NoActiveArea,

    // ---------------------------
    // Platform / environment errors
    // ---------------------------
    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Credential error: {0}")]
    Credential(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
