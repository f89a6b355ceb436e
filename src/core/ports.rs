//! Boundary contracts towards the host platform: wall clock, location
//! provider, and credential provider. Each is a trait so tests (and the
//! `--at` flag) can substitute deterministic implementations.
//!
//! Trust model: location and credential claims are client-reported and
//! taken at face value, exactly like the platform APIs they stand in
//! for. None of this is cryptographic proof of presence.

use crate::errors::AppResult;
use crate::models::location::LocationSample;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

// ---------------------------------------------------------------
// Clock
// ---------------------------------------------------------------

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Production clock: local wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Frozen clock used by tests and the `--at` flag.
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

impl FixedClock {
    /// Parse "YYYY-MM-DD HH:MM" into a fixed local clock.
    pub fn parse(s: &str) -> Option<Self> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok()?;
        Local.from_local_datetime(&naive).single().map(FixedClock)
    }
}

// ---------------------------------------------------------------
// Location provider
// ---------------------------------------------------------------

/// Platform location failures, categorized the way the host geolocation
/// API reports them. All are recoverable by user action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),

    #[error("location request timed out")]
    Timeout,
}

pub trait LocationProvider {
    fn current_position(&mut self) -> Result<LocationSample, LocationError>;
}

/// One-shot provider fed from command-line coordinates. Stands in for
/// the browser geolocation API; coordinates are client-reported either
/// way.
pub struct CliLocationProvider {
    latitude: Option<f64>,
    longitude: Option<f64>,
    accuracy_m: Option<f64>,
    timestamp_ms: i64,
}

impl CliLocationProvider {
    pub fn new(
        latitude: Option<f64>,
        longitude: Option<f64>,
        accuracy_m: Option<f64>,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
            timestamp_ms: now.timestamp_millis(),
        }
    }
}

impl LocationProvider for CliLocationProvider {
    fn current_position(&mut self) -> Result<LocationSample, LocationError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok(LocationSample::new(
                lat,
                lon,
                self.accuracy_m,
                self.timestamp_ms,
            )),
            _ => Err(LocationError::Unavailable(
                "no coordinates supplied (use --lat and --lon)".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------
// Credential provider
// ---------------------------------------------------------------

/// Opaque biometric/credential ceremony: success or failure, nothing
/// more. The stored implementation trusts the enrollment row the same
/// way the source system trusts a WebAuthn assertion.
pub trait CredentialProvider {
    fn register(&self, student_id: &str, name: &str) -> AppResult<String>;
    fn authenticate(&self, student_id: &str) -> AppResult<bool>;
}

pub struct StoredCredentialProvider<'a> {
    conn: &'a Connection,
}

impl<'a> StoredCredentialProvider<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl CredentialProvider for StoredCredentialProvider<'_> {
    fn register(&self, student_id: &str, name: &str) -> AppResult<String> {
        let credential_id = format!(
            "cred-{}-{}",
            student_id,
            Local::now().format("%Y%m%d%H%M%S%3f")
        );

        self.conn.execute(
            "INSERT INTO credentials (student_id, name, credential_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![student_id, name, credential_id, Local::now().to_rfc3339()],
        )?;

        Ok(credential_id)
    }

    fn authenticate(&self, student_id: &str) -> AppResult<bool> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT credential_id FROM credentials
                 WHERE student_id = ?1
                 ORDER BY id DESC LIMIT 1",
                [student_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_parses_minute_resolution() {
        let clock = FixedClock::parse("2025-03-10 08:46").expect("parse");
        assert_eq!(clock.now().format("%H:%M").to_string(), "08:46");
    }

    #[test]
    fn cli_provider_without_coordinates_is_unavailable() {
        let mut p = CliLocationProvider::new(None, None, None, Local::now());
        assert!(matches!(
            p.current_position(),
            Err(LocationError::Unavailable(_))
        ));
    }
}
