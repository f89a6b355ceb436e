//! Schema creation and versioned migrations.
//!
//! Every migration is recorded in the `log` table as
//! `migration_applied`, so re-running is cheap and idempotent.

use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Attendance records: one row per (student, date, period) key.
///
/// SQLite treats NULLs as distinct in UNIQUE constraints, so the key
/// index maps a missing period to -1 to get real upsert semantics for
/// non-numbered slots too.
fn create_attendance_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id        TEXT NOT NULL,
            date              TEXT NOT NULL,
            period            INTEGER,
            period_label      TEXT NOT NULL DEFAULT '',
            check_in          TEXT,
            check_out         TEXT,
            status            TEXT NOT NULL CHECK(status IN ('present','late','absent','partial')),
            latitude          REAL,
            longitude         REAL,
            accuracy_m        REAL,
            location_verified INTEGER NOT NULL DEFAULT 0,
            distance_m        REAL,
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_key
            ON attendance(student_id, date, IFNULL(period, -1));
        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        "#,
    )?;
    Ok(())
}

/// Geofence areas plus the rolling location sample log.
fn create_geofence_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS geofence_areas (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            latitude   REAL NOT NULL,
            longitude  REAL NOT NULL,
            radius_m   REAL NOT NULL,
            active     INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS location_samples (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id   TEXT NOT NULL,
            latitude     REAL NOT NULL,
            longitude    REAL NOT NULL,
            accuracy_m   REAL,
            timestamp_ms INTEGER NOT NULL,
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_samples_student_ts
            ON location_samples(student_id, timestamp_ms);
        "#,
    )?;
    Ok(())
}

fn create_credentials_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS credentials (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id    TEXT NOT NULL,
            name          TEXT NOT NULL DEFAULT '',
            credential_id TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

fn already_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations.
///
/// Invoked from db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Base schema
    let fresh = !table_exists(conn, "attendance")?;

    create_attendance_table(conn)?;
    create_geofence_tables(conn)?;
    create_credentials_table(conn)?;

    if fresh {
        let version = "20250901_0001_base_schema";
        if !already_applied(conn, version)? {
            mark_applied(conn, version, "Created attendance/geofence/credentials schema")?;
            success("Created attendance tables (base schema).");
        }
    }

    Ok(())
}
