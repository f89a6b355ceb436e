//! Geofence area persistence.
//!
//! Write-side invariant: at most one area is active. Activation clears
//! every other row first, inside one transaction; deleting the active
//! area promotes an arbitrary survivor.

use crate::errors::{AppError, AppResult};
use crate::models::geofence::GeofenceArea;
use crate::models::location::{HISTORY_CAPACITY, LocationHistory, LocationSample};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_area(row: &Row) -> Result<GeofenceArea> {
    Ok(GeofenceArea {
        id: row.get("id")?,
        name: row.get("name")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        radius_m: row.get("radius_m")?,
        active: row.get::<_, i32>("active")? == 1,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Register a new area. The first registered area becomes active; later
/// ones only if `activate` is set (which deactivates the rest).
pub fn insert_area(
    conn: &mut Connection,
    name: &str,
    latitude: f64,
    longitude: f64,
    radius_m: f64,
    activate: bool,
) -> AppResult<GeofenceArea> {
    let now = Local::now().to_rfc3339();

    let tx = conn.transaction()?;

    let count: i64 = tx.query_row("SELECT COUNT(*) FROM geofence_areas", [], |r| r.get(0))?;
    let make_active = activate || count == 0;

    if make_active {
        tx.execute("UPDATE geofence_areas SET active = 0", [])?;
    }

    tx.execute(
        "INSERT INTO geofence_areas (name, latitude, longitude, radius_m, active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![name, latitude, longitude, radius_m, if make_active { 1 } else { 0 }, now],
    )?;
    let id = tx.last_insert_rowid();

    tx.commit()?;

    Ok(GeofenceArea {
        id,
        name: name.to_string(),
        latitude,
        longitude,
        radius_m,
        active: make_active,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub fn load_areas(conn: &Connection) -> AppResult<Vec<GeofenceArea>> {
    let mut stmt = conn.prepare("SELECT * FROM geofence_areas ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_area)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// The single active area, if any is configured.
pub fn active_area(conn: &Connection) -> AppResult<Option<GeofenceArea>> {
    let mut stmt = conn.prepare("SELECT * FROM geofence_areas WHERE active = 1 LIMIT 1")?;
    Ok(stmt.query_row([], map_area).optional()?)
}

/// Make `id` the active area, deactivating every other one.
pub fn activate_area(conn: &mut Connection, id: i64) -> AppResult<()> {
    let tx = conn.transaction()?;

    let exists: Option<i64> = tx
        .query_row("SELECT id FROM geofence_areas WHERE id = ?1", [id], |r| {
            r.get(0)
        })
        .optional()?;
    if exists.is_none() {
        return Err(AppError::UnknownArea(id));
    }

    tx.execute("UPDATE geofence_areas SET active = 0", [])?;
    tx.execute(
        "UPDATE geofence_areas SET active = 1, updated_at = ?1 WHERE id = ?2",
        params![Local::now().to_rfc3339(), id],
    )?;

    tx.commit()?;
    Ok(())
}

/// Delete an area. If it was the active one, promote an arbitrary
/// survivor so the "one active area" invariant holds whenever any area
/// exists at all.
pub fn delete_area(conn: &mut Connection, id: i64) -> AppResult<()> {
    let tx = conn.transaction()?;

    let was_active: Option<i32> = tx
        .query_row(
            "SELECT active FROM geofence_areas WHERE id = ?1",
            [id],
            |r| r.get(0),
        )
        .optional()?;

    let was_active = match was_active {
        None => return Err(AppError::UnknownArea(id)),
        Some(a) => a == 1,
    };

    tx.execute("DELETE FROM geofence_areas WHERE id = ?1", [id])?;

    if was_active {
        tx.execute(
            "UPDATE geofence_areas SET active = 1, updated_at = ?1
             WHERE id = (SELECT id FROM geofence_areas ORDER BY id ASC LIMIT 1)",
            [Local::now().to_rfc3339()],
        )?;
    }

    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------
// Location sample history (rolling, bounded per student)
// ---------------------------------------------------------------

/// Persist one delivered sample and trim the per-student history to the
/// ring-buffer capacity.
pub fn record_sample(conn: &Connection, student_id: &str, sample: &LocationSample) -> AppResult<()> {
    conn.execute(
        "INSERT INTO location_samples
            (student_id, latitude, longitude, accuracy_m, timestamp_ms, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            student_id,
            sample.latitude,
            sample.longitude,
            sample.accuracy_m,
            sample.timestamp_ms,
            Local::now().to_rfc3339()
        ],
    )?;

    conn.execute(
        "DELETE FROM location_samples
         WHERE student_id = ?1 AND id NOT IN (
            SELECT id FROM location_samples
            WHERE student_id = ?1
            ORDER BY timestamp_ms DESC, id DESC
            LIMIT ?2
         )",
        params![student_id, HISTORY_CAPACITY as i64],
    )?;

    Ok(())
}

/// Rebuild the rolling history (oldest first) for spoofing detection.
pub fn load_history(conn: &Connection, student_id: &str) -> AppResult<LocationHistory> {
    let mut stmt = conn.prepare(
        "SELECT latitude, longitude, accuracy_m, timestamp_ms FROM location_samples
         WHERE student_id = ?1
         ORDER BY timestamp_ms ASC, id ASC",
    )?;

    let rows = stmt.query_map([student_id], |row| {
        Ok(LocationSample::new(
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
        ))
    })?;

    let mut history = LocationHistory::new();
    for r in rows {
        history.push(r?);
    }
    Ok(history)
}
