//! Attendance record queries: lookup by key, insert on check-in,
//! in-place update on check-out, range loads for listing/stats/export.

use crate::errors::{AppError, AppResult};
use crate::models::record::{AttendanceRecord, AttendanceStatus};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<AttendanceRecord> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let parse_opt_time = |col: &str, v: Option<String>| -> Result<Option<NaiveTime>> {
        match v {
            None => Ok(None),
            Some(s) => NaiveTime::parse_from_str(&s, "%H:%M").map(Some).map_err(|_| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(AppError::InvalidTime(format!("{col}: {s}"))),
                )
            }),
        }
    };

    let check_in = parse_opt_time("check_in", row.get("check_in")?)?;
    let check_out = parse_opt_time("check_out", row.get("check_out")?)?;

    let status_str: String = row.get("status")?;
    let status = AttendanceStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        period_number: row.get::<_, Option<u32>>("period")?,
        period_label: row.get("period_label")?,
        date,
        check_in_time: check_in,
        check_out_time: check_out,
        status,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        accuracy_m: row.get("accuracy_m")?,
        location_verified: row.get::<_, i32>("location_verified")? == 1,
        distance_m: row.get("distance_m")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Load the record for one (student, date, period) key, if present.
pub fn get_record(
    conn: &Connection,
    student_id: &str,
    date: &NaiveDate,
    period: Option<u32>,
) -> AppResult<Option<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM attendance
         WHERE student_id = ?1 AND date = ?2 AND IFNULL(period, -1) = ?3",
    )?;

    let key_period: i64 = period.map(i64::from).unwrap_or(-1);
    let rec = stmt
        .query_row(
            params![student_id, date.format("%Y-%m-%d").to_string(), key_period],
            map_row,
        )
        .optional()?;

    Ok(rec)
}

/// Insert-or-replace the record for its key (last write wins).
pub fn upsert_record(conn: &Connection, rec: &AttendanceRecord) -> AppResult<()> {
    conn.execute(
        "INSERT INTO attendance
            (student_id, date, period, period_label, check_in, check_out, status,
             latitude, longitude, accuracy_m, location_verified, distance_m,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
         ON CONFLICT(student_id, date, IFNULL(period, -1)) DO UPDATE SET
            period_label = excluded.period_label,
            check_in = excluded.check_in,
            check_out = excluded.check_out,
            status = excluded.status,
            latitude = excluded.latitude,
            longitude = excluded.longitude,
            accuracy_m = excluded.accuracy_m,
            location_verified = excluded.location_verified,
            distance_m = excluded.distance_m,
            updated_at = excluded.updated_at",
        params![
            rec.student_id,
            rec.date.format("%Y-%m-%d").to_string(),
            rec.period_number,
            rec.period_label,
            rec.check_in_time.map(|t| t.format("%H:%M").to_string()),
            rec.check_out_time.map(|t| t.format("%H:%M").to_string()),
            rec.status.to_db_str(),
            rec.latitude,
            rec.longitude,
            rec.accuracy_m,
            if rec.location_verified { 1 } else { 0 },
            rec.distance_m,
            rec.created_at,
            rec.updated_at,
        ],
    )?;
    Ok(())
}

/// Set the check-out time on an existing record, in place.
pub fn update_check_out(
    conn: &Connection,
    record_id: i64,
    check_out: NaiveTime,
    updated_at: &str,
) -> AppResult<()> {
    conn.execute(
        "UPDATE attendance SET check_out = ?1, updated_at = ?2 WHERE id = ?3",
        params![check_out.format("%H:%M").to_string(), updated_at, record_id],
    )?;
    Ok(())
}

/// Load all records for a student, optionally bounded by date (inclusive).
pub fn load_records(
    conn: &Connection,
    student_id: &str,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<AttendanceRecord>> {
    let mut out = Vec::new();

    match bounds {
        None => {
            let mut stmt = conn.prepare(
                "SELECT * FROM attendance
                 WHERE student_id = ?1
                 ORDER BY date ASC, IFNULL(period, -1) ASC",
            )?;
            let rows = stmt.query_map([student_id], map_row)?;
            for r in rows {
                out.push(r?);
            }
        }
        Some((start, end)) => {
            let mut stmt = conn.prepare(
                "SELECT * FROM attendance
                 WHERE student_id = ?1 AND date BETWEEN ?2 AND ?3
                 ORDER BY date ASC, IFNULL(period, -1) ASC",
            )?;
            let rows = stmt.query_map(
                params![
                    student_id,
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string()
                ],
                map_row,
            )?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

pub fn load_records_by_date(
    conn: &Connection,
    student_id: &str,
    date: &NaiveDate,
) -> AppResult<Vec<AttendanceRecord>> {
    load_records(conn, student_id, Some((*date, *date)))
}
