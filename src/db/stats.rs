//! `db --info` output: file size, row counts, recorded date range.

use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let records: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM attendance", [], |row| row.get(0))?;
    let areas: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM geofence_areas", [], |row| row.get(0))?;
    let samples: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM location_samples", [], |row| row.get(0))?;

    println!(
        "{}• Attendance records:{} {}{}{}",
        CYAN, RESET, GREEN, records, RESET
    );
    println!(
        "{}• Geofence areas:{}     {}{}{}",
        CYAN, RESET, GREEN, areas, RESET
    );
    println!(
        "{}• Location samples:{}   {}{}{}",
        CYAN, RESET, GREEN, samples, RESET
    );

    //
    // 3) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM attendance ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM attendance ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    println!();
    Ok(())
}

/// `PRAGMA integrity_check`, surfaced for the `db --check` flag.
pub fn check_integrity(pool: &mut DbPool) -> rusqlite::Result<String> {
    pool.conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
}
