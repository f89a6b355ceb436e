//! `--range` parser shared by export, list, and stats.
//!
//! Accepted forms:
//! - YYYY
//! - YYYY-MM
//! - YYYY-MM-DD
//! - any of the above joined with ':' (both sides in the same form)

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

fn bad(msg: &str) -> AppError {
    AppError::Export(format!("invalid --range: {msg}"))
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}

/// Parse one bound of a range; `last` selects the end of the implied
/// span (Dec 31 for a year, last day for a month).
fn parse_bound(s: &str, last: bool) -> AppResult<NaiveDate> {
    // byte positions below assume ASCII digits and dashes
    if !s.is_ascii() {
        return Err(bad("unsupported format"));
    }

    match s.len() {
        // YYYY
        4 => {
            let y: i32 = s.parse().map_err(|_| bad("year"))?;
            let (m, d) = if last { (12, 31) } else { (1, 1) };
            NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| bad("year"))
        }
        // YYYY-MM
        7 => {
            let y: i32 = s[0..4].parse().map_err(|_| bad("year"))?;
            let m: u32 = s[5..7].parse().map_err(|_| bad("month"))?;
            let d = if last {
                month_last_day(y, m).ok_or_else(|| bad("month"))?
            } else {
                1
            };
            NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| bad("month"))
        }
        // YYYY-MM-DD
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| bad("date")),
        _ => Err(bad("unsupported format")),
    }
}

/// Parse a range expression into inclusive date bounds.
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(bad("start and end must have the same format"));
        }

        let d1 = parse_bound(start, false)?;
        let d2 = parse_bound(end, true)?;

        if d2 < d1 {
            return Err(bad("end before start"));
        }

        Ok((d1, d2))
    } else {
        Ok((parse_bound(r, false)?, parse_bound(r, true)?))
    }
}
