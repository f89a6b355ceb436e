//! Aggregation and reporting: pure derived views over the record store.
//!
//! "Possible periods" uses one convention everywhere: active periods ×
//! working days (Mon–Fri) in the range. The source system mixed
//! calendar days and working days between its daily and yearly paths;
//! here both go through `possible_periods`.

use crate::models::period::Timetable;
use crate::models::record::{AttendanceRecord, AttendanceStatus};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSummary {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub possible: u32,
    pub rate_pct: f64,
}

#[derive(Debug, Clone)]
pub struct MonthRollup {
    pub month: String, // YYYY-MM
    pub present: u32,
    pub late: u32,
    pub rate_pct: f64,
}

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Working days (Mon–Fri) in [start, end], inclusive.
pub fn working_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }

    let mut count = 0;
    let mut d = start;
    while d <= end {
        if is_working_day(d) {
            count += 1;
        }
        d += Duration::days(1);
    }
    count
}

/// Denominator for the attendance rate.
pub fn possible_periods(timetable: &Timetable, start: NaiveDate, end: NaiveDate) -> u32 {
    timetable.active_period_count() * working_days_between(start, end)
}

/// Present/late/absent counts and rate over [start, end].
/// Absent = possible slots with no attended record.
/// Weekend records are excluded from the counts: the denominator only
/// covers working days, so counting them would push the rate past 100%.
pub fn summarize(
    records: &[AttendanceRecord],
    timetable: &Timetable,
    start: NaiveDate,
    end: NaiveDate,
) -> RangeSummary {
    let in_range = records
        .iter()
        .filter(|r| r.date >= start && r.date <= end && is_working_day(r.date));

    let mut present = 0;
    let mut late = 0;
    for r in in_range {
        match r.status {
            AttendanceStatus::Present => present += 1,
            AttendanceStatus::Late => late += 1,
            _ => {}
        }
    }

    let possible = possible_periods(timetable, start, end);
    let absent = possible.saturating_sub(present + late);

    let rate_pct = if possible == 0 {
        0.0
    } else {
        (present + late) as f64 / possible as f64 * 100.0
    };

    RangeSummary {
        present,
        late,
        absent,
        possible,
        rate_pct,
    }
}

/// Current consecutive-day streak: walk back from the most recent
/// recorded date while every record that day is present or late and the
/// recorded working days are consecutive (weekends are skipped, not
/// streak-breaking).
pub fn current_streak(records: &[AttendanceRecord]) -> u32 {
    let mut by_date: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for r in records {
        let ok = r.status.counts_as_attended();
        by_date
            .entry(r.date)
            .and_modify(|all_ok| *all_ok &= ok)
            .or_insert(ok);
    }

    let mut streak = 0;
    let mut expected: Option<NaiveDate> = None;

    for (&date, &all_ok) in by_date.iter().rev() {
        if !all_ok {
            break;
        }
        if let Some(exp) = expected
            && date != exp
        {
            break;
        }

        streak += 1;

        // previous working day
        let mut prev = date - Duration::days(1);
        while !is_working_day(prev) {
            prev -= Duration::days(1);
        }
        expected = Some(prev);
    }

    streak
}

/// Per-month present/late counts and rate, keyed YYYY-MM.
pub fn monthly_rollups(records: &[AttendanceRecord], timetable: &Timetable) -> Vec<MonthRollup> {
    let mut months: BTreeMap<String, (u32, u32, NaiveDate, NaiveDate)> = BTreeMap::new();

    for r in records {
        if !is_working_day(r.date) {
            continue;
        }
        let key = r.date.format("%Y-%m").to_string();
        let first = NaiveDate::from_ymd_opt(r.date.year(), r.date.month(), 1).unwrap();
        let last = if r.date.month() == 12 {
            NaiveDate::from_ymd_opt(r.date.year() + 1, 1, 1).unwrap() - Duration::days(1)
        } else {
            NaiveDate::from_ymd_opt(r.date.year(), r.date.month() + 1, 1).unwrap()
                - Duration::days(1)
        };

        let entry = months.entry(key).or_insert((0, 0, first, last));
        match r.status {
            AttendanceStatus::Present => entry.0 += 1,
            AttendanceStatus::Late => entry.1 += 1,
            _ => {}
        }
    }

    months
        .into_iter()
        .map(|(month, (present, late, first, last))| {
            let possible = possible_periods(timetable, first, last);
            let rate_pct = if possible == 0 {
                0.0
            } else {
                (present + late) as f64 / possible as f64 * 100.0
            };
            MonthRollup {
                month,
                present,
                late,
                rate_pct,
            }
        })
        .collect()
}
