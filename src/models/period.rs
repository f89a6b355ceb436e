//! Timetable model: scheduled class periods and the derived per-instant
//! views (current/next period, attendance window).

use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;
use serde::Serialize;

/// One scheduled slot of the school/work day.
/// `period` is None for breaks and other non-numbered slots.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassPeriod {
    pub period: Option<u32>,
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Whether attendance is required during this slot (false for breaks).
    pub is_active: bool,
}

impl ClassPeriod {
    pub fn new(
        period: Option<u32>,
        label: &str,
        start: NaiveTime,
        end: NaiveTime,
        is_active: bool,
    ) -> Self {
        Self {
            period,
            label: label.to_string(),
            start,
            end,
            is_active,
        }
    }

    pub fn period_str(&self) -> String {
        match self.period {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        }
    }
}

/// The fixed daily timetable. Built once at startup, validated, then
/// immutable. Periods are ordered by start time and never overlap.
#[derive(Debug, Clone)]
pub struct Timetable {
    periods: Vec<ClassPeriod>,
}

impl Timetable {
    /// Validate ordering and non-overlap, then freeze the sequence.
    pub fn new(periods: Vec<ClassPeriod>) -> AppResult<Self> {
        for p in &periods {
            if p.start >= p.end {
                return Err(AppError::InvalidTimetable(format!(
                    "'{}' ends before it starts ({} >= {})",
                    p.label, p.start, p.end
                )));
            }
        }

        for w in periods.windows(2) {
            if w[1].start < w[0].end {
                return Err(AppError::InvalidTimetable(format!(
                    "'{}' overlaps '{}'",
                    w[1].label, w[0].label
                )));
            }
        }

        Ok(Self { periods })
    }

    pub fn periods(&self) -> &[ClassPeriod] {
        &self.periods
    }

    /// Number of slots that require attendance (breaks excluded).
    pub fn active_period_count(&self) -> u32 {
        self.periods.iter().filter(|p| p.is_active).count() as u32
    }

    pub fn find_by_number(&self, number: Option<u32>) -> Option<&ClassPeriod> {
        self.periods.iter().find(|p| p.period == number)
    }
}

/// Derived view: where we are in the day. Recomputed on demand,
/// never cached.
#[derive(Debug, Clone)]
pub struct PeriodStatus<'a> {
    pub current: Option<&'a ClassPeriod>,
    pub next: Option<&'a ClassPeriod>,
    pub time_remaining_min: i64,
    pub time_until_next_min: i64,
}

/// Derived view: whether an attendance action is currently legal for a
/// given period. `reason` explains a disallowed check-in.
#[derive(Debug, Clone)]
pub struct AttendanceWindow {
    pub can_check_in: bool,
    pub can_check_out: bool,
    pub reason: Option<String>,
}
