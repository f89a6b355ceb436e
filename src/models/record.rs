use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Partial,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Partial => "partial",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.as_str()
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "present" => Some(AttendanceStatus::Present),
            "late" => Some(AttendanceStatus::Late),
            "absent" => Some(AttendanceStatus::Absent),
            "partial" => Some(AttendanceStatus::Partial),
            _ => None,
        }
    }

    pub fn counts_as_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

/// One attendance record per (student, date, period-or-null) key.
/// Upsert semantics: at most one record per key, check-out mutates the
/// same row in place. Never deleted by normal operation.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: String,
    pub period_number: Option<u32>, // ⇔ attendance.period (NULL for breaks)
    pub period_label: String,
    pub date: NaiveDate,                  // ⇔ attendance.date (TEXT "YYYY-MM-DD")
    pub check_in_time: Option<NaiveTime>, // ⇔ attendance.check_in (TEXT "HH:MM")
    pub check_out_time: Option<NaiveTime>,
    pub status: AttendanceStatus,
    // captured location snapshot
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_m: Option<f64>,
    pub location_verified: bool,
    pub distance_m: Option<f64>,
    pub created_at: String, // ISO8601
    pub updated_at: String, // ISO8601
}

impl AttendanceRecord {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn check_in_str(&self) -> String {
        self.check_in_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    }

    pub fn check_out_str(&self) -> String {
        self.check_out_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string())
    }

    pub fn period_str(&self) -> String {
        match self.period_number {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        }
    }
}
