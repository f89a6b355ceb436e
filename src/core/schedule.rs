//! Period evaluator: pure functions of "now" (minute resolution) and the
//! static timetable. Everything here is recomputed fresh on each call;
//! callers re-invoke it periodically rather than caching results.

use crate::models::period::{AttendanceWindow, ClassPeriod, PeriodStatus, Timetable};
use chrono::NaiveTime;

/// Check-in opens this many minutes before the period starts.
pub const CHECK_IN_EARLY_MIN: i64 = 5;
/// Check-in closes this many minutes after the period starts.
pub const CHECK_IN_LATE_MIN: i64 = 10;
/// Arriving later than this after start classifies the mark as late.
/// Independent of the check-in window; evaluated at mark time.
pub const LATE_GRACE_MIN: i64 = 5;

fn minutes_from(start: NaiveTime, now: NaiveTime) -> i64 {
    now.signed_duration_since(start).num_minutes()
}

/// The period whose [start, end) contains `now`, if any.
/// The timetable invariant (ordered, non-overlapping) guarantees at most
/// one match; the linear scan returns the first.
pub fn current_period(timetable: &Timetable, now: NaiveTime) -> Option<&ClassPeriod> {
    timetable
        .periods()
        .iter()
        .find(|p| p.start <= now && now < p.end)
}

/// The first period starting strictly after `now`, if any.
pub fn next_period(timetable: &Timetable, now: NaiveTime) -> Option<&ClassPeriod> {
    timetable.periods().iter().find(|p| p.start > now)
}

/// Full derived view for display: current/next period plus minute counts.
pub fn period_status(timetable: &Timetable, now: NaiveTime) -> PeriodStatus<'_> {
    let current = current_period(timetable, now);
    let next = next_period(timetable, now);

    let time_remaining_min = current
        .map(|p| minutes_from(now, p.end).max(0))
        .unwrap_or(0);
    let time_until_next_min = next
        .map(|p| minutes_from(now, p.start).max(0))
        .unwrap_or(0);

    PeriodStatus {
        current,
        next,
        time_remaining_min,
        time_until_next_min,
    }
}

/// Whether check-in/check-out are legal for `period` at `now`.
///
/// Check-in window:  [start − 5 min, start + 10 min], inclusive.
/// Check-out window: [start, end], inclusive.
/// Breaks never allow either.
pub fn attendance_window(period: &ClassPeriod, now: NaiveTime) -> AttendanceWindow {
    if !period.is_active {
        return AttendanceWindow {
            can_check_in: false,
            can_check_out: false,
            reason: Some(format!("'{}' is a break, no attendance required", period.label)),
        };
    }

    let offset = minutes_from(period.start, now);

    let can_check_in = (-CHECK_IN_EARLY_MIN..=CHECK_IN_LATE_MIN).contains(&offset);
    let can_check_out = now >= period.start && now <= period.end;

    let reason = if can_check_in {
        None
    } else if offset < -CHECK_IN_EARLY_MIN {
        Some(format!(
            "Check-in for '{}' opens at {}",
            period.label,
            period.start - chrono::Duration::minutes(CHECK_IN_EARLY_MIN)
        ))
    } else {
        Some(format!(
            "Check-in for '{}' closed at {}",
            period.label,
            period.start + chrono::Duration::minutes(CHECK_IN_LATE_MIN)
        ))
    };

    AttendanceWindow {
        can_check_in,
        can_check_out,
        reason,
    }
}

/// Late iff now is past start + grace. Present otherwise.
pub fn is_late(period: &ClassPeriod, now: NaiveTime) -> bool {
    minutes_from(period.start, now) > LATE_GRACE_MIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn timetable() -> Timetable {
        Config::default().timetable().unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn current_period_contains_now() {
        let tt = timetable();

        // sweep the whole day at minute resolution
        for m in 0..(24 * 60) {
            let now = NaiveTime::from_num_seconds_from_midnight_opt(m * 60, 0).unwrap();
            if let Some(p) = current_period(&tt, now) {
                assert!(p.start <= now && now < p.end, "bound violated at {}", now);
            }
        }
    }

    #[test]
    fn current_period_boundaries() {
        let tt = timetable();

        // inclusive start, exclusive end
        assert_eq!(current_period(&tt, t("08:45")).unwrap().period, Some(2));
        assert_eq!(current_period(&tt, t("09:29")).unwrap().period, Some(2));
        assert_eq!(current_period(&tt, t("09:30")).unwrap().period, None); // break
        assert!(current_period(&tt, t("15:00")).is_none());
    }

    #[test]
    fn next_period_is_first_after_now() {
        let tt = timetable();
        assert_eq!(next_period(&tt, t("07:00")).unwrap().period, Some(1));
        assert_eq!(next_period(&tt, t("08:50")).unwrap().period, None); // break at 09:30
        assert!(next_period(&tt, t("14:00")).is_none());
    }

    #[test]
    fn check_in_window_boundaries() {
        let tt = timetable();
        let p2 = tt.find_by_number(Some(2)).unwrap(); // starts 08:45

        assert!(attendance_window(p2, t("08:40")).can_check_in);
        assert!(attendance_window(p2, t("08:55")).can_check_in);
        assert!(!attendance_window(p2, t("08:39")).can_check_in);
        assert!(!attendance_window(p2, t("08:56")).can_check_in);
    }

    #[test]
    fn check_out_window_is_start_to_end_inclusive() {
        let tt = timetable();
        let p2 = tt.find_by_number(Some(2)).unwrap(); // 08:45–09:30

        assert!(!attendance_window(p2, t("08:44")).can_check_out);
        assert!(attendance_window(p2, t("08:45")).can_check_out);
        assert!(attendance_window(p2, t("09:30")).can_check_out);
        assert!(!attendance_window(p2, t("09:31")).can_check_out);
    }

    #[test]
    fn breaks_never_allow_attendance() {
        let tt = timetable();
        let lunch = tt
            .periods()
            .iter()
            .find(|p| p.label == "Lunch")
            .unwrap();

        for m in 0..(24 * 60) {
            let now = NaiveTime::from_num_seconds_from_midnight_opt(m * 60, 0).unwrap();
            let w = attendance_window(lunch, now);
            assert!(!w.can_check_in);
            assert!(!w.can_check_out);
        }
    }

    #[test]
    fn late_boundary_is_five_minutes_after_start() {
        let tt = timetable();
        let p2 = tt.find_by_number(Some(2)).unwrap(); // starts 08:45

        assert!(!is_late(p2, t("08:50")));
        assert!(is_late(p2, t("08:51")));
    }

    #[test]
    fn status_minute_counts_are_non_negative() {
        let tt = timetable();

        let st = period_status(&tt, t("08:46"));
        assert_eq!(st.current.unwrap().period, Some(2));
        assert_eq!(st.time_remaining_min, 44);
        assert!(st.time_until_next_min >= 0);

        let st = period_status(&tt, t("20:00"));
        assert!(st.current.is_none());
        assert!(st.next.is_none());
        assert_eq!(st.time_remaining_min, 0);
        assert_eq!(st.time_until_next_min, 0);
    }
}
