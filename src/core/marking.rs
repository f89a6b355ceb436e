//! Attendance marking workflow.
//!
//! States per (student, date, period): unmarked → present|late →
//! optionally checked-out. There is no way back to unmarked.
//!
//! Precondition refusals are values (`MarkOutcome::Refused`), never
//! errors: the caller decides how to present them. Platform failures
//! (no DB, no active geofence, location unavailable) are AppErrors.

use crate::config::Config;
use crate::core::geofence::{accuracy_ok, detect_spoofing, distance_from_area_rounded, is_within};
use crate::core::ports::{CredentialProvider, LocationProvider, StoredCredentialProvider};
use crate::core::schedule::{attendance_window, current_period, is_late};
use crate::core::watch::WatchRegistry;
use crate::db::geofence::{active_area, load_history, record_sample};
use crate::db::pool::DbPool;
use crate::db::queries::{get_record, update_check_out, upsert_record};
use crate::errors::{AppError, AppResult};
use crate::models::period::Timetable;
use crate::models::record::{AttendanceRecord, AttendanceStatus};
use chrono::{DateTime, Local};

#[derive(Debug)]
pub enum MarkOutcome {
    CheckedIn(AttendanceRecord),
    CheckedOut(AttendanceRecord),
    Refused { reason: String },
}

impl MarkOutcome {
    fn refused(reason: impl Into<String>) -> Self {
        MarkOutcome::Refused {
            reason: reason.into(),
        }
    }

    pub fn is_refused(&self) -> bool {
        matches!(self, MarkOutcome::Refused { .. })
    }
}

/// High-level business logic for `checkin` / `checkout`.
pub struct MarkingLogic;

impl MarkingLogic {
    pub fn check_in(
        pool: &mut DbPool,
        timetable: &Timetable,
        cfg: &Config,
        now: DateTime<Local>,
        provider: &mut dyn LocationProvider,
    ) -> AppResult<MarkOutcome> {
        let student = cfg.student_id.as_str();
        let date = now.date_naive();
        let time = now.time();

        //
        // 1️⃣ CREDENTIAL GATE (opaque: enrolled or not)
        //
        let enrolled = StoredCredentialProvider::new(&pool.conn).authenticate(student)?;
        if !enrolled {
            return Ok(MarkOutcome::refused(format!(
                "No enrolled credential for '{}'. Run 'rollcall credential enroll' first.",
                student
            )));
        }

        //
        // 2️⃣ OBTAIN A LOCATION FIX (platform error if it fails)
        //
        let sample = provider.current_position().map_err(AppError::Location)?;

        //
        // 3️⃣ ROLLING HISTORY: route the delivery through the watch
        //    registry, which persists and trims the sample log
        //
        let mut delivery_err: Option<AppError> = None;
        {
            let conn = &pool.conn;
            let mut watch = WatchRegistry::new();
            let handle = watch.subscribe(|s| {
                if delivery_err.is_none()
                    && let Err(e) = record_sample(conn, student, s)
                {
                    delivery_err = Some(e);
                }
            });
            watch.deliver(&sample);
            watch.unsubscribe(handle);
            watch.stop();
        }
        if let Some(e) = delivery_err {
            return Err(e);
        }

        let history = load_history(&pool.conn, student)?;

        //
        // 4️⃣ PRECONDITIONS, in order — first failure wins
        //
        // (a) a current period exists
        let period = match current_period(timetable, time) {
            Some(p) => p.clone(),
            None => {
                return Ok(MarkOutcome::refused(
                    "No scheduled class period right now",
                ));
            }
        };

        // (b) it is active, (c) the check-in window is open
        let window = attendance_window(&period, time);
        if !window.can_check_in {
            return Ok(MarkOutcome::refused(window.reason.unwrap_or_else(|| {
                format!("Check-in is not allowed for '{}' right now", period.label)
            })));
        }

        // the rest runs under one transaction: the existing-record check
        // and the insert must not interleave with another writer
        let tx = pool.conn.transaction()?;

        // (d) no existing checked-in record for this exact key
        if let Some(existing) = get_record(&tx, student, &date, period.period)?
            && existing.check_in_time.is_some()
        {
            return Ok(MarkOutcome::refused(format!(
                "Already checked in for '{}' on {} at {}",
                period.label,
                date,
                existing.check_in_str()
            )));
        }

        // (e) the sample passes accuracy validation — fail closed
        if !accuracy_ok(&sample, cfg.max_accuracy_m) {
            let reported = sample
                .accuracy_m
                .map(|a| format!("±{:.0} m", a))
                .unwrap_or_else(|| "not reported".to_string());
            return Ok(MarkOutcome::refused(format!(
                "Location accuracy {} exceeds the {:.0} m limit",
                reported, cfg.max_accuracy_m
            )));
        }

        // data quality: teleportation heuristic over the rolling history
        if detect_spoofing(&history, cfg.max_speed_mps) {
            return Ok(MarkOutcome::refused(
                "Location history is implausible (movement faster than the speed limit \
                 between recent fixes)",
            ));
        }

        // (f) inside the active geofence
        let area = active_area(&tx)?.ok_or(AppError::NoActiveArea)?;
        let distance_m = distance_from_area_rounded(&sample, &area);
        if !is_within(&sample, &area) {
            return Ok(MarkOutcome::refused(format!(
                "Outside '{}': {:.0} m from center (radius {:.0} m)",
                area.name, distance_m, area.radius_m
            )));
        }

        //
        // 5️⃣ CLASSIFY AND WRITE
        //
        let status = if is_late(&period, time) {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };

        let record = AttendanceRecord {
            id: 0,
            student_id: student.to_string(),
            period_number: period.period,
            period_label: period.label.clone(),
            date,
            check_in_time: Some(time),
            check_out_time: None,
            status,
            latitude: Some(sample.latitude),
            longitude: Some(sample.longitude),
            accuracy_m: sample.accuracy_m,
            location_verified: true,
            distance_m: Some(distance_m),
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        };

        upsert_record(&tx, &record)?;

        let stored = get_record(&tx, student, &date, period.period)?
            .ok_or_else(|| AppError::Other("record vanished after upsert".to_string()))?;

        tx.commit()?;

        Ok(MarkOutcome::CheckedIn(stored))
    }

    pub fn check_out(
        pool: &mut DbPool,
        timetable: &Timetable,
        cfg: &Config,
        now: DateTime<Local>,
    ) -> AppResult<MarkOutcome> {
        let student = cfg.student_id.as_str();
        let date = now.date_naive();
        let time = now.time();

        let period = match current_period(timetable, time) {
            Some(p) => p.clone(),
            None => {
                return Ok(MarkOutcome::refused(
                    "No scheduled class period right now",
                ));
            }
        };

        let tx = pool.conn.transaction()?;

        // an existing checked-in record for the key
        let existing = match get_record(&tx, student, &date, period.period)? {
            Some(r) if r.check_in_time.is_some() => r,
            _ => {
                return Ok(MarkOutcome::refused(format!(
                    "Not checked in for '{}' on {}",
                    period.label, date
                )));
            }
        };

        // no prior check-out
        if existing.check_out_time.is_some() {
            return Ok(MarkOutcome::refused(format!(
                "Already checked out for '{}' at {}",
                period.label,
                existing.check_out_str()
            )));
        }

        // window must still be open
        let window = attendance_window(&period, time);
        if !window.can_check_out {
            return Ok(MarkOutcome::refused(format!(
                "Check-out for '{}' is only allowed between {} and {}",
                period.label, period.start, period.end
            )));
        }

        // in-place mutation of the same record, no new key
        update_check_out(&tx, existing.id, time, &now.to_rfc3339())?;

        let updated = get_record(&tx, student, &date, period.period)?
            .ok_or_else(|| AppError::Other("record vanished after update".to_string()))?;

        tx.commit()?;

        Ok(MarkOutcome::CheckedOut(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ports::CliLocationProvider;
    use crate::db::geofence::insert_area;
    use crate::db::initialize::init_db;
    use chrono::TimeZone;
    use rusqlite::Connection;

    const CAMPUS_LAT: f64 = 45.4642;
    const CAMPUS_LON: f64 = 9.1900;

    fn setup() -> (DbPool, Timetable, Config) {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        init_db(&conn).expect("init schema");

        let mut pool = DbPool { conn };
        insert_area(&mut pool.conn, "Main Campus", CAMPUS_LAT, CAMPUS_LON, 150.0, true)
            .expect("insert area");

        let cfg = Config::default();
        let tt = cfg.timetable().unwrap();

        StoredCredentialProvider::new(&pool.conn)
            .register(&cfg.student_id, "test device")
            .expect("enroll");

        (pool, tt, cfg)
    }

    fn at(s: &str) -> DateTime<Local> {
        let naive = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        Local.from_local_datetime(&naive).single().unwrap()
    }

    fn on_campus(now: DateTime<Local>) -> CliLocationProvider {
        CliLocationProvider::new(Some(CAMPUS_LAT), Some(CAMPUS_LON), Some(10.0), now)
    }

    #[test]
    fn check_in_on_time_is_present() {
        let (mut pool, tt, cfg) = setup();
        let now = at("2025-03-10 08:46");

        let out =
            MarkingLogic::check_in(&mut pool, &tt, &cfg, now, &mut on_campus(now)).unwrap();

        match out {
            MarkOutcome::CheckedIn(rec) => {
                assert_eq!(rec.status, AttendanceStatus::Present);
                assert_eq!(rec.period_number, Some(2));
                assert!(rec.location_verified);
                assert_eq!(rec.distance_m, Some(0.0));
            }
            other => panic!("expected check-in, got {:?}", other),
        }
    }

    #[test]
    fn check_in_after_grace_is_late() {
        let (mut pool, tt, cfg) = setup();
        let now = at("2025-03-10 08:51");

        let out =
            MarkingLogic::check_in(&mut pool, &tt, &cfg, now, &mut on_campus(now)).unwrap();

        match out {
            MarkOutcome::CheckedIn(rec) => assert_eq!(rec.status, AttendanceStatus::Late),
            other => panic!("expected check-in, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_check_in_is_refused_and_record_unchanged() {
        let (mut pool, tt, cfg) = setup();

        let first = at("2025-03-10 08:46");
        let out =
            MarkingLogic::check_in(&mut pool, &tt, &cfg, first, &mut on_campus(first)).unwrap();
        assert!(!out.is_refused());

        let second = at("2025-03-10 08:50");
        let out =
            MarkingLogic::check_in(&mut pool, &tt, &cfg, second, &mut on_campus(second)).unwrap();
        assert!(out.is_refused());

        // stored check-in time is still the first one
        let rec = get_record(
            &pool.conn,
            &cfg.student_id,
            &first.date_naive(),
            Some(2),
        )
        .unwrap()
        .unwrap();
        assert_eq!(rec.check_in_str(), "08:46");
    }

    #[test]
    fn check_in_outside_window_is_refused() {
        let (mut pool, tt, cfg) = setup();
        let now = at("2025-03-10 08:56"); // window for period 2 closed at 08:55

        let out =
            MarkingLogic::check_in(&mut pool, &tt, &cfg, now, &mut on_campus(now)).unwrap();
        assert!(out.is_refused());
    }

    #[test]
    fn check_in_during_break_is_refused() {
        let (mut pool, tt, cfg) = setup();
        let now = at("2025-03-10 09:35"); // morning break

        let out =
            MarkingLogic::check_in(&mut pool, &tt, &cfg, now, &mut on_campus(now)).unwrap();
        assert!(out.is_refused());
    }

    #[test]
    fn check_in_without_accuracy_is_refused() {
        let (mut pool, tt, cfg) = setup();
        let now = at("2025-03-10 08:46");
        let mut provider = CliLocationProvider::new(Some(CAMPUS_LAT), Some(CAMPUS_LON), None, now);

        let out = MarkingLogic::check_in(&mut pool, &tt, &cfg, now, &mut provider).unwrap();
        assert!(out.is_refused());
    }

    #[test]
    fn check_in_outside_geofence_is_refused() {
        let (mut pool, tt, cfg) = setup();
        let now = at("2025-03-10 08:46");
        // ~1.1 km north of campus
        let mut provider =
            CliLocationProvider::new(Some(CAMPUS_LAT + 0.01), Some(CAMPUS_LON), Some(10.0), now);

        let out = MarkingLogic::check_in(&mut pool, &tt, &cfg, now, &mut provider).unwrap();
        match out {
            MarkOutcome::Refused { reason } => assert!(reason.contains("Outside")),
            other => panic!("expected refusal, got {:?}", other),
        }
    }

    #[test]
    fn teleportation_between_periods_is_refused() {
        let (mut pool, tt, cfg) = setup();

        let first = at("2025-03-10 08:46");
        let out =
            MarkingLogic::check_in(&mut pool, &tt, &cfg, first, &mut on_campus(first)).unwrap();
        assert!(!out.is_refused());

        // one hour later, ~477 km away: implied speed ≈ 130 m/s
        let second = at("2025-03-10 09:46");
        let mut provider =
            CliLocationProvider::new(Some(41.8902), Some(12.4922), Some(10.0), second);

        let out = MarkingLogic::check_in(&mut pool, &tt, &cfg, second, &mut provider).unwrap();
        match out {
            MarkOutcome::Refused { reason } => assert!(reason.contains("implausible")),
            other => panic!("expected refusal, got {:?}", other),
        }
    }

    #[test]
    fn check_out_mutates_the_same_record() {
        let (mut pool, tt, cfg) = setup();

        let check_in = at("2025-03-10 08:46");
        MarkingLogic::check_in(&mut pool, &tt, &cfg, check_in, &mut on_campus(check_in)).unwrap();

        let check_out = at("2025-03-10 09:25");
        let out = MarkingLogic::check_out(&mut pool, &tt, &cfg, check_out).unwrap();

        match out {
            MarkOutcome::CheckedOut(rec) => {
                assert_eq!(rec.check_in_str(), "08:46");
                assert_eq!(rec.check_out_str(), "09:25");
                assert_eq!(rec.status, AttendanceStatus::Present);
            }
            other => panic!("expected check-out, got {:?}", other),
        }
    }

    #[test]
    fn check_out_without_check_in_is_refused() {
        let (mut pool, tt, cfg) = setup();
        let now = at("2025-03-10 09:00");

        let out = MarkingLogic::check_out(&mut pool, &tt, &cfg, now).unwrap();
        assert!(out.is_refused());
    }

    #[test]
    fn double_check_out_is_refused() {
        let (mut pool, tt, cfg) = setup();

        let check_in = at("2025-03-10 08:46");
        MarkingLogic::check_in(&mut pool, &tt, &cfg, check_in, &mut on_campus(check_in)).unwrap();

        let first = at("2025-03-10 09:00");
        assert!(!MarkingLogic::check_out(&mut pool, &tt, &cfg, first)
            .unwrap()
            .is_refused());

        let second = at("2025-03-10 09:10");
        assert!(MarkingLogic::check_out(&mut pool, &tt, &cfg, second)
            .unwrap()
            .is_refused());
    }

    #[test]
    fn check_in_without_enrollment_is_refused() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        let mut pool = DbPool { conn };
        insert_area(&mut pool.conn, "Main Campus", CAMPUS_LAT, CAMPUS_LON, 150.0, true).unwrap();

        let cfg = Config::default();
        let tt = cfg.timetable().unwrap();
        let now = at("2025-03-10 08:46");

        let out =
            MarkingLogic::check_in(&mut pool, &tt, &cfg, now, &mut on_campus(now)).unwrap();
        match out {
            MarkOutcome::Refused { reason } => assert!(reason.contains("credential")),
            other => panic!("expected refusal, got {:?}", other),
        }
    }
}
