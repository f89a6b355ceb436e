//! `list` and `stats` over CLI-produced records. The possible-slot
//! denominator is 7 active periods × working days in the range.

use predicates::str::contains;

mod common;
use common::{checkin_on_campus, init_with_campus, rc, setup_test_db};

#[test]
fn test_list_shows_records_in_range() {
    let db = setup_test_db("list_range");
    init_with_campus(&db);

    checkin_on_campus(&db, "2025-03-10 08:46").success();
    checkin_on_campus(&db, "2025-03-11 08:46").success();

    rc().args(["--db", &db, "list", "--range", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("2025-03-10"))
        .stdout(contains("1 record(s)"));

    rc().args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(contains("2 record(s)"));
}

#[test]
fn test_list_rejects_malformed_range() {
    let db = setup_test_db("list_bad_range");
    init_with_campus(&db);

    rc().args(["--db", &db, "list", "--range", "20-25"])
        .assert()
        .failure()
        .stderr(contains("invalid --range"));
}

#[test]
fn test_stats_single_day_rate() {
    let db = setup_test_db("stats_day");
    init_with_campus(&db);

    // two of the seven active periods attended on one Monday
    checkin_on_campus(&db, "2025-03-10 08:46").success();
    checkin_on_campus(&db, "2025-03-10 09:46").success();

    rc().args(["--db", &db, "stats", "--range", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("Present:"))
        .stdout(contains("28.6%"));
}

#[test]
fn test_stats_late_is_counted_separately() {
    let db = setup_test_db("stats_late");
    init_with_campus(&db);

    checkin_on_campus(&db, "2025-03-10 08:46").success();
    checkin_on_campus(&db, "2025-03-10 09:52").success(); // Period 3, past grace

    let out = rc()
        .args(["--db", &db, "stats", "--range", "2025-03-10"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&out);

    // one present, one late, both count toward the rate
    assert!(text.contains("28.6%"), "stats output:\n{text}");
}

#[test]
fn test_streak_spans_a_weekend() {
    let db = setup_test_db("stats_streak");
    init_with_campus(&db);

    // Friday and the following Monday, both attended
    checkin_on_campus(&db, "2025-03-07 08:46").success();
    checkin_on_campus(&db, "2025-03-10 08:46").success();

    rc().args(["--db", &db, "stats"])
        .assert()
        .success()
        .stdout(contains("2 day(s)"));
}

#[test]
fn test_stats_monthly_rollup_table() {
    let db = setup_test_db("stats_monthly");
    init_with_campus(&db);

    checkin_on_campus(&db, "2025-03-10 08:46").success();
    checkin_on_campus(&db, "2025-04-01 08:46").success();

    rc().args(["--db", &db, "stats"])
        .assert()
        .success()
        .stdout(contains("2025-03"))
        .stdout(contains("2025-04"));
}
