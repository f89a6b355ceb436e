//! Smoke tests for the surrounding surfaces: init, status, config,
//! db maintenance, the internal log, and backups.

use predicates::str::contains;
use std::fs;

mod common;
use common::{checkin_on_campus, init_with_campus, rc, setup_test_db, temp_out};

#[test]
fn test_init_creates_schema() {
    let db = setup_test_db("init");

    rc().args(["--db", &db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"))
        .stdout(contains("initialization completed"));

    // idempotent: a second init must not fail
    rc().args(["--db", &db, "--test", "init"]).assert().success();
}

#[test]
fn test_status_during_a_period() {
    let db = setup_test_db("status_period");
    init_with_campus(&db);

    rc().args(["--db", &db, "--at", "2025-03-10 08:46", "status"])
        .assert()
        .success()
        .stdout(contains("Period 2"))
        .stdout(contains("Check-in open"))
        .stdout(contains("Main Campus"));
}

#[test]
fn test_status_after_hours() {
    let db = setup_test_db("status_evening");
    init_with_campus(&db);

    rc().args(["--db", &db, "--at", "2025-03-10 18:00", "status"])
        .assert()
        .success()
        .stdout(contains("none"));
}

#[test]
fn test_status_shows_todays_marks() {
    let db = setup_test_db("status_marks");
    init_with_campus(&db);

    checkin_on_campus(&db, "2025-03-10 08:46").success();

    rc().args(["--db", &db, "--at", "2025-03-10 09:00", "status"])
        .assert()
        .success()
        .stdout(contains("Marks today"))
        .stdout(contains("08:46"));
}

#[test]
fn test_config_check_passes_on_defaults() {
    let db = setup_test_db("config_check");
    rc().args(["--db", &db, "--test", "init"]).assert().success();

    rc().args(["--db", &db, "config", "--check"])
        .assert()
        .success()
        .stdout(contains("looks good"));
}

#[test]
fn test_db_check_reports_ok() {
    let db = setup_test_db("db_check");
    rc().args(["--db", &db, "--test", "init"]).assert().success();

    rc().args(["--db", &db, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("integrity: ok"));
}

#[test]
fn test_db_info_counts_rows() {
    let db = setup_test_db("db_info");
    init_with_campus(&db);
    checkin_on_campus(&db, "2025-03-10 08:46").success();

    rc().args(["--db", &db, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Attendance records"))
        .stdout(contains("Geofence areas"));
}

#[test]
fn test_log_records_operations() {
    let db = setup_test_db("log_ops");
    init_with_campus(&db);
    checkin_on_campus(&db, "2025-03-10 08:46").success();

    rc().args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("location"))
        .stdout(contains("checkin"));
}

#[test]
fn test_backup_copies_the_database() {
    let db = setup_test_db("backup");
    let out = temp_out("backup", "sqlite");
    init_with_campus(&db);

    rc().args(["--db", &db, "backup", "--file", &out])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(fs::metadata(&out).is_ok());

    // refuses to clobber without --force
    rc().args(["--db", &db, "backup", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("already exists"));

    rc().args(["--db", &db, "backup", "--file", &out, "--force"])
        .assert()
        .success();
}

#[test]
fn test_backup_compress_produces_gz() {
    let db = setup_test_db("backup_gz");
    let out = temp_out("backup_gz", "sqlite");
    let gz = format!("{}.gz", out);
    fs::remove_file(&gz).ok();
    init_with_campus(&db);

    rc().args(["--db", &db, "backup", "--file", &out, "--compress"])
        .assert()
        .success()
        .stdout(contains("Compressed"));

    assert!(fs::metadata(&gz).is_ok());
    // the uncompressed copy is removed after compression
    assert!(fs::metadata(&out).is_err());
}

#[test]
fn test_credential_check_reports_enrollment() {
    let db = setup_test_db("cred_check");
    rc().args(["--db", &db, "--test", "init"]).assert().success();

    rc().args(["--db", &db, "credential", "check"])
        .assert()
        .success()
        .stdout(contains("No credential enrolled"));

    rc().args(["--db", &db, "credential", "enroll", "--name", "phone"])
        .assert()
        .success()
        .stdout(contains("Enrolled 'phone'"));

    rc().args(["--db", &db, "credential", "check"])
        .assert()
        .success()
        .stdout(contains("Credential enrolled"));
}
