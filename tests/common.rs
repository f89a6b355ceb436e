#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Campus coordinates shared by the whole suite (Milan, Duomo).
pub const CAMPUS_LAT: &str = "45.4642";
pub const CAMPUS_LON: &str = "9.1900";

pub fn rc() -> Command {
    cargo_bin_cmd!("rollcall")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rollcall.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB, register the campus geofence (150 m radius, active)
/// and enroll a credential so `checkin` preconditions pass.
pub fn init_with_campus(db_path: &str) {
    rc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rc().args([
        "--db",
        db_path,
        "location",
        "add",
        "Main Campus",
        "--lat",
        CAMPUS_LAT,
        "--lon",
        CAMPUS_LON,
        "--radius",
        "150",
    ])
    .assert()
    .success();

    rc().args([
        "--db",
        db_path,
        "credential",
        "enroll",
        "--name",
        "test device",
    ])
    .assert()
    .success();
}

/// On-campus check-in at the given frozen timestamp ("YYYY-MM-DD HH:MM").
pub fn checkin_on_campus(db_path: &str, at: &str) -> assert_cmd::assert::Assert {
    rc().args([
        "--db",
        db_path,
        "--at",
        at,
        "checkin",
        "--lat",
        CAMPUS_LAT,
        "--lon",
        CAMPUS_LON,
        "--accuracy",
        "10",
    ])
    .assert()
}
