//! Export flows: CSV column contract, JSON shape, range filtering,
//! overwrite protection.

use predicates::str::contains;
use std::fs;

mod common;
use common::{checkin_on_campus, init_with_campus, rc, setup_test_db, temp_out};

#[test]
fn test_export_csv_columns_and_values() {
    let db = setup_test_db("export_csv");
    let out = temp_out("export_csv", "csv");
    init_with_campus(&db);

    checkin_on_campus(&db, "2025-03-10 08:46").success();
    rc().args(["--db", &db, "--at", "2025-03-10 09:25", "checkout"])
        .assert()
        .success();

    rc().args(["--db", &db, "export", "--format", "csv", "--file", &out])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read export");
    let mut lines = content.lines();

    assert_eq!(
        lines.next().unwrap(),
        "date,period,period_label,check_in,check_out,status,location_verified,distance_m,latitude,longitude,accuracy_m"
    );

    let row = lines.next().expect("one data row");
    let fields: Vec<&str> = row.split(',').collect();
    assert_eq!(fields[0], "2025-03-10");
    assert_eq!(fields[1], "2");
    assert_eq!(fields[3], "08:46");
    assert_eq!(fields[4], "09:25");
    assert_eq!(fields[5], "present");
    assert_eq!(fields[6], "true");

    // coordinates survive the round-trip within float tolerance
    let lat: f64 = fields[8].parse().expect("latitude");
    let lon: f64 = fields[9].parse().expect("longitude");
    assert!((lat - 45.4642).abs() < 1e-6);
    assert!((lon - 9.1900).abs() < 1e-6);
}

#[test]
fn test_export_json_shape() {
    let db = setup_test_db("export_json");
    let out = temp_out("export_json", "json");
    init_with_campus(&db);

    checkin_on_campus(&db, "2025-03-10 08:46").success();

    rc().args(["--db", &db, "export", "--format", "json", "--file", &out])
        .assert()
        .success()
        .stdout(contains("JSON export completed"));

    let content = fs::read_to_string(&out).expect("read export");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");

    let rows = parsed.as_array().expect("array of rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["date"], "2025-03-10");
    assert_eq!(rows[0]["status"], "present");
    assert_eq!(rows[0]["location_verified"], true);
}

#[test]
fn test_export_respects_range_filter() {
    let db = setup_test_db("export_range");
    let out = temp_out("export_range", "csv");
    init_with_campus(&db);

    checkin_on_campus(&db, "2025-03-10 08:46").success();
    checkin_on_campus(&db, "2025-03-11 08:46").success();

    rc().args([
        "--db",
        &db,
        "export",
        "--format",
        "csv",
        "--file",
        &out,
        "--range",
        "2025-03-10",
    ])
    .assert()
    .success();

    let content = fs::read_to_string(&out).expect("read export");
    assert!(content.contains("2025-03-10"));
    assert!(!content.contains("2025-03-11"));
}

#[test]
fn test_export_requires_absolute_path() {
    let db = setup_test_db("export_relative");
    init_with_campus(&db);

    rc().args([
        "--db",
        &db,
        "export",
        "--format",
        "csv",
        "--file",
        "relative.csv",
    ])
    .assert()
    .failure()
    .stderr(contains("absolute"));
}

#[test]
fn test_export_empty_range_warns() {
    let db = setup_test_db("export_empty");
    let out = temp_out("export_empty", "csv");
    init_with_campus(&db);

    rc().args([
        "--db",
        &db,
        "export",
        "--format",
        "csv",
        "--file",
        &out,
        "--range",
        "2024",
    ])
    .assert()
    .success()
    .stdout(contains("No attendance records"));
}

#[test]
fn test_export_refuses_overwrite_without_force() {
    let db = setup_test_db("export_overwrite");
    let out = temp_out("export_overwrite", "csv");
    init_with_campus(&db);

    checkin_on_campus(&db, "2025-03-10 08:46").success();

    rc().args(["--db", &db, "export", "--format", "csv", "--file", &out])
        .assert()
        .success();

    // declining the prompt aborts the export
    rc().args(["--db", &db, "export", "--format", "csv", "--file", &out])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("cancelled"));

    // --force skips the prompt
    rc().args([
        "--db", &db, "export", "--format", "csv", "--file", &out, "--force",
    ])
    .assert()
    .success();
}
