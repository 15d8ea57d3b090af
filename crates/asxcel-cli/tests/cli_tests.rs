use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary store path for CLI tests
fn create_cli_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("asxcel.sqlite");
    (temp_dir, db_path)
}

/// Helper function to create a Command with --no-color and the test store
fn asxcel_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("asxcel").expect("Failed to find asxcel binary");
    cmd.arg("--no-color").arg("--database-file").arg(db_path);
    cmd
}

/// Creates enterprise Skyways (hub Schiphol) with a route to Heathrow.
fn seed_enterprise(db_path: &Path) {
    asxcel_cmd(db_path)
        .args(["enterprise", "create", "Skyways", "--hub", "Schiphol"])
        .assert()
        .success();
    asxcel_cmd(db_path)
        .args(["--enterprise", "Skyways", "airport", "create", "Heathrow"])
        .assert()
        .success();
    asxcel_cmd(db_path)
        .args(["--enterprise", "Skyways", "route", "create", "Schiphol", "Heathrow"])
        .assert()
        .success();
}

#[test]
fn test_cli_without_command_lists_enterprises() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    asxcel_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No enterprises found."));
}

#[test]
fn test_cli_create_enterprise() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    asxcel_cmd(&db_path)
        .args(["enterprise", "create", "Skyways", "--hub", "Schiphol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active enterprise 'Skyways'"))
        .stdout(predicate::str::contains("- Main hub: Schiphol"));

    asxcel_cmd(&db_path)
        .args(["enterprise", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Skyways"));
}

#[test]
fn test_cli_create_airport_twice() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    for _ in 0..2 {
        asxcel_cmd(&db_path)
            .args(["airport", "create", "Schiphol"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Airport 'Schiphol' (ID: 1)"));
    }

    asxcel_cmd(&db_path)
        .args(["airport", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Schiphol |").count(1));
}

#[test]
fn test_cli_set_airport() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    asxcel_cmd(&db_path)
        .args(["airport", "create", "Schiphol"])
        .assert()
        .success();

    asxcel_cmd(&db_path)
        .args([
            "airport",
            "set",
            "Schiphol",
            "--iata",
            "ams",
            "--passengers",
            "9",
            "--country",
            "Netherlands",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes made:"))
        .stdout(predicate::str::contains("- IATA code: AMS"))
        .stdout(predicate::str::contains("- Country: Netherlands"))
        .stdout(predicate::str::contains("- Passengers: 9/10"));

    asxcel_cmd(&db_path)
        .args(["country", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Netherlands"));
}

#[test]
fn test_cli_rejects_out_of_range_demand() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    asxcel_cmd(&db_path)
        .args(["airport", "create", "Schiphol"])
        .assert()
        .success();

    asxcel_cmd(&db_path)
        .args(["airport", "set", "Schiphol", "--cargo", "11"])
        .assert()
        .failure();
}

#[test]
fn test_cli_route_needs_enterprise() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    asxcel_cmd(&db_path)
        .args(["airport", "create", "Schiphol"])
        .assert()
        .success();
    asxcel_cmd(&db_path)
        .args(["airport", "create", "Heathrow"])
        .assert()
        .success();

    asxcel_cmd(&db_path)
        .args(["route", "create", "Schiphol", "Heathrow"])
        .assert()
        .failure()
        .stderr(predicate::str::diff(
            "Error: No enterprise is active; pass --enterprise <NAME>\n",
        ));
}

#[test]
fn test_cli_unknown_enterprise_fails() {
    let (_temp_dir, db_path) = create_cli_test_environment();

    asxcel_cmd(&db_path)
        .args(["--enterprise", "Nobody", "route", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to activate enterprise 'Nobody'"));
}

#[test]
fn test_cli_route_workflow() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_enterprise(&db_path);

    asxcel_cmd(&db_path)
        .args([
            "-e",
            "Skyways",
            "route",
            "set",
            "Schiphol",
            "Heathrow",
            "--distance",
            "371",
            "--scheduled",
            "true",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Distance: 371"))
        .stdout(predicate::str::contains("- Scheduled: true"));

    asxcel_cmd(&db_path)
        .args(["-e", "Skyways", "route", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Origin | IATA | PAX | Cargo | Destination |"))
        .stdout(predicate::str::contains("| **Schiphol** |"))
        .stdout(predicate::str::contains("| 371 |"));

    asxcel_cmd(&db_path)
        .args(["config", "highlight-scheduled", "false"])
        .assert()
        .success();

    asxcel_cmd(&db_path)
        .args(["-e", "Skyways"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Skyways"))
        .stdout(predicate::str::contains("| Schiphol |"))
        .stdout(predicate::str::contains("**").not());

    asxcel_cmd(&db_path)
        .args(["-e", "Skyways", "route", "delete", "Schiphol", "Heathrow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted route 'Schiphol - Heathrow'"));

    asxcel_cmd(&db_path)
        .args(["-e", "Skyways", "route", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No routes found."));
}

#[test]
fn test_cli_delete_airport_in_use_is_rejected() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_enterprise(&db_path);

    asxcel_cmd(&db_path)
        .args(["airport", "delete", "Heathrow"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with(
            "Error: Failed to delete airport 'Heathrow': Operation rejected: ",
        ))
        .stderr(predicate::str::contains("used by 1 route(s)"));

    asxcel_cmd(&db_path)
        .args(["airport", "delete", "Schiphol"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("main hub"));
}

#[test]
fn test_cli_available_destinations() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_enterprise(&db_path);
    asxcel_cmd(&db_path)
        .args(["-e", "Skyways", "airport", "create", "Tegel"])
        .assert()
        .success();

    asxcel_cmd(&db_path)
        .args(["-e", "Skyways", "airport", "destinations", "Schiphol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Tegel |"))
        .stdout(predicate::str::contains("| Heathrow |").not());
}

#[test]
fn test_cli_delete_enterprise() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_enterprise(&db_path);

    asxcel_cmd(&db_path)
        .args(["-e", "Skyways", "enterprise", "delete", "Skyways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is active"));

    asxcel_cmd(&db_path)
        .args(["enterprise", "delete", "Skyways"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted enterprise 'Skyways'"));
}

#[test]
fn test_cli_json_output() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    seed_enterprise(&db_path);

    let output = asxcel_cmd(&db_path)
        .args(["--json", "-e", "Skyways", "airport", "list"])
        .output()
        .expect("Failed to run asxcel");
    assert!(output.status.success());

    let airports: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output is not JSON");
    let names = airports
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Heathrow", "Schiphol"]);
}

#[test]
fn test_cli_status_upgrades_legacy_store() {
    let (_temp_dir, db_path) = create_cli_test_environment();
    let db = asxcel_core::Database::open(&db_path).unwrap();
    db.execute_batch(
        "CREATE TABLE countries (id INTEGER PRIMARY KEY, name VARCHAR NOT NULL UNIQUE);
         INSERT INTO countries (name) VALUES ('Netherlands');",
    )
    .unwrap();
    db.close().unwrap();

    asxcel_cmd(&db_path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("- Schema version: 2"));

    asxcel_cmd(&db_path)
        .args(["country", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Netherlands"));

    let mut backup = db_path.as_os_str().to_owned();
    backup.push(".bak.1");
    assert!(PathBuf::from(backup).exists());
}
