#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn turni(data: &Path) -> Command {
    let mut cmd = Command::cargo_bin("turni-cli").unwrap();
    cmd.arg("--data").arg(data);
    cmd
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("turni.json");
    turni(&data)
        .args(["add-shift", "--name", "Mattina", "--start", "08:00", "--end", "14:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mattina (08:00-14:00, 6h)"));
    turni(&data)
        .args(["add-shift", "--name", "Pomeriggio", "--start", "14:00", "--end", "20:00"])
        .assert()
        .success();
    for name in ["Anna", "Bruno"] {
        turni(&data)
            .args(["add-staff", "--name", name, "--min", "30", "--max", "48"])
            .assert()
            .success();
    }
    (dir, data)
}

#[test]
fn plan_a_month_and_read_statistics() {
    let (_dir, data) = setup();

    turni(&data)
        .args(["plan", "--year", "2025", "--month", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2025-01-02 Thu | Anna: Mattina (08:00-14:00) | Bruno: Pomeriggio (14:00-20:00)",
        ))
        .stdout(predicate::str::contains("2025-01-01").not());

    turni(&data)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Anna | total 180h | 30 day(s) | 4 sunday(s)"))
        .stdout(predicate::str::contains("average 36.0h/week (contract: 30h min, 48h max)"))
        .stdout(predicate::str::contains("Sunday shifts: 8"));

    turni(&data)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01-05 Sun *"));
}

#[test]
fn duplicate_names_are_rejected_case_insensitively() {
    let (_dir, data) = setup();
    turni(&data)
        .args(["add-staff", "--name", "anna", "--min", "10", "--max", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn plan_without_staff_fails() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("turni.json");
    turni(&data)
        .args(["add-shift", "--name", "Mattina", "--start", "08:00", "--end", "14:00"])
        .assert()
        .success();
    turni(&data)
        .args(["plan", "--year", "2025", "--month", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("roster is empty"));
}

#[test]
fn rest_days_absences_and_ceiling_warning() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("turni.json");
    turni(&data)
        .args(["add-shift", "--name", "Lungo", "--start", "08:00", "--end", "16:00"])
        .assert()
        .success();
    turni(&data)
        .args([
            "add-staff", "--name", "Anna", "--min", "0", "--max", "6",
            "--rest-days", "sun", "--absences", "2025-01-10",
        ])
        .assert()
        .success();
    turni(&data)
        .args(["add-absence", "--name", "ANNA", "--date", "2025-01-20"])
        .assert()
        .success();
    turni(&data)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Anna | 0-6h/week | overtime: no | rest: 6 | absences: 2"));

    // 8h ne rentrent jamais dans 6h : planning vide, code 2.
    turni(&data)
        .args(["plan", "--year", "2025", "--month", "1"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("2025-01-02 Thu | -"))
        .stderr(predicate::str::contains("left empty"));
}

#[test]
fn staff_csv_export_from_list_and_plan() {
    let (dir, data) = setup();
    let listed = dir.path().join("listed.csv");
    let planned = dir.path().join("planned.csv");

    turni(&data)
        .arg("list")
        .arg("--staff-csv")
        .arg(&listed)
        .assert()
        .success();
    turni(&data)
        .args(["plan", "--year", "2025", "--month", "1", "--staff-csv"])
        .arg(&planned)
        .assert()
        .success();

    let expected = "name,min_weekly_hours,max_weekly_hours,overtime_allowed,rest_days,absences\n\
                    Anna,30,48,false,,\n\
                    Bruno,30,48,false,,\n";
    assert_eq!(std::fs::read_to_string(&listed).unwrap(), expected);
    assert_eq!(std::fs::read_to_string(&planned).unwrap(), expected);
}
