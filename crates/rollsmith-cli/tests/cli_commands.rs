//! Integration tests for the rollsmith CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory with a small set of test tables.
fn table_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Encounters.tab"),
        "# integration fixture\n\
         /OutputHeader Encounter: \n\
         :Start\n\
         1-2,an orc with a [Weapons.Start]\n\
         3-4,{Cap~skeletal} warriors\n\
         ;Colors\n\
         3,red\n\
         1,black\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("Gear")).unwrap();
    fs::write(
        dir.path().join("Gear/Weapons.tab"),
        ";Start\n2,sword\n1,axe\n",
    )
    .unwrap();
    dir
}

fn rollsmith() -> Command {
    Command::cargo_bin("rollsmith").unwrap()
}

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

#[test]
fn new_generates_from_table() {
    let dir = table_root();
    rollsmith()
        .args(["new", "Encounters", "-s", "42"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Encounter: "));
}

#[test]
fn new_repeats_calls() {
    let dir = table_root();
    let output = rollsmith()
        .args(["new", "Encounters:3", "-s", "7"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn new_unknown_table_fails() {
    let dir = table_root();
    rollsmith()
        .args(["new", "Ghost"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no table named"));
}

#[test]
fn new_empty_root_fails() {
    let dir = TempDir::new().unwrap();
    rollsmith()
        .args(["new", "Anything"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no .tab files"));
}

#[test]
fn new_honors_root_env_var() {
    let dir = table_root();
    rollsmith()
        .args(["new", "Encounters", "-s", "1"])
        .env("ROLLSMITH_ROOT", dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Encounter: "));
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_reports_no_errors() {
    let dir = table_root();
    rollsmith()
        .args(["parse", "Encounters"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no errors"));
}

#[test]
fn parse_exports_json() {
    let dir = table_root();
    rollsmith()
        .args(["parse", "Gear/Weapons", "-x"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"groups\"").and(predicate::str::contains("sword")));
}

#[test]
fn parse_fails_on_broken_table() {
    let dir = table_root();
    fs::write(dir.path().join("Bad.tab"), ":Start\nbroken line\n").unwrap();
    rollsmith()
        .args(["parse", "Bad"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn parse_warns_on_unknown_directive() {
    let dir = table_root();
    fs::write(
        dir.path().join("Styled.tab"),
        "/Stylesheet fancy.css\n:Start\n1,x\n",
    )
    .unwrap();
    rollsmith()
        .args(["parse", "Styled"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown directive"));
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_shows_tables_by_category() {
    let dir = table_root();
    rollsmith()
        .args(["list"])
        .arg("-r")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Gear")
                .and(predicate::str::contains("Weapons"))
                .and(predicate::str::contains("Encounters")),
        );
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_prints_a_number() {
    rollsmith()
        .args(["roll", "3d6", "-s", "11"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\n$").unwrap());
}

#[test]
fn roll_repeats_with_prefix() {
    rollsmith()
        .args(["roll", "4-1d4", "-s", "11"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^(\d+ ){3}\d+\n$").unwrap());
}

#[test]
fn roll_passes_titles_through() {
    rollsmith()
        .args(["roll", "init", "1d8", "-s", "3"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^init\n\d+\n$").unwrap());
}
