//! Integration tests for the `mtr` CLI commands.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Create a temp directory with a small table library.
fn test_library() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("Items")).unwrap();
    fs::create_dir_all(dir.path().join("Encounters")).unwrap();
    fs::write(
        dir.path().join("Weather.md"),
        "# Weather\n\n* Pouring rain\n* Pouring rain\n* Pouring rain\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Items/Weapons.md"),
        "1. Rusty [[Items/Material]] sword\n2. Rusty [[Items/Material]] sword\n",
    )
    .unwrap();
    fs::write(dir.path().join("Items/Material.md"), "- iron\n").unwrap();
    fs::write(
        dir.path().join("Encounters/Road.md"),
        r#"# Road encounters

| 2d6 | Encounter |
|-----|-----------|
| 2-6 | [A patrol](Patrol) |
| 7 | Nothing |
| 8–12 | [A patrol](Patrol) |
"#,
    )
    .unwrap();
    fs::write(dir.path().join("Encounters/Patrol.md"), "* A patrol of guards\n").unwrap();
    fs::write(dir.path().join("Notes.md"), "Just some notes.\nNothing to roll.\n").unwrap();
    fs::write(dir.path().join("Loop.md"), "* Again [[Loop]]\n").unwrap();
    dir
}

fn mtr() -> Command {
    Command::cargo_bin("mtr").unwrap()
}

fn mtr_split() -> Command {
    Command::cargo_bin("mtr-split").unwrap()
}

// ---------------------------------------------------------------------------
// usage
// ---------------------------------------------------------------------------

#[test]
fn help_prints_usage() {
    mtr().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage").and(predicate::str::contains("TABLE")));
}

#[test]
fn legacy_help_flag() {
    mtr().arg("-help").assert().success().stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_table_name_fails() {
    mtr().assert()
        .failure()
        .stderr(predicate::str::contains("please provide a table name"));
}

#[test]
fn extra_arguments_fail() {
    let dir = test_library();
    mtr().args(["Weather", "Weapons"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[test]
fn list_shows_tables_and_directories() {
    let dir = test_library();
    mtr().arg("-ls")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Weather.md")
                .and(predicate::str::contains("Items"))
                .and(predicate::str::contains("-Weapons.md")),
        );
}

#[test]
fn list_filters_by_query() {
    let dir = test_library();
    mtr().args(["--list", "weap"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Weapons.md")
                .and(predicate::str::contains("Weather.md").not()),
        );
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

#[test]
fn roll_list_table() {
    let dir = test_library();
    mtr().arg("weather")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("Pouring rain\n");
}

#[test]
fn roll_resolves_nested_references() {
    let dir = test_library();
    mtr().args(["Items/Weapons", "-d", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout("Rusty iron sword\n");
}

#[test]
fn roll_range_table_with_dice_header() {
    let dir = test_library();
    for seed in ["1", "2", "3", "4", "5"] {
        mtr().args(["road", "--seed", seed])
            .current_dir(dir.path())
            .assert()
            .success()
            .stdout(
                predicate::str::contains("A patrol of guards")
                    .or(predicate::str::contains("Nothing")),
            );
    }
}

#[test]
fn roll_with_seed_is_reproducible() {
    let dir = test_library();
    let first = mtr()
        .args(["road", "--seed", "42"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    let second = mtr()
        .args(["road", "--seed", "42"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn roll_as_json() {
    let dir = test_library();
    mtr().args(["weather", "--json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"table\": \"Weather\"")
                .and(predicate::str::contains("\"text\": \"Pouring rain\"")),
        );
}

#[test]
fn show_prints_parsed_table() {
    let dir = test_library();
    mtr().args(["road", "--show"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2d6")
                .and(predicate::str::contains("2-6"))
                .and(predicate::str::contains("8-12")),
        );
}

#[test]
fn unknown_table_fails() {
    let dir = test_library();
    mtr().arg("dragons")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("table not found"));
}

#[test]
fn prose_is_not_a_table() {
    let dir = test_library();
    mtr().arg("notes")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a rollable table"));
}

#[test]
fn cyclic_reference_fails() {
    let dir = test_library();
    mtr().args(["loop", "--max-depth", "3"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cyclic reference"));
}

// ---------------------------------------------------------------------------
// split
// ---------------------------------------------------------------------------

#[test]
fn split_writes_table_files() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Book.md"),
        "# Dread\n## Omens\n* A crow\n* A bell\n## Rooms\n| 1-6 | Cellar |\n",
    )
    .unwrap();

    mtr_split()
        .args(["Book.md", "--out", "tables"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 tables"));

    let omens = dir.path().join("tables/Dread/Dread - Omens.md");
    assert_eq!(fs::read_to_string(omens).unwrap(), "* A crow\n* A bell\n");
    assert!(dir.path().join("tables/Dread/Dread - Rooms.md").exists());

    mtr().args(["Dread - Omens", "-d", "tables"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("A crow").or(predicate::str::contains("A bell")));
}

#[test]
fn split_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    mtr_split()
        .arg("Missing.md")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error reading"));
}
