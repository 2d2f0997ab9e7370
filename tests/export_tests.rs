mod common;

use common::TestHome;
use predicates::prelude::*;
use std::fs;

fn seed(home: &TestHome) {
    home.init();
    home.cmd()
        .args(["capture", "-s", "3", "--lat", "25.03", "--lng", "121.56"])
        .assert()
        .success();
    home.cmd().args(["capture", "-s", "1"]).assert().success();
}

#[test]
fn csv_has_bom_header_and_rows_in_id_order() {
    let home = TestHome::new();
    seed(&home);
    let out = home.path().join("out.csv");

    home.cmd()
        .args(["export", "--format", "csv", "--file"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("CSV export completed"));

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with('\u{FEFF}'));
    let lines: Vec<&str> = text.trim_start_matches('\u{FEFF}').lines().collect();
    assert_eq!(lines[0], "ID,Time,Sentiment,Lat,Lng,VideoPath");
    assert!(lines[1].starts_with("1,"));
    assert!(lines[1].ends_with(",3,25.03,121.56,"));
    assert!(lines[2].starts_with("2,"));
    assert!(lines[2].ends_with(",1,,,"));
}

#[test]
fn exporting_twice_gives_identical_bytes() {
    let home = TestHome::new();
    seed(&home);
    let a = home.path().join("a.csv");
    let b = home.path().join("b.csv");

    for path in [&a, &b] {
        home.cmd()
            .args(["export", "--file"])
            .arg(path)
            .assert()
            .success();
    }

    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn json_export_lists_every_record() {
    let home = TestHome::new();
    seed(&home);
    let out = home.path().join("out.json");

    home.cmd()
        .args(["export", "--format", "json", "--file"])
        .arg(&out)
        .assert()
        .success();

    let v: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["latitude"], 25.03);
    assert!(arr[1]["latitude"].is_null());
}

#[test]
fn empty_store_writes_nothing() {
    let home = TestHome::new();
    home.init();
    let out = home.path().join("empty.csv");

    home.cmd()
        .args(["export", "--file"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to export"));

    assert!(!out.exists());
}

#[test]
fn relative_path_is_rejected() {
    let home = TestHome::new();
    seed(&home);

    home.cmd()
        .args(["export", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be absolute"));
}

#[test]
fn force_overwrites_existing_file() {
    let home = TestHome::new();
    seed(&home);
    let out = home.path().join("out.csv");
    fs::write(&out, "old").unwrap();

    home.cmd()
        .args(["export", "--force", "--file"])
        .arg(&out)
        .assert()
        .success();

    assert!(fs::read_to_string(&out).unwrap().contains("ID,Time"));
}

#[test]
fn declined_overwrite_keeps_existing_file() {
    let home = TestHome::new();
    seed(&home);
    let out = home.path().join("out.csv");
    fs::write(&out, "old").unwrap();

    home.cmd()
        .args(["export", "--file"])
        .arg(&out)
        .write_stdin("n\n")
        .assert()
        .failure();

    assert_eq!(fs::read_to_string(&out).unwrap(), "old");
}
