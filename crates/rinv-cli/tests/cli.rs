use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

/// `rinv` with its config directory pointed into `home`.
fn rinv(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rinv").unwrap();
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

#[test]
fn render_demo_as_json() {
    let home = TempDir::new().unwrap();
    let output = rinv(home.path()).args(["render", "--demo"]).output().unwrap();
    assert!(output.status.success());

    let invoice: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(invoice["Invoicer"]["Name"], "Nimble Widgets Co.");
    assert_eq!(invoice["Invoicer"]["Url"], "https://nimblewidgets.example");
    assert_eq!(invoice["Subtotal"], 826.5);
    assert_eq!(invoice["Total"], 830.25);
    assert_eq!(invoice["Items"].as_array().unwrap().len(), 3);
}

#[test]
fn render_labels_as_text() {
    let home = TempDir::new().unwrap();
    rinv(home.path())
        .args(["render", "--labels", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoicer.Name"))
        .stdout(predicate::str::contains("Items[0].Description"))
        .stdout(predicate::str::contains("(Anything in a Note column goes here)"));
}

#[test]
fn render_file_fills_totals() {
    let home = TempDir::new().unwrap();
    let row = home.path().join("row.json");
    fs::write(
        &row,
        r#"{"Number": 9, "Invoicer": {"Name": "A"}, "Client": {"Name": "B"},
            "Items": [{"Description": "Work", "Price": 10, "Quantity": 2}], "Taxes": 1}"#,
    )
    .unwrap();

    rinv(home.path())
        .args(["render", "--format", "text"])
        .arg(&row)
        .assert()
        .success()
        .stdout(predicate::str::contains("Subtotal:  $20.00"))
        .stdout(predicate::str::contains("Total:     $21.00"));
}

#[test]
fn render_null_row_fails() {
    let home = TempDir::new().unwrap();
    rinv(home.path())
        .arg("render")
        .write_stdin("null")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no row selected"));
}

#[test]
fn render_missing_file_fails() {
    let home = TempDir::new().unwrap();
    rinv(home.path())
        .args(["render", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let home = TempDir::new().unwrap();
    let rows = home.path().join("rows");
    let out = home.path().join("out");
    fs::create_dir_all(&rows).unwrap();
    fs::write(rows.join("good.json"), r#"{"Number": 1, "Items": []}"#).unwrap();
    fs::write(rows.join("bad.json"), r#"{"Number": 2, "References": "oops"}"#).unwrap();

    rinv(home.path())
        .arg("batch")
        .arg(format!("{}/*.json", rows.display()))
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success();

    assert!(out.join("good.json").exists());
    assert!(!out.join("bad.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status"));
    assert!(summary.contains("could not understand References"));
}

#[test]
fn batch_stops_on_first_error() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("bad.json"), "null").unwrap();

    rinv(home.path())
        .arg("batch")
        .arg(format!("{}/*.json", home.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no row selected"));
}

#[test]
fn watch_reports_state_per_event() {
    let home = TempDir::new().unwrap();
    let table = home.path().join("table.json");
    fs::write(&table, r#"{"id": [1, 2]}"#).unwrap();

    let events = concat!(
        r#"{"message": {"tableId": "Invoices"}}"#, "\n",
        r#"{"record": {"Number": 3, "Items": [{"Description": "x", "Total": 5}]}}"#, "\n",
        r#"{"record": null}"#, "\n",
    );

    let output = rinv(home.path())
        .arg("watch")
        .arg("--table")
        .arg(&table)
        .write_stdin(events)
        .output()
        .unwrap();
    assert!(output.status.success());

    let states: Vec<Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // initial + 3 events + 1 probe result
    assert_eq!(states.len(), 5);
    assert_eq!(states[0]["phase"], "waiting");
    assert_eq!(states[1]["tableConnected"], true);
    assert_eq!(states[1]["rowConnected"], true);

    let last = states.last().unwrap();
    assert_eq!(last["haveRows"], true);
    assert_eq!(last["phase"], "error");
    assert_eq!(last["status"], "no row selected");
    assert!(last["invoice"].is_null());

    assert!(states
        .iter()
        .any(|s| s["phase"] == "ready" && s["invoice"]["Total"] == 5.0));
}

#[test]
fn watch_demo_starts_ready() {
    let home = TempDir::new().unwrap();
    let output = rinv(home.path())
        .args(["watch", "--demo"])
        .write_stdin("")
        .output()
        .unwrap();
    assert!(output.status.success());

    let first: Value = serde_json::from_slice(output.stdout.split(|b| *b == b'\n').next().unwrap())
        .unwrap();
    assert_eq!(first["phase"], "ready");
    assert_eq!(first["status"], "");
}

#[test]
fn config_init_then_get() {
    let home = TempDir::new().unwrap();
    rinv(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    rinv(home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    rinv(home.path())
        .args(["config", "set", "format.currency_symbol", "€"])
        .assert()
        .success();

    rinv(home.path())
        .args(["config", "get", "format.currency_symbol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"€\""));

    rinv(home.path())
        .args(["render", "--demo", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("€830.25"));
}
