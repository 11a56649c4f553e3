//! Integration tests for the search and history commands

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sitewise_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sitewise").unwrap();
    for var in [
        "SITEWISE_LLM_ENDPOINT",
        "SITEWISE_LLM_KEY",
        "SITEWISE_OCR_ENDPOINT",
        "SITEWISE_OCR_KEY",
        "SITEWISE_DB",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("SITEWISE_CONFIG", home.path().join("config.yml"))
        .env("SITEWISE_STORE_DIR", home.path().join("store"))
        .env("SITEWISE_OCR_SIMULATED_LATENCY_MS", "0");
    cmd
}

#[test]
fn test_search_ranks_seismic_report_first() {
    let home = TempDir::new().unwrap();
    let output = sitewise_cmd(&home)
        .args(["search", "seismic"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let first = stdout.lines().next().unwrap();
    assert!(first.contains("Seismic Failure Report"), "{}", stdout);
    assert!(stdout.contains("why:"));
}

#[test]
fn test_search_json_has_percentages() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home)
        .args(["--format", "json", "search", "concrete", "curing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("semanticMatchPercentage"))
        .stdout(predicate::str::contains("vectorScore"));
}

#[test]
fn test_search_limit() {
    let home = TempDir::new().unwrap();
    let output = sitewise_cmd(&home)
        .args(["--format", "json", "search", "-n", "1", "seismic"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 1);
}

#[test]
fn test_search_is_recorded_in_history() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home)
        .args(["search", "fire", "egress"])
        .assert()
        .success();
    sitewise_cmd(&home)
        .args(["search", "--no-save", "podium"])
        .assert()
        .success();

    sitewise_cmd(&home)
        .args(["history", "queries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fire egress\""))
        .stdout(predicate::str::contains("podium").not());
}

#[test]
fn test_empty_history() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home)
        .args(["history", "queries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries"));
}

#[test]
fn test_empty_query_is_invalid_input() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home).arg("search").assert().code(3);
}
