//! Integration tests for the ask and ocr commands
//!
//! No service credentials are set, so the gateway simulates every call.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
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
fn test_ask_compliance_is_simulated() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home)
        .args(["ask", "Check", "compliance", "of", "the", "column", "schedule"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IS-13920"))
        .stderr(predicate::str::contains("simulated"));
}

#[test]
fn test_ask_json_reports_source() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home)
        .args(["--format", "json", "ask", "Estimate", "capex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\": \"simulated\""))
        .stdout(predicate::str::contains("48500000"));
}

#[test]
fn test_ask_unmatched_prompt_returns_empty_object() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home)
        .args(["ask", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{}"));
}

#[test]
fn test_ask_with_image_uses_vision() {
    let home = TempDir::new().unwrap();
    let image = home.path().join("site.png");
    fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

    sitewise_cmd(&home)
        .args(["ask", "What is in this photo?", "--image"])
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("detectedElements"));
}

#[test]
fn test_ask_empty_prompt_is_invalid_input() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home).args(["ask", "  "]).assert().code(3);
}

#[test]
fn test_ocr_file() {
    let home = TempDir::new().unwrap();
    let drawing = home.path().join("s-101.pdf");
    fs::write(&drawing, b"%PDF-1.7").unwrap();

    sitewise_cmd(&home)
        .arg("ocr")
        .arg(&drawing)
        .assert()
        .success()
        .stdout(predicate::str::contains("S-101 General Arrangement"))
        .stdout(predicate::str::contains("(simulated extraction)"));
}

#[test]
fn test_ocr_url_is_rejected() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home)
        .args(["ocr", "https://example.com/drawing.pdf"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unsupported input"));
}

#[test]
fn test_ocr_missing_file_fails() {
    let home = TempDir::new().unwrap();
    sitewise_cmd(&home)
        .arg("ocr")
        .arg(home.path().join("missing.pdf"))
        .assert()
        .code(1);
}
