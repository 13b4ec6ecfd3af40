//! CLI integration tests against the gridtree binary

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
  "meta": {"data": [{"user": "alice"}]},
  "order": {"data": [
    {"identifier": "A", "items": [{"sku": "x"}, {"sku": "y"}]},
    {"identifier": "B", "addr": {"city": "Oslo"}}
  ]}
}"#;

fn gridtree() -> Command {
    Command::cargo_bin("gridtree").unwrap()
}

#[test]
fn test_cli_help() {
    gridtree()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("headers"));
}

#[test]
fn test_cli_version() {
    gridtree()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gridtree"));
}

#[test]
fn test_encode_help_shows_marker_style_key() {
    gridtree()
        .args(["encode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""items[]": LIGHT_GREEN"#));
}

#[test]
fn test_headers_command() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, DOCUMENT).unwrap();

    gridtree()
        .arg("headers")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("items[].sku"))
        .stdout(predicate::str::contains("addr.city"));
}

#[test]
fn test_encode_then_decode_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.json");
    let book = dir.path().join("book.xlsx");
    fs::write(&input, DOCUMENT).unwrap();

    gridtree()
        .arg("encode")
        .arg(&input)
        .arg(&book)
        .assert()
        .success()
        .stdout(predicate::str::contains("Encode Complete"));
    assert!(book.exists());

    let output = gridtree().arg("decode").arg(&book).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        document["data"],
        serde_json::json!([
            {"identifier": "A", "items": [{"sku": "x"}, {"sku": "y"}]},
            {"identifier": "B", "addr": {"city": "Oslo"}}
        ])
    );
    assert_eq!(document["request"]["user"], serde_json::json!("alice"));
}

#[test]
fn test_decode_to_yaml_file_with_document_type() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.json");
    let book = dir.path().join("book.xlsx");
    let out = dir.path().join("out.yaml");
    fs::write(&input, DOCUMENT).unwrap();

    gridtree().arg("encode").arg(&input).arg(&book).assert().success();
    gridtree()
        .arg("decode")
        .arg(&book)
        .args(["--format", "yaml", "--document-type", "bulk", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Decode Complete"));

    let yaml = fs::read_to_string(&out).unwrap();
    assert!(yaml.contains("document_type: bulk"));
    assert!(yaml.contains("city: Oslo"));
}

#[test]
fn test_decode_missing_file_fails() {
    gridtree()
        .arg("decode")
        .arg("/nonexistent/book.xlsx")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Excel"));
}

#[test]
fn test_encode_rejects_non_object_document() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, "[1, 2, 3]").unwrap();

    gridtree()
        .arg("encode")
        .arg(&input)
        .arg(dir.path().join("book.xlsx"))
        .assert()
        .failure();
}
