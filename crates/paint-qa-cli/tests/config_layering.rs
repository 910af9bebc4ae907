//! Integration tests for configuration layering.
//!
//! Tests the priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)] // Test code uses unwrap for brevity
#![allow(deprecated)] // cargo_bin deprecation warning

mod common;

use std::fs;

use assert_cmd::Command;
use paint_qa_test_support::SyntheticImageBuilder;
use predicates::prelude::*;
use serde_json::Value;

use common::{create_test_images, single_panel};

#[test]
fn test_project_config_applies_format() {
    let (temp_dir, panel) = single_panel();
    fs::write(
        temp_dir.path().join(".paint-qa.toml"),
        r"
[output]
format = 'json'
",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.current_dir(temp_dir.path()).arg(panel);

    cmd.assert()
        .code(0)
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_cli_overrides_project_config() {
    let (temp_dir, panel) = single_panel();
    fs::write(
        temp_dir.path().join(".paint-qa.toml"),
        r"
[output]
format = 'json'
",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("--format")
        .arg("jsonl")
        .arg(panel);

    cmd.assert()
        .code(0)
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_project_config_threshold() {
    let temp_dir = create_test_images(vec![(
        "gray.png",
        SyntheticImageBuilder::uniform_gray(16, 16, 200).image,
    )]);
    fs::write(
        temp_dir.path().join(".paint-qa.toml"),
        r"
[analysis]
overexposure_threshold = 180
",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.current_dir(temp_dir.path()).arg("-q").arg("gray.png");
    let output = cmd.output().unwrap();
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["metrics"]["overexposure_ratio"], 1.0);

    // CLI wins over the project file
    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["-q", "--overexposure-threshold", "250", "gray.png"]);
    let output = cmd.output().unwrap();
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["metrics"]["overexposure_ratio"], 0.0);
}

#[test]
fn test_project_config_enables_plan() {
    let (temp_dir, panel) = single_panel();
    fs::write(
        temp_dir.path().join(".paint-qa.toml"),
        r"
[output]
plan = true
",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.current_dir(temp_dir.path()).arg("-q").arg(panel);
    let output = cmd.output().unwrap();
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["plan"].is_object());
}

#[test]
fn test_invalid_config_warns() {
    let (temp_dir, panel) = single_panel();
    fs::write(
        temp_dir.path().join(".paint-qa.toml"),
        r"
[output]
format = 'xml'
",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.current_dir(temp_dir.path()).arg("-q").arg(panel);

    // unknown format falls back to JSONL
    cmd.assert()
        .code(0)
        .stderr(predicate::str::contains("output.format"))
        .stdout(predicate::str::starts_with("{"));
}
