//! Pipeline integration tests using synthetic images.
//!
//! Tests the full analysis pipeline with programmatically generated test images.

#![allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::expect_used,
    clippy::missing_panics_doc,
    deprecated
)]

mod common;

use std::fs;

use assert_cmd::Command;
use paint_qa_test_support::SyntheticImageBuilder;
use predicates::prelude::*;
use serde_json::Value;

use common::create_test_images;

fn results(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn result_for<'a>(results: &'a [Value], name: &str) -> &'a Value {
    results
        .iter()
        .find(|r| r["path"].as_str().unwrap().ends_with(name))
        .unwrap_or_else(|| panic!("no result for {name}"))
}

// === Metric Tests ===

#[test]
fn test_blurred_panel_scores_lower_sharpness() {
    let temp_dir = create_test_images(vec![
        ("sharp.png", SyntheticImageBuilder::checkerboard(128, 128, 8).image),
        (
            "soft.png",
            SyntheticImageBuilder::blurred_checkerboard(128, 128, 8, 3.0).image,
        ),
    ]);

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg("-q").arg(temp_dir.path());
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let results = results(&output.stdout);
    assert_eq!(results.len(), 2);
    let sharp = result_for(&results, "sharp.png")["metrics"]["sharpness"]
        .as_f64()
        .unwrap();
    let soft = result_for(&results, "soft.png")["metrics"]["sharpness"]
        .as_f64()
        .unwrap();
    assert!(soft < sharp, "blurred {soft} should be below sharp {sharp}");
}

#[test]
fn test_gray_panel_metrics_are_zero() {
    let temp_dir = create_test_images(vec![(
        "gray.png",
        SyntheticImageBuilder::uniform_gray(100, 100, 128).image,
    )]);

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg("-q").arg(temp_dir.path().join("gray.png"));
    let output = cmd.output().unwrap();

    let results = results(&output.stdout);
    let vector: Vec<f64> = results[0]["vector"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(vector, vec![0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_white_panel_is_overexposed() {
    let temp_dir = create_test_images(vec![(
        "white.png",
        SyntheticImageBuilder::white(100, 100).image,
    )]);

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg("-q").arg(temp_dir.path().join("white.png"));
    let output = cmd.output().unwrap();

    let results = results(&output.stdout);
    assert_eq!(results[0]["metrics"]["overexposure_ratio"], 1.0);
}

#[test]
fn test_corrupt_file_is_skipped() {
    let temp_dir = create_test_images(vec![(
        "good.png",
        SyntheticImageBuilder::checkerboard(32, 32, 4).image,
    )]);
    fs::write(temp_dir.path().join("broken.jpg"), b"not a jpeg").unwrap();

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg(temp_dir.path());

    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(results(&output.stdout).len(), 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("broken.jpg"));
}

#[test]
fn test_recursive_flag() {
    let temp_dir = create_test_images(vec![(
        "top.png",
        SyntheticImageBuilder::checkerboard(32, 32, 4).image,
    )]);
    let nested = temp_dir.path().join("hood");
    fs::create_dir(&nested).unwrap();
    SyntheticImageBuilder::white(16, 16)
        .image
        .save(nested.join("nested.png"))
        .unwrap();

    let mut flat = Command::cargo_bin("paint-qa").unwrap();
    flat.arg("-q").arg(temp_dir.path());
    assert_eq!(results(&flat.output().unwrap().stdout).len(), 1);

    let mut deep = Command::cargo_bin("paint-qa").unwrap();
    deep.arg("-q").arg("-r").arg(temp_dir.path());
    assert_eq!(results(&deep.output().unwrap().stdout).len(), 2);
}

// === Planning Tests ===

#[test]
fn test_flat_panel_plan_is_low_quality() {
    let temp_dir = create_test_images(vec![(
        "flat.png",
        SyntheticImageBuilder::uniform_gray(64, 64, 128).image,
    )]);

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg("--plan").arg(temp_dir.path().join("flat.png"));
    let output = cmd.output().unwrap();

    let results = results(&output.stdout);
    let plan = &results[0]["plan"];
    assert_eq!(plan["sharpness_level"], "Heavy_Blur");
    assert_eq!(plan["ops"][0]["type"], "MARK_AS_LOW_QUALITY");
    assert_eq!(plan["quality_penalty"], 0.4);
    assert!(String::from_utf8_lossy(&output.stderr).contains("low quality"));
}

#[test]
fn test_custom_criteria_changes_level() {
    let temp_dir = create_test_images(vec![(
        "panel.png",
        SyntheticImageBuilder::blurred_checkerboard(64, 64, 8, 2.0).image,
    )]);
    let criteria = temp_dir.path().join("lenient.toml");
    fs::write(
        &criteria,
        r#"
[[levels]]
level = "Clear"
lower_bound = 0.0
upper_bound = inf
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.args(["-q", "--plan", "--criteria"])
        .arg(&criteria)
        .arg(temp_dir.path().join("panel.png"));
    let output = cmd.output().unwrap();

    let results = results(&output.stdout);
    assert_eq!(results[0]["plan"]["sharpness_level"], "Clear");
}

// === Enhance Tests ===

#[test]
fn test_enhance_writes_same_size_image() {
    let temp_dir = create_test_images(vec![(
        "soft.png",
        SyntheticImageBuilder::blurred_checkerboard(48, 40, 8, 1.5).image,
    )]);
    let out = temp_dir.path().join("out.png");

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg("enhance")
        .arg(temp_dir.path().join("soft.png"))
        .arg("-o")
        .arg(&out);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let written = image::open(&out).unwrap();
    assert_eq!((written.width(), written.height()), (48, 40));

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["plan"]["ops"].is_array());
}

#[test]
fn test_enhance_clip_range() {
    let temp_dir = create_test_images(vec![(
        "panel.png",
        SyntheticImageBuilder::checkerboard(32, 32, 4).image,
    )]);
    let out = temp_dir.path().join("clipped.png");

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg("enhance")
        .arg(temp_dir.path().join("panel.png"))
        .args(["-o"])
        .arg(&out)
        .args(["--clip-min", "20", "--clip-max", "200"]);
    cmd.assert().success();

    let written = image::open(&out).unwrap().to_luma8();
    assert!(written.pixels().all(|p| (20..=200).contains(&p.0[0])));
}

#[test]
fn test_enhance_rejects_inverted_clip_range() {
    let temp_dir = create_test_images(vec![(
        "panel.png",
        SyntheticImageBuilder::checkerboard(32, 32, 4).image,
    )]);

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg("enhance")
        .arg(temp_dir.path().join("panel.png"))
        .arg("-o")
        .arg(temp_dir.path().join("out.png"))
        .args(["--clip-min", "200", "--clip-max", "20"]);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("clip_range"));
}

#[test]
fn test_enhance_missing_input() {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("paint-qa").unwrap();
    cmd.arg("enhance")
        .arg(temp_dir.path().join("missing.png"))
        .arg("-o")
        .arg(temp_dir.path().join("out.png"));

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("missing.png"));
}
