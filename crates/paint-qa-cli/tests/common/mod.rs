//! Shared fixtures for CLI tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::path::PathBuf;

use paint_qa_test_support::SyntheticImageBuilder;
use tempfile::TempDir;

/// Create a temporary directory with the given images saved by name.
pub fn create_test_images(images: Vec<(&str, image::DynamicImage)>) -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();

    for (name, img) in images {
        let path = temp_dir.path().join(name);
        img.save(&path).unwrap();
    }

    temp_dir
}

/// A directory holding one sharp panel, `panel.png`.
pub fn single_panel() -> (TempDir, PathBuf) {
    let dir = create_test_images(vec![(
        "panel.png",
        SyntheticImageBuilder::checkerboard(64, 64, 8).image,
    )]);
    let path = dir.path().join("panel.png");
    (dir, path)
}
