//! Sharpness criteria files.
//!
//! A criteria file is TOML with one `[[levels]]` table per interval:
//!
//! ```toml
//! [[levels]]
//! level = "Clear"
//! lower_bound = 25.0
//! upper_bound = inf
//! description = "no visible blur"
//! ```
//!
//! Rows naming an unknown level are skipped with a warning.

use std::path::Path;

use anyhow::{Context, Result};
use paint_qa_core::strategy::{SharpnessCriteria, SharpnessLevel, SharpnessRule};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CriteriaFile {
    #[serde(default)]
    levels: Vec<LevelRow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelRow {
    level: String,
    lower_bound: f64,
    upper_bound: f64,
    #[serde(default)]
    description: String,
}

/// Loads criteria from a TOML file.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, has no usable rows, or a row
/// has inverted or NaN bounds.
pub fn load_criteria(path: &Path) -> Result<SharpnessCriteria> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read criteria file: {}", path.display()))?;
    parse_criteria(&content)
        .with_context(|| format!("Invalid criteria file: {}", path.display()))
}

/// Parses criteria from TOML text.
///
/// # Errors
///
/// Same as [`load_criteria`], minus the I/O.
pub fn parse_criteria(content: &str) -> Result<SharpnessCriteria> {
    let file: CriteriaFile = toml::from_str(content)?;

    let rules: Vec<SharpnessRule> = file
        .levels
        .into_iter()
        .filter_map(|row| match row.level.parse::<SharpnessLevel>() {
            Ok(level) => Some(SharpnessRule {
                level,
                lower_bound: row.lower_bound,
                upper_bound: row.upper_bound,
                description: row.description,
            }),
            Err(e) => {
                warn!("Skipping criteria row: {e}");
                None
            }
        })
        .collect();

    anyhow::ensure!(!rules.is_empty(), "no usable [[levels]] rows");
    debug!("Loaded {} sharpness rule(s)", rules.len());
    Ok(SharpnessCriteria::new(rules)?)
}
