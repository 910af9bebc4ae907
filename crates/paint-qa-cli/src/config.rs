//! Configuration file support for paint-qa.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/paint-qa/config.toml` (lowest priority)
//! - Project-local: `.paint-qa.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Metric settings.
    pub analysis: AnalysisConfig,
    /// Enhancement planning settings.
    pub strategy: StrategyConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
    /// Enhancement output settings.
    pub enhance: EnhanceConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Metric configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Saturation threshold for the over-exposure ratio. Used as-is.
    pub overexposure_threshold: Option<i32>,
}

/// Strategy configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Sharpness criteria file.
    pub criteria: Option<PathBuf>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
    /// Attach enhancement plans.
    pub plan: Option<bool>,
}

/// Enhancement configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// Lower output clamp (0-255).
    pub clip_min: Option<f32>,
    /// Upper output clamp (0-255).
    pub clip_max: Option<f32>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/paint-qa/config.toml`
    /// 2. Project-local: `.paint-qa.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        for (name, value) in [
            ("enhance.clip_min", self.enhance.clip_min),
            ("enhance.clip_max", self.enhance.clip_max),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(format!("{name} must be finite, got {v}"));
                }
            }
        }
        if let (Some(lo), Some(hi)) = (self.enhance.clip_min, self.enhance.clip_max) {
            if lo > hi {
                return Err(format!(
                    "enhance.clip_min ({lo}) must not exceed enhance.clip_max ({hi})"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.analysis.overexposure_threshold = other
            .analysis
            .overexposure_threshold
            .or(self.analysis.overexposure_threshold);

        self.strategy.criteria = other
            .strategy
            .criteria
            .or_else(|| self.strategy.criteria.take());

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
        self.output.plan = other.output.plan.or(self.output.plan);

        self.enhance.clip_min = other.enhance.clip_min.or(self.enhance.clip_min);
        self.enhance.clip_max = other.enhance.clip_max.or(self.enhance.clip_max);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paint-qa").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.paint-qa.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".paint-qa.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.analysis.overexposure_threshold.is_none());
        assert!(config.strategy.criteria.is_none());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert!(config.general.recursive.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[general]
recursive = true

[analysis]
overexposure_threshold = 240

[strategy]
criteria = 'criteria/booth-3.toml'

[output]
format = 'json'
pretty = true
progress = false
plan = true

[enhance]
clip_min = 5.0
clip_max = 250.0
";
        let config: AppConfig = toml::from_str(toml).expect("parse full config");

        assert_eq!(config.general.recursive, Some(true));
        assert_eq!(config.analysis.overexposure_threshold, Some(240));
        assert_eq!(
            config.strategy.criteria,
            Some(PathBuf::from("criteria/booth-3.toml"))
        );
        assert_eq!(config.output.format, Some("json".to_string()));
        assert_eq!(config.output.pretty, Some(true));
        assert_eq!(config.output.plan, Some(true));
        assert_eq!(config.enhance.clip_min, Some(5.0));
        assert_eq!(config.enhance.clip_max, Some(250.0));
    }

    #[test]
    fn test_threshold_out_of_8bit_range_is_kept() {
        let config: AppConfig = toml::from_str(
            r"
[analysis]
overexposure_threshold = 300
",
        )
        .expect("parse");

        assert_eq!(config.analysis.overexposure_threshold, Some(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_configs() {
        let mut base: AppConfig = toml::from_str(
            r"
[analysis]
overexposure_threshold = 250

[output]
format = 'json'
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[analysis]
overexposure_threshold = 230

[enhance]
clip_max = 240.0
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.analysis.overexposure_threshold, Some(230));
        assert_eq!(base.output.format, Some("json".to_string()));
        assert_eq!(base.enhance.clip_max, Some(240.0));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base: AppConfig = toml::from_str(
            r"
[strategy]
criteria = 'levels.toml'

[output]
plan = true
",
        )
        .expect("parse base");

        base.merge(AppConfig::default());

        assert_eq!(base.strategy.criteria, Some(PathBuf::from("levels.toml")));
        assert_eq!(base.output.plan, Some(true));
    }

    #[test]
    fn test_merge_all_sections() {
        let mut base: AppConfig = toml::from_str(
            r"
[general]
recursive = false

[output]
format = 'json'
pretty = false
",
        )
        .expect("parse base");

        let override_config: AppConfig = toml::from_str(
            r"
[general]
recursive = true

[output]
format = 'jsonl'
pretty = true
",
        )
        .expect("parse override");

        base.merge(override_config);

        assert_eq!(base.general.recursive, Some(true));
        assert_eq!(base.output.format, Some("jsonl".to_string()));
        assert_eq!(base.output.pretty, Some(true));
    }

    #[test]
    fn test_invalid_toml_syntax_handled() {
        let toml = r"
[analysis
overexposure_threshold = 250
";
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "invalid TOML should return error");
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let toml = r#"
[analysis]
overexposure_threshold = "high"
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "type mismatch should return error");
    }

    #[test]
    fn test_validate_output_format_invalid() {
        let mut config = AppConfig::default();
        config.output.format = Some("xml".to_string());

        let result = config.validate();
        assert!(result.unwrap_err().contains("output.format"));
    }

    #[test]
    fn test_validate_inverted_clip_range() {
        let mut config = AppConfig::default();
        config.enhance.clip_min = Some(200.0);
        config.enhance.clip_max = Some(100.0);

        let result = config.validate();
        assert!(result.unwrap_err().contains("enhance.clip_min"));
    }

    #[test]
    fn test_validate_non_finite_clip() {
        let mut config = AppConfig::default();
        config.enhance.clip_max = Some(f32::NAN);

        assert!(config.validate().unwrap_err().contains("enhance.clip_max"));
    }

    #[test]
    fn test_validate_empty_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_find_config_in_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("line-2").join("booth");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".paint-qa.toml"), "").unwrap();

        assert_eq!(
            find_config_in_parents(&nested),
            Some(dir.path().join(".paint-qa.toml"))
        );
    }
}
