//! Enhance command - analyze, plan and apply enhancements to one image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use paint_qa_adapters::load_image;
use paint_qa_core::enhance::EnhancementConfig;
use paint_qa_core::pipeline::analyze_image;
use paint_qa_core::strategy::{apply_plan, EnhancementPlanner};
use paint_qa_core::DistortionAnalyzer;
use tracing::{info, warn};

use super::analyze::criteria;
use crate::config::AppConfig;

/// Arguments for the enhance command.
#[derive(Args, Clone)]
pub struct EnhanceArgs {
    /// Image to enhance
    pub input: PathBuf,

    /// Where to write the enhanced image; format follows the extension
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Sharpness criteria file (TOML)
    #[arg(long, value_name = "FILE")]
    pub criteria: Option<PathBuf>,

    /// Intensity at or above which a pixel counts as over-exposed
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub overexposure_threshold: Option<i32>,

    /// Lower output intensity clamp (0-255)
    #[arg(long, value_name = "V")]
    pub clip_min: Option<f32>,

    /// Upper output intensity clamp (0-255)
    #[arg(long, value_name = "V")]
    pub clip_max: Option<f32>,
}

impl EnhanceArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.criteria.is_none() {
            args.criteria.clone_from(&config.strategy.criteria);
        }
        args.overexposure_threshold = args
            .overexposure_threshold
            .or(config.analysis.overexposure_threshold);
        args.clip_min = args.clip_min.or(config.enhance.clip_min);
        args.clip_max = args.clip_max.or(config.enhance.clip_max);
        args
    }

    /// Enhancement config from the clip options. A single bound is paired
    /// with the other end of the 8-bit range.
    pub fn enhancement_config(&self) -> EnhancementConfig {
        let clip_range = match (self.clip_min, self.clip_max) {
            (None, None) => None,
            (lo, hi) => Some((lo.unwrap_or(0.0), hi.unwrap_or(255.0))),
        };
        EnhancementConfig {
            clip_range,
            ..Default::default()
        }
    }
}

/// Run the enhance command. Prints the analysis result, with its plan, to stdout.
pub fn run(args: &EnhanceArgs) -> Result<()> {
    let planner = EnhancementPlanner::new(criteria(args.criteria.as_deref())?);
    let config = args.enhancement_config();
    config.validate().context("Invalid enhancement options")?;

    let info = load_image(&args.input)?;
    let original = info.image.clone();

    let mut analyzer = DistortionAnalyzer::new(
        args.overexposure_threshold
            .unwrap_or(paint_qa_core::modules::DEFAULT_OVEREXPOSURE_THRESHOLD),
    );
    let result = analyze_image(&mut analyzer, info, Some(&planner))
        .with_context(|| format!("Failed to analyze {}", args.input.display()))?;

    let plan = result
        .plan
        .as_ref()
        .context("Analysis produced no enhancement plan")?;
    if plan.is_low_quality() {
        warn!(
            "{} is marked low quality ({})",
            args.input.display(),
            plan.sharpness_level
        );
    }

    let enhanced = apply_plan(&original, plan, &config)
        .with_context(|| format!("Failed to enhance {}", args.input.display()))?;
    enhanced
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!(
        "Wrote {} ({} step(s))",
        args.output.display(),
        plan.ops.len()
    );

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
