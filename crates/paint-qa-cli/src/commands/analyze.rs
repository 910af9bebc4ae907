//! Analyze command - compute distortion metrics for images.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use paint_qa_adapters::{load_criteria, FsImageSource};
use paint_qa_core::modules::DEFAULT_OVEREXPOSURE_THRESHOLD;
use paint_qa_core::pipeline::{run_batch, BatchOptions};
use paint_qa_core::strategy::{EnhancementPlanner, SharpnessCriteria};
use paint_qa_core::ImageSource;
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{BatchProgress, JsonOutput};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

impl OutputFormat {
    /// Parses a config file value.
    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "json" => Some(Self::Json),
            "jsonl" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

/// Shared arguments for image analysis.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Files or directories to analyze
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Intensity at or above which a pixel counts as over-exposed
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub overexposure_threshold: Option<i32>,

    /// Attach an enhancement plan to every result
    #[arg(long)]
    pub plan: bool,

    /// Sharpness criteria file (TOML) used for planning
    #[arg(long, value_name = "FILE")]
    pub criteria: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl AnalyzeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.overexposure_threshold = args
            .overexposure_threshold
            .or(config.analysis.overexposure_threshold);

        if args.criteria.is_none() {
            args.criteria.clone_from(&config.strategy.criteria);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        if !args.plan {
            args.plan = config.output.plan.unwrap_or(false);
        }

        args
    }

    /// Over-exposure threshold with fallback to the analyzer default.
    pub fn overexposure_threshold(&self) -> i32 {
        self.overexposure_threshold
            .unwrap_or(DEFAULT_OVEREXPOSURE_THRESHOLD)
    }

    /// Output format with fallback to JSONL.
    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Outcome of the analyze command.
pub struct AnalyzeOutcome {
    /// Number of images analyzed.
    pub processed: usize,
    /// Number of images skipped.
    pub skipped: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the analyze command.
///
/// Expects `args` to have been processed through `with_config()` first.
pub fn run(args: &AnalyzeArgs) -> Result<AnalyzeOutcome> {
    info!("Running analyze command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let planner = if args.plan {
        Some(EnhancementPlanner::new(criteria(args.criteria.as_deref())?))
    } else {
        None
    };

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = BatchProgress::new(total.map(|t| t as u64), args.quiet, show_progress);
    let output = JsonOutput::stdout(args.format(), args.pretty);

    let options = BatchOptions {
        overexposure_threshold: args.overexposure_threshold(),
        planner,
    };
    let summary = run_batch(&source, &output, &progress, &options)?;

    let exit_code = if summary.skipped > 0 {
        ExitCode::Skipped
    } else {
        ExitCode::Success
    };

    Ok(AnalyzeOutcome {
        processed: summary.processed,
        skipped: summary.skipped,
        exit_code,
    })
}

/// Criteria from `path`, or the built-in defaults.
pub fn criteria(path: Option<&std::path::Path>) -> Result<SharpnessCriteria> {
    match path {
        Some(path) => {
            debug!("Using sharpness criteria from {}", path.display());
            load_criteria(path).context("Failed to load sharpness criteria")
        }
        None => Ok(SharpnessCriteria::default()),
    }
}
