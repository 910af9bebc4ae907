//! Batch analysis over the ports.
//!
//! Pulls images from an [`ImageSource`], runs a [`DistortionAnalyzer`] on
//! each, optionally attaches an enhancement plan, and pushes results to a
//! [`ResultOutput`] while reporting to a [`ProgressSink`]. Images that fail to
//! load or analyze are skipped, never fatal.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::{AnalysisResult, ImageDimensions, ImageInfo, Result};
use crate::modules::{DistortionAnalyzer, DEFAULT_OVEREXPOSURE_THRESHOLD};
use crate::ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
use crate::strategy::EnhancementPlanner;

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Forwarded unchanged to the over-exposure metric.
    pub overexposure_threshold: i32,
    /// When set, every result carries an enhancement plan.
    pub planner: Option<EnhancementPlanner>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            overexposure_threshold: DEFAULT_OVEREXPOSURE_THRESHOLD,
            planner: None,
        }
    }
}

/// Counts from a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Images analyzed and written.
    pub processed: usize,
    /// Images that failed to load or analyze.
    pub skipped: usize,
}

/// Analyzes every image of `source`.
///
/// # Errors
///
/// Only output failures abort the batch; per-image failures are reported
/// as [`ProgressEvent::Skipped`].
pub fn run_batch(
    source: &dyn ImageSource,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    options: &BatchOptions,
) -> anyhow::Result<BatchSummary> {
    let total = source.count_hint();
    let mut analyzer = DistortionAnalyzer::new(options.overexposure_threshold);
    let mut summary = BatchSummary::default();

    for (index, item) in source.images().enumerate() {
        let image = match item {
            Ok(image) => image,
            Err(e) => {
                warn!("Skipping image {index}: {e:#}");
                progress.on_event(ProgressEvent::Skipped {
                    path: format!("image {index}"),
                    reason: format!("{e:#}"),
                });
                summary.skipped += 1;
                continue;
            }
        };

        let path = image.path.clone();
        progress.on_event(ProgressEvent::Started {
            path: path.clone(),
            index,
            total,
        });

        match analyze_image(&mut analyzer, image, options.planner.as_ref()) {
            Ok(result) => {
                output.write(&result)?;
                progress.on_event(ProgressEvent::Completed { result });
                summary.processed += 1;
            }
            Err(e) => {
                warn!("Skipping {path}: {e}");
                progress.on_event(ProgressEvent::Skipped {
                    path,
                    reason: e.to_string(),
                });
                summary.skipped += 1;
            }
        }
    }

    output.flush()?;
    info!(
        "Analyzed {} image(s), skipped {}",
        summary.processed, summary.skipped
    );
    progress.on_event(ProgressEvent::Finished {
        processed: summary.processed,
        skipped: summary.skipped,
    });
    Ok(summary)
}

/// Analyzes one loaded image and builds its result record.
///
/// # Errors
///
/// Propagates analyzer errors unchanged.
pub fn analyze_image(
    analyzer: &mut DistortionAnalyzer,
    image: ImageInfo,
    planner: Option<&EnhancementPlanner>,
) -> Result<AnalysisResult> {
    let dimensions = ImageDimensions::new(image.width, image.height);
    let path = image.path.clone();
    analyzer.bind_image(Some(image.into_raster()), Some(PathBuf::from(&path)))?;

    let metrics = analyzer.analyze()?;
    let plan = planner.map(|p| p.build_plan(&metrics));
    debug!("{path}: {metrics}");

    Ok(AnalysisResult {
        path,
        timestamp: iso_timestamp(),
        dimensions,
        metrics,
        vector: metrics.as_vector(),
        plan,
    })
}

/// Current UTC time in RFC 3339 format.
#[must_use]
pub fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
