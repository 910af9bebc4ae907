//! Over-exposure analysis.
//!
//! Ratio of pixels whose intensity is at or above a saturation threshold.
//! An empty raster has a ratio of `0.0`.

use crate::domain::{IntensityPlane, Metric, MetricAnalyzer, OverExposureResult};

/// Default saturation threshold for 8-bit intensities.
pub const DEFAULT_OVEREXPOSURE_THRESHOLD: i32 = 250;

/// Saturated-pixel ratio metric.
#[derive(Debug, Clone, Copy)]
pub struct SaturatedRatio {
    threshold: i32,
}

impl SaturatedRatio {
    /// Creates the metric. The threshold is used as-is.
    #[must_use]
    pub const fn new(threshold: i32) -> Self {
        Self { threshold }
    }

    /// The saturation threshold.
    #[must_use]
    pub const fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl Default for SaturatedRatio {
    fn default() -> Self {
        Self::new(DEFAULT_OVEREXPOSURE_THRESHOLD)
    }
}

impl Metric for SaturatedRatio {
    const NAME: &'static str = "overexposure_ratio";
    type Output = OverExposureResult;

    #[allow(clippy::cast_precision_loss)]
    fn measure(&self, plane: &IntensityPlane) -> OverExposureResult {
        let threshold = f64::from(self.threshold);
        let total = plane.len();
        let ratio = if total == 0 {
            0.0
        } else {
            let over = plane.values().iter().filter(|&&v| v >= threshold).count();
            over as f64 / total as f64
        };
        OverExposureResult { ratio, threshold }
    }
}

/// Over-exposure analyzer.
pub type OverExposureAnalyzer = MetricAnalyzer<SaturatedRatio>;

impl OverExposureAnalyzer {
    /// Creates an unbound analyzer with the given threshold.
    #[must_use]
    pub const fn new(threshold: i32) -> Self {
        Self::with_metric(SaturatedRatio::new(threshold))
    }

    /// The saturation threshold.
    #[must_use]
    pub const fn threshold(&self) -> i32 {
        self.metric().threshold()
    }
}
