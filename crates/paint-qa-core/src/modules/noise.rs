//! Noise approximation.
//!
//! Uses the global intensity variance `Var(I)`. This mixes scene texture with
//! sensor noise and is only meaningful for relative comparison within a fixed
//! scene and camera setup.

use crate::domain::{IntensityPlane, Metric, MetricAnalyzer, NoiseVarianceResult};

/// Global intensity variance metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntensityVariance;

impl Metric for IntensityVariance {
    const NAME: &'static str = "noise_variance";
    type Output = NoiseVarianceResult;

    fn measure(&self, plane: &IntensityPlane) -> NoiseVarianceResult {
        NoiseVarianceResult {
            variance: plane.variance(),
        }
    }
}

/// Noise analyzer.
pub type NoiseVarianceAnalyzer = MetricAnalyzer<IntensityVariance>;

impl NoiseVarianceAnalyzer {
    /// Creates an unbound noise analyzer.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_metric(IntensityVariance)
    }
}
