//! Illumination uniformity analysis.
//!
//! Uniformity is the coefficient of variation of intensity, `U = σ / μ`.
//! A zero mean is handled explicitly: with spread the image is maximally
//! non-uniform (`+∞`); without spread (all zero) it is perfectly uniform (`0`).

use crate::domain::{IlluminationUniformityResult, IntensityPlane, Metric, MetricAnalyzer};

/// Coefficient-of-variation metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoefficientOfVariation;

impl Metric for CoefficientOfVariation {
    const NAME: &'static str = "illumination_uniformity";
    type Output = IlluminationUniformityResult;

    fn measure(&self, plane: &IntensityPlane) -> IlluminationUniformityResult {
        IlluminationUniformityResult {
            uniformity: uniformity(plane.mean(), plane.std_dev()),
        }
    }
}

/// `σ / μ` with the zero-mean policy applied.
#[must_use]
pub fn uniformity(mean: f64, std_dev: f64) -> f64 {
    if mean == 0.0 {
        if std_dev > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        std_dev / mean
    }
}

/// Illumination uniformity analyzer.
pub type IlluminationUniformityAnalyzer = MetricAnalyzer<CoefficientOfVariation>;

impl IlluminationUniformityAnalyzer {
    /// Creates an unbound uniformity analyzer.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_metric(CoefficientOfVariation)
    }
}
