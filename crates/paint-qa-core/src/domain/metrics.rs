//! Metric result records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Names of the distortion metrics, in vector order.
///
/// This order is a public contract; downstream consumers index into the
/// vector by position.
pub const METRIC_NAMES: [&str; 4] = [
    "sharpness",
    "noise_variance",
    "illumination_uniformity",
    "overexposure_ratio",
];

/// Laplacian-variance sharpness. Higher is sharper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharpnessResult {
    /// Variance of the Laplacian response.
    pub sharpness: f64,
}

/// Global intensity variance, a relative noise proxy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseVarianceResult {
    /// Variance of all intensities.
    pub variance: f64,
}

/// Coefficient of variation of intensity. Higher is less uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IlluminationUniformityResult {
    /// `σ / μ`, with `+∞` for a zero mean with spread and `0` for an all-zero image.
    #[serde(with = "crate::domain::float")]
    pub uniformity: f64,
}

/// Fraction of saturated pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverExposureResult {
    /// Share of pixels at or above `threshold`, in `[0, 1]`.
    pub ratio: f64,
    /// Threshold the ratio was computed with.
    pub threshold: f64,
}

/// All four distortion metrics of one image.
///
/// Non-finite values serialize as `"inf"`, `"-inf"` or `"nan"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistortionMetrics {
    /// See [`SharpnessResult`].
    #[serde(with = "crate::domain::float")]
    pub sharpness: f64,
    /// See [`NoiseVarianceResult`].
    #[serde(with = "crate::domain::float")]
    pub noise_variance: f64,
    /// See [`IlluminationUniformityResult`].
    #[serde(with = "crate::domain::float")]
    pub illumination_uniformity: f64,
    /// See [`OverExposureResult`].
    #[serde(with = "crate::domain::float")]
    pub overexposure_ratio: f64,
}

impl DistortionMetrics {
    /// The metrics in [`METRIC_NAMES`] order.
    #[must_use]
    pub const fn as_vector(&self) -> [f64; 4] {
        [
            self.sharpness,
            self.noise_variance,
            self.illumination_uniformity,
            self.overexposure_ratio,
        ]
    }

    /// Builds metrics from a vector in [`METRIC_NAMES`] order.
    #[must_use]
    pub const fn from_vector(vector: [f64; 4]) -> Self {
        let [sharpness, noise_variance, illumination_uniformity, overexposure_ratio] = vector;
        Self {
            sharpness,
            noise_variance,
            illumination_uniformity,
            overexposure_ratio,
        }
    }

    /// `(name, value)` pairs in vector order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        METRIC_NAMES.into_iter().zip(self.as_vector())
    }
}

impl fmt::Display for DistortionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.named().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{name}={value:.3}")?;
        }
        Ok(())
    }
}
