//! Distortion metric analyzers.
//!
//! Each analyzer wraps one [`Metric`](crate::domain::Metric) in a
//! [`MetricAnalyzer`](crate::domain::MetricAnalyzer); [`DistortionAnalyzer`]
//! runs all four on one image.

mod distortion;
mod illumination;
mod noise;
mod overexposure;
mod sharpness;

pub use distortion::DistortionAnalyzer;
pub use illumination::{uniformity, CoefficientOfVariation, IlluminationUniformityAnalyzer};
pub use noise::{IntensityVariance, NoiseVarianceAnalyzer};
pub use overexposure::{OverExposureAnalyzer, SaturatedRatio, DEFAULT_OVEREXPOSURE_THRESHOLD};
pub use sharpness::{laplacian, BlurSharpnessAnalyzer, LaplacianSharpness};
