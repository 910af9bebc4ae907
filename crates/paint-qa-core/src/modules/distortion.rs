//! Distortion aggregation.
//!
//! Combines the four metric analyzers into one fixed-order feature vector:
//!
//! | index | metric | definition |
//! |-------|--------|------------|
//! | 0 | `sharpness` | `Var(∇²I)` |
//! | 1 | `noise_variance` | `Var(I)` |
//! | 2 | `illumination_uniformity` | `σ / μ` |
//! | 3 | `overexposure_ratio` | share of pixels `>= threshold` |
//!
//! Usage: bind an image with [`DistortionAnalyzer::bind_image`], call
//! [`DistortionAnalyzer::analyze`], then read [`DistortionAnalyzer::metrics`]
//! or [`DistortionAnalyzer::metrics_vector`]. One analyzer can be reused
//! across images; it is not meant to be shared between threads while binding.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::illumination::IlluminationUniformityAnalyzer;
use super::noise::NoiseVarianceAnalyzer;
use super::overexposure::{OverExposureAnalyzer, DEFAULT_OVEREXPOSURE_THRESHOLD};
use super::sharpness::BlurSharpnessAnalyzer;
use crate::domain::{
    BoundSource, DistortionError, DistortionMetrics, Raster, RasterBinding, Result, METRIC_NAMES,
};

/// Runs all distortion metrics on one bound image.
#[derive(Debug, Clone)]
pub struct DistortionAnalyzer {
    binding: RasterBinding,
    blur: BlurSharpnessAnalyzer,
    noise: NoiseVarianceAnalyzer,
    illumination: IlluminationUniformityAnalyzer,
    overexposure: OverExposureAnalyzer,
    metrics: Option<DistortionMetrics>,
}

impl DistortionAnalyzer {
    /// Creates an analyzer. `overexposure_threshold` only affects the
    /// over-exposure metric and is fixed for the analyzer's lifetime.
    #[must_use]
    pub const fn new(overexposure_threshold: i32) -> Self {
        Self {
            binding: RasterBinding::Unbound,
            blur: BlurSharpnessAnalyzer::new(),
            noise: NoiseVarianceAnalyzer::new(),
            illumination: IlluminationUniformityAnalyzer::new(),
            overexposure: OverExposureAnalyzer::new(overexposure_threshold),
            metrics: None,
        }
    }

    /// The over-exposure threshold forwarded to the over-exposure metric.
    #[must_use]
    pub const fn overexposure_threshold(&self) -> i32 {
        self.overexposure.threshold()
    }

    /// Binds an image to this analyzer and every component analyzer.
    ///
    /// An in-memory raster wins over a path. Clears the cached metrics.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if neither an image nor a path is given; nothing is
    /// rebound in that case.
    pub fn bind_image(&mut self, image: Option<Raster>, path: Option<PathBuf>) -> Result<()> {
        self.binding.bind(image, path)?;
        self.fan_out();
        Ok(())
    }

    /// Binds an in-memory raster.
    pub fn bind_raster(&mut self, raster: impl Into<Raster>) {
        self.bind_shared(Arc::new(raster.into()));
    }

    /// Binds a raster that the caller keeps a handle to.
    pub fn bind_shared(&mut self, raster: Arc<Raster>) {
        self.binding.bind_shared(raster, None);
        self.fan_out();
    }

    /// Binds a path, decoded on the next [`analyze`](Self::analyze).
    pub fn bind_path(&mut self, path: impl Into<PathBuf>) {
        self.binding = RasterBinding::Unresolved(path.into());
        self.fan_out();
    }

    fn fan_out(&mut self) {
        self.metrics = None;
        match &self.binding {
            RasterBinding::Unbound => {
                self.blur.reset();
                self.noise.reset();
                self.illumination.reset();
                self.overexposure.reset();
            }
            RasterBinding::Unresolved(path) => {
                self.blur.bind_path(path.clone());
                self.noise.bind_path(path.clone());
                self.illumination.bind_path(path.clone());
                self.overexposure.bind_path(path.clone());
            }
            RasterBinding::Resolved { raster, path } => {
                self.blur.bind_shared(Arc::clone(raster), path.clone());
                self.noise.bind_shared(Arc::clone(raster), path.clone());
                self.illumination.bind_shared(Arc::clone(raster), path.clone());
                self.overexposure.bind_shared(Arc::clone(raster), path.clone());
            }
        }
    }

    /// The bound raster or pending path.
    #[must_use]
    pub fn image_source(&self) -> Option<BoundSource<'_>> {
        self.binding.source()
    }

    /// Computes all four metrics on the bound image and caches them.
    ///
    /// A bound path is decoded once and the decoded raster is shared by all
    /// component analyzers. Either all four metrics succeed or the call
    /// fails with the first component error and nothing is cached.
    ///
    /// # Errors
    ///
    /// `Precondition` if nothing is bound; `NotFound`/`Decode` if a bound
    /// path cannot be decoded.
    pub fn analyze(&mut self) -> Result<DistortionMetrics> {
        if self.binding.is_bound() {
            let path = self.binding.path().map(PathBuf::from);
            let raster = self.binding.resolve()?;
            self.blur.bind_shared(Arc::clone(&raster), path.clone());
            self.noise.bind_shared(Arc::clone(&raster), path.clone());
            self.illumination.bind_shared(Arc::clone(&raster), path.clone());
            self.overexposure.bind_shared(raster, path);
        }

        let blur = self.blur.analyze()?;
        let noise = self.noise.analyze()?;
        let illumination = self.illumination.analyze()?;
        let overexposure = self.overexposure.analyze()?;

        let metrics = DistortionMetrics {
            sharpness: blur.sharpness,
            noise_variance: noise.variance,
            illumination_uniformity: illumination.uniformity,
            overexposure_ratio: overexposure.ratio,
        };
        debug!("Distortion metrics: {metrics}");
        self.metrics = Some(metrics);
        Ok(metrics)
    }

    /// Most recent metrics. Never triggers analysis.
    #[must_use]
    pub const fn metrics(&self) -> Option<&DistortionMetrics> {
        self.metrics.as_ref()
    }

    /// Most recent metrics as a vector in [`metrics_names`](Self::metrics_names) order.
    ///
    /// # Errors
    ///
    /// `Precondition` if [`analyze`](Self::analyze) has not succeeded since the last bind.
    pub fn metrics_vector(&self) -> Result<[f64; 4]> {
        self.metrics
            .as_ref()
            .map(DistortionMetrics::as_vector)
            .ok_or_else(|| {
                DistortionError::Precondition("no metrics available, call analyze() first".into())
            })
    }

    /// Metric names in vector order.
    #[must_use]
    pub const fn metrics_names() -> [&'static str; 4] {
        METRIC_NAMES
    }

    /// Drops the binding and the cached metrics.
    pub fn reset(&mut self) {
        self.binding.reset();
        self.fan_out();
    }
}

impl Default for DistortionAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_OVEREXPOSURE_THRESHOLD)
    }
}
