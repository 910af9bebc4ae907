//! Analyzer trait and the binding-aware analyzer wrapper.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::binding::{BoundSource, RasterBinding};
use super::error::Result;
use super::raster::{IntensityPlane, Raster};

/// A scalar image metric computed over an intensity plane.
///
/// Implementations are pure: the same plane always yields the same output.
pub trait Metric {
    /// Metric name, used for logging.
    const NAME: &'static str;

    /// Immutable result record.
    type Output: Copy + std::fmt::Debug;

    /// Computes the metric.
    fn measure(&self, plane: &IntensityPlane) -> Self::Output;
}

/// Binds an image and runs one [`Metric`] on it.
///
/// Each analyzer owns its binding and caches the most recent result.
#[derive(Debug, Clone)]
pub struct MetricAnalyzer<M: Metric> {
    metric: M,
    binding: RasterBinding,
    result: Option<M::Output>,
}

impl<M: Metric> MetricAnalyzer<M> {
    /// Creates an unbound analyzer for `metric`.
    #[must_use]
    pub const fn with_metric(metric: M) -> Self {
        Self {
            metric,
            binding: RasterBinding::Unbound,
            result: None,
        }
    }

    /// The metric this analyzer computes.
    #[must_use]
    pub const fn metric(&self) -> &M {
        &self.metric
    }

    /// Metric name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        M::NAME
    }

    /// Binds an in-memory raster, a path, or both (the raster wins).
    ///
    /// Clears the cached result.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if both are `None`.
    pub fn bind_image(&mut self, image: Option<Raster>, path: Option<PathBuf>) -> Result<()> {
        self.binding.bind(image, path)?;
        self.result = None;
        Ok(())
    }

    /// Binds an in-memory raster.
    pub fn bind_raster(&mut self, raster: impl Into<Raster>) {
        self.bind_shared(Arc::new(raster.into()), None);
    }

    /// Binds a path, decoded on the next [`analyze`](Self::analyze).
    pub fn bind_path(&mut self, path: impl Into<PathBuf>) {
        self.binding = RasterBinding::Unresolved(path.into());
        self.result = None;
    }

    /// Binds a raster shared with other analyzers.
    pub fn bind_shared(&mut self, raster: Arc<Raster>, path: Option<PathBuf>) {
        self.binding.bind_shared(raster, path);
        self.result = None;
    }

    /// The bound raster or pending path.
    #[must_use]
    pub fn image_source(&self) -> Option<BoundSource<'_>> {
        self.binding.source()
    }

    /// Runs the metric on the bound image and caches the result.
    ///
    /// # Errors
    ///
    /// `Precondition` if nothing is bound; `NotFound`/`Decode` if a bound
    /// path cannot be decoded.
    pub fn analyze(&mut self) -> Result<M::Output> {
        let raster = self.binding.resolve()?;
        let plane = raster.to_intensity();
        let output = self.metric.measure(&plane);
        debug!(
            "{} on {}x{}: {output:?}",
            M::NAME,
            plane.width(),
            plane.height()
        );
        self.result = Some(output);
        Ok(output)
    }

    /// Most recent result, if [`analyze`](Self::analyze) succeeded since the last bind.
    #[must_use]
    pub const fn result(&self) -> Option<&M::Output> {
        self.result.as_ref()
    }

    /// Drops the binding and the cached result.
    pub fn reset(&mut self) {
        self.binding.reset();
        self.result = None;
    }
}

impl<M: Metric + Default> Default for MetricAnalyzer<M> {
    fn default() -> Self {
        Self::with_metric(M::default())
    }
}
