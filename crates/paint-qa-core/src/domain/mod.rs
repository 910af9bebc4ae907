//! Core domain types: rasters, the binding contract, metric records and errors.

mod analyzer;
mod binding;
mod error;
pub(crate) mod float;
mod metrics;
mod raster;
mod result;

pub use analyzer::{Metric, MetricAnalyzer};
pub use binding::{BoundSource, RasterBinding};
pub use error::{DistortionError, Result};
pub use metrics::{
    DistortionMetrics, IlluminationUniformityResult, NoiseVarianceResult, OverExposureResult,
    SharpnessResult, METRIC_NAMES,
};
pub(crate) use raster::{reflect_101, variance};
pub use raster::{decode_image, decode_raster, ChannelOrder, IntensityPlane, Raster};
pub use result::{AnalysisResult, ImageDimensions, ImageInfo};
