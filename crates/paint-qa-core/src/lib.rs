//! Paint QA Core - distortion metrics for paint inspection imagery
//!
//! Scores a photograph on four independent axes (Laplacian sharpness,
//! intensity variance, illumination uniformity, over-exposure ratio) and
//! combines them into a fixed-order feature vector. On top of the metrics
//! sit an enhancement planner and a set of image enhancers.
//!
//! ```
//! use paint_qa_core::modules::DistortionAnalyzer;
//!
//! let mut analyzer = DistortionAnalyzer::default();
//! analyzer.bind_raster(image::GrayImage::from_pixel(100, 100, image::Luma([128])));
//! let metrics = analyzer.analyze()?;
//! assert_eq!(metrics.as_vector().len(), DistortionAnalyzer::metrics_names().len());
//! # Ok::<(), paint_qa_core::DistortionError>(())
//! ```

pub mod domain;
pub mod enhance;
pub mod modules;
pub mod pipeline;
pub mod ports;
pub mod strategy;

pub use domain::{
    AnalysisResult, ChannelOrder, DistortionError, DistortionMetrics, ImageDimensions, ImageInfo,
    IntensityPlane, Raster, Result, METRIC_NAMES,
};
pub use modules::DistortionAnalyzer;
pub use ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
