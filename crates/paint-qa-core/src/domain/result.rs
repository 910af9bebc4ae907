//! Analysis result types.

use serde::{Deserialize, Serialize};

use super::{DistortionMetrics, Raster};
use crate::strategy::EnhancementPlan;

/// Complete analysis result for a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Path to the analyzed image.
    pub path: String,
    /// Timestamp of analysis (ISO 8601).
    pub timestamp: String,
    /// Image dimensions.
    pub dimensions: ImageDimensions,
    /// Named distortion metrics.
    pub metrics: DistortionMetrics,
    /// The same metrics as a fixed-order vector.
    ///
    /// Non-finite values serialize like the named metrics.
    #[serde(with = "crate::domain::float::vector")]
    pub vector: [f64; 4],
    /// Enhancement plan derived from the metrics, when requested.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub plan: Option<EnhancementPlan>,
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Basic image information extracted during loading.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path to the image file.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data, in the file's native layout.
    pub image: image::DynamicImage,
}

impl ImageInfo {
    /// Wraps a decoded image.
    #[must_use]
    pub fn new(path: impl Into<String>, image: image::DynamicImage) -> Self {
        Self {
            path: path.into(),
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// Consumes the info and returns the raster analyzers see.
    ///
    /// Converted to 8-bit RGB exactly like a path binding, so a file gives the
    /// same metrics whichever way it reaches the analyzer.
    #[must_use]
    pub fn into_raster(self) -> Raster {
        Raster::from_decoded(self.image)
    }
}
