//! Error taxonomy for binding and analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by analyzers, the binding contract, enhancers and the strategy planner.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DistortionError {
    /// A call was made with arguments that can never succeed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The bound path does not exist.
    #[error("image not found: {}", path.display())]
    NotFound {
        /// Path that could not be opened.
        path: PathBuf,
    },

    /// The bound path exists but is not a decodable image.
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        /// Path that failed to decode.
        path: PathBuf,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// An operation was invoked before its precondition held.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Sharpness criteria are malformed.
    #[error("invalid sharpness criteria: {0}")]
    Criteria(String),

    /// An enhancer could not produce an output image.
    #[error("enhancement failed: {0}")]
    Enhancement(String),
}

impl DistortionError {
    pub(crate) fn no_image_bound() -> Self {
        Self::Precondition("no image bound, call bind_image() first".into())
    }

    /// Returns true for the `Precondition` kind.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// Returns true for the `InvalidArgument` kind.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Result alias for distortion operations.
pub type Result<T, E = DistortionError> = std::result::Result<T, E>;
