//! Raster binding shared by every analyzer.
//!
//! A binding is either empty, a path waiting to be decoded, or a resolved
//! raster. Path bindings are decoded at most once, on first use, and the
//! decoded raster is kept until the next bind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::error::{DistortionError, Result};
use super::raster::{decode_raster, Raster};

/// Binding state of one analyzer.
#[derive(Debug, Clone, Default)]
pub enum RasterBinding {
    /// Nothing bound yet, or reset.
    #[default]
    Unbound,
    /// Bound to a path that has not been decoded yet.
    Unresolved(PathBuf),
    /// A raster is available.
    Resolved {
        /// The raster.
        raster: Arc<Raster>,
        /// Path the raster came from, if any.
        path: Option<PathBuf>,
    },
}

/// What a binding currently points at.
#[derive(Debug, Clone, Copy)]
pub enum BoundSource<'a> {
    /// An in-memory or already decoded raster.
    Raster(&'a Raster),
    /// A path not yet decoded.
    Path(&'a Path),
}

impl RasterBinding {
    /// Replaces the binding.
    ///
    /// An in-memory raster wins over a path when both are given.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if neither an image nor a path is provided. The
    /// previous binding is kept in that case.
    pub fn bind(&mut self, image: Option<Raster>, path: Option<PathBuf>) -> Result<()> {
        *self = match (image, path) {
            (None, None) => {
                return Err(DistortionError::InvalidArgument(
                    "either an image or a path must be provided to bind_image()".into(),
                ))
            }
            (Some(raster), path) => Self::Resolved {
                raster: Arc::new(raster),
                path,
            },
            (None, Some(path)) => Self::Unresolved(path),
        };
        Ok(())
    }

    /// Binds an already shared raster without copying it.
    pub fn bind_shared(&mut self, raster: Arc<Raster>, path: Option<PathBuf>) {
        *self = Self::Resolved { raster, path };
    }

    /// Returns the raster, decoding a pending path first.
    ///
    /// # Errors
    ///
    /// `Precondition` when unbound; `NotFound`/`Decode` when the path cannot
    /// be decoded. A failed decode leaves the binding unresolved.
    pub fn resolve(&mut self) -> Result<Arc<Raster>> {
        match self {
            Self::Unbound => Err(DistortionError::no_image_bound()),
            Self::Resolved { raster, .. } => Ok(Arc::clone(raster)),
            Self::Unresolved(path) => {
                let raster = Arc::new(decode_raster(path)?);
                let (w, h) = raster.dimensions();
                debug!("Resolved {} ({w}x{h})", path.display());
                *self = Self::Resolved {
                    raster: Arc::clone(&raster),
                    path: Some(std::mem::take(path)),
                };
                Ok(raster)
            }
        }
    }

    /// True unless unbound.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        !matches!(self, Self::Unbound)
    }

    /// The bound raster or pending path.
    #[must_use]
    pub fn source(&self) -> Option<BoundSource<'_>> {
        match self {
            Self::Unbound => None,
            Self::Unresolved(path) => Some(BoundSource::Path(path)),
            Self::Resolved { raster, .. } => Some(BoundSource::Raster(raster)),
        }
    }

    /// Path of the bound image, if it was bound from disk.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Unbound => None,
            Self::Unresolved(path) => Some(path),
            Self::Resolved { path, .. } => path.as_deref(),
        }
    }

    /// Drops the current binding.
    pub fn reset(&mut self) {
        *self = Self::Unbound;
    }
}
