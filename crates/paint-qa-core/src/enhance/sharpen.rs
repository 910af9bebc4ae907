//! Sharpening and deblurring.
//!
//! Unsharp masks for mild blur, an un-normalised Laplacian boost kernel for
//! stronger blur. The deblur kernels sum to `1 + s` (or `1 + 2s`), so they
//! brighten flat regions as well as boosting edges.

use image::RgbImage;

use super::filters::{convolve3x3, unsharp};
use super::{clamp_strength, EnhancementConfig, Enhancer};
use crate::domain::Result;

fn boost_kernel(centre: f32) -> [f32; 9] {
    [0.0, -1.0, 0.0, -1.0, centre, -1.0, 0.0, -1.0, 0.0]
}

/// Unsharp mask with σ = 1.0. Strength in `[0.1, 1.0]`.
#[derive(Debug, Clone, Copy)]
pub struct SharpenLight {
    strength: f32,
}

impl SharpenLight {
    /// Creates the enhancer; `strength` is clamped to `[0.1, 1.0]`.
    #[must_use]
    pub fn new(strength: f32) -> Self {
        Self {
            strength: clamp_strength(strength, 0.1, 1.0),
        }
    }

    /// Effective strength.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Default for SharpenLight {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Enhancer for SharpenLight {
    fn name(&self) -> &'static str {
        "sharpen_light"
    }

    fn apply(&self, working: &RgbImage, _config: &EnhancementConfig) -> Result<RgbImage> {
        Ok(unsharp(working, 1.0, self.strength))
    }
}

/// Unsharp mask with σ = 1.5. Strength in `[0.1, 1.5]`.
#[derive(Debug, Clone, Copy)]
pub struct SharpenMedium {
    strength: f32,
}

impl SharpenMedium {
    /// Creates the enhancer; `strength` is clamped to `[0.1, 1.5]`.
    #[must_use]
    pub fn new(strength: f32) -> Self {
        Self {
            strength: clamp_strength(strength, 0.1, 1.5),
        }
    }

    /// Effective strength.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Default for SharpenMedium {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl Enhancer for SharpenMedium {
    fn name(&self) -> &'static str {
        "sharpen_medium"
    }

    fn apply(&self, working: &RgbImage, _config: &EnhancementConfig) -> Result<RgbImage> {
        Ok(unsharp(working, 1.5, self.strength))
    }
}

/// Laplacian boost with centre weight `5 + s`. Strength in `[0.1, 1.0]`.
#[derive(Debug, Clone, Copy)]
pub struct Deblur {
    strength: f32,
}

impl Deblur {
    /// Creates the enhancer; `strength` is clamped to `[0.1, 1.0]`.
    #[must_use]
    pub fn new(strength: f32) -> Self {
        Self {
            strength: clamp_strength(strength, 0.1, 1.0),
        }
    }

    /// Effective strength.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Default for Deblur {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl Enhancer for Deblur {
    fn name(&self) -> &'static str {
        "deblur"
    }

    fn apply(&self, working: &RgbImage, _config: &EnhancementConfig) -> Result<RgbImage> {
        Ok(convolve3x3(working, &boost_kernel(5.0 + self.strength)))
    }
}

/// Laplacian boost with centre weight `5 + 2s`. Strength in `[0.5, 2.0]`.
///
/// May introduce ringing and clipping.
#[derive(Debug, Clone, Copy)]
pub struct DeblurAggressive {
    strength: f32,
}

impl DeblurAggressive {
    /// Creates the enhancer; `strength` is clamped to `[0.5, 2.0]`.
    #[must_use]
    pub fn new(strength: f32) -> Self {
        Self {
            strength: clamp_strength(strength, 0.5, 2.0),
        }
    }

    /// Effective strength.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Default for DeblurAggressive {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Enhancer for DeblurAggressive {
    fn name(&self) -> &'static str {
        "deblur_aggressive"
    }

    fn apply(&self, working: &RgbImage, _config: &EnhancementConfig) -> Result<RgbImage> {
        Ok(convolve3x3(working, &boost_kernel(5.0 + 2.0 * self.strength)))
    }
}
