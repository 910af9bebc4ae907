//! Noise reduction.

use image::RgbImage;
use imageproc::filter::median_filter;

use super::config::clamp_u8;
use super::{clamp_strength, EnhancementConfig, Enhancer};
use crate::domain::{reflect_101, Result};

/// Largest bilateral window radius.
const MAX_BILATERAL_RADIUS: i64 = 5;

/// Light, edge-preserving denoising with a bilateral filter.
///
/// Strength in `[0.1, 1.0]` scales both the colour and the spatial sigma
/// (`25 * strength`).
#[derive(Debug, Clone, Copy)]
pub struct DenoiseLight {
    strength: f32,
}

impl DenoiseLight {
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

impl Default for DenoiseLight {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Enhancer for DenoiseLight {
    fn name(&self) -> &'static str {
        "denoise_light"
    }

    fn apply(&self, working: &RgbImage, _config: &EnhancementConfig) -> Result<RgbImage> {
        let sigma = 25.0 * self.strength;
        Ok(bilateral(working, sigma, sigma))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bilateral(image: &RgbImage, sigma_color: f32, sigma_space: f32) -> RgbImage {
    let radius = ((sigma_space * 1.5).round() as i64).clamp(1, MAX_BILATERAL_RADIUS);
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    let spatial: Vec<(i64, i64, f32)> = (-radius..=radius)
        .flat_map(|dy| (-radius..=radius).map(move |dx| (dx, dy)))
        .filter(|(dx, dy)| dx * dx + dy * dy <= radius * radius)
        .map(|(dx, dy)| (dx, dy, ((dx * dx + dy * dy) as f32 * space_coeff).exp()))
        .collect();

    let (w, h) = image.dimensions();
    let (wi, hi) = (i64::from(w), i64::from(h));

    RgbImage::from_fn(w, h, |x, y| {
        let centre = image.get_pixel(x, y).0.map(f32::from);
        let mut acc = [0.0f32; 3];
        let mut total = 0.0f32;
        for &(dx, dy, ws) in &spatial {
            let sx = reflect_101(i64::from(x) + dx, wi) as u32;
            let sy = reflect_101(i64::from(y) + dy, hi) as u32;
            let px = image.get_pixel(sx, sy).0.map(f32::from);
            let dist: f32 = px
                .iter()
                .zip(centre.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            let weight = ws * (dist * color_coeff).exp();
            for (a, v) in acc.iter_mut().zip(px) {
                *a += weight * v;
            }
            total += weight;
        }
        image::Rgb(acc.map(|a| clamp_u8(a / total)))
    })
}

/// Stronger denoising with a median filter.
///
/// Strength in `[0.1, 1.0]`; below 0.5 a 3×3 window is used, otherwise 5×5.
#[derive(Debug, Clone, Copy)]
pub struct DenoiseStrong {
    strength: f32,
}

impl DenoiseStrong {
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

    fn radius(&self) -> u32 {
        if self.strength < 0.5 {
            1
        } else {
            2
        }
    }
}

impl Default for DenoiseStrong {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl Enhancer for DenoiseStrong {
    fn name(&self) -> &'static str {
        "denoise_strong"
    }

    fn apply(&self, working: &RgbImage, _config: &EnhancementConfig) -> Result<RgbImage> {
        let r = self.radius();
        Ok(median_filter(working, r, r))
    }
}
