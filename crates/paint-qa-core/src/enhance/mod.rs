//! Image enhancers.
//!
//! Every enhancer takes an image and an [`EnhancementConfig`] and returns a
//! new image; inputs are never modified. Enhancers work on an 8-bit RGB
//! working copy: the config resizes before the filter runs and clips,
//! normalises or restores grayscale afterwards.

mod config;
mod denoise;
mod filters;
mod sharpen;
mod tone;

use image::{DynamicImage, RgbImage};
use tracing::debug;

pub use config::{EnhancementConfig, MetadataValue};
pub use denoise::{DenoiseLight, DenoiseStrong};
pub use sharpen::{Deblur, DeblurAggressive, SharpenLight, SharpenMedium};
pub use tone::{Clahe, GammaAdjust};

use crate::domain::{DistortionError, Result};

/// An image enhancement technique.
pub trait Enhancer: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Runs the filter on the 8-bit working buffer.
    ///
    /// # Errors
    ///
    /// Implementation specific.
    fn apply(&self, working: &RgbImage, config: &EnhancementConfig) -> Result<RgbImage>;

    /// Enhances `image` under `config`.
    ///
    /// Zero-sized images are returned unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unusable config, `Enhancement` if the filter
    /// changes the working size.
    fn enhance(&self, image: &DynamicImage, config: &EnhancementConfig) -> Result<DynamicImage> {
        config.validate()?;
        if image.width() == 0 || image.height() == 0 {
            return Ok(image.clone());
        }
        let working = config.prepare(image);
        let out = run(self, &working, config)?;
        Ok(config.finish(out, image.color()))
    }
}

/// Runs one enhancer on a working buffer and checks the output shape.
pub(crate) fn run<E: Enhancer + ?Sized>(
    enhancer: &E,
    working: &RgbImage,
    config: &EnhancementConfig,
) -> Result<RgbImage> {
    let out = enhancer.apply(working, config)?;
    if out.dimensions() != working.dimensions() {
        return Err(DistortionError::Enhancement(format!(
            "{} changed the image size from {:?} to {:?}",
            enhancer.name(),
            working.dimensions(),
            out.dimensions()
        )));
    }
    debug!("Applied {}", enhancer.name());
    Ok(out)
}

/// Returns the image unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Enhancer for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn apply(&self, working: &RgbImage, _config: &EnhancementConfig) -> Result<RgbImage> {
        Ok(working.clone())
    }
}

/// Clamps a requested strength into `[lo, hi]`; NaN maps to `lo`.
pub(crate) fn clamp_strength(strength: f32, lo: f32, hi: f32) -> f32 {
    if strength.is_nan() {
        lo
    } else {
        strength.clamp(lo, hi)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 128])
        }))
    }

    fn all() -> Vec<Box<dyn Enhancer>> {
        vec![
            Box::new(Identity),
            Box::new(DenoiseLight::default()),
            Box::new(DenoiseStrong::default()),
            Box::new(SharpenLight::default()),
            Box::new(SharpenMedium::default()),
            Box::new(Deblur::default()),
            Box::new(DeblurAggressive::default()),
            Box::new(GammaAdjust::default()),
            Box::new(Clahe::default()),
        ]
    }

    #[test]
    fn test_shape_is_preserved() {
        let image = gradient(37, 21);
        let config = EnhancementConfig::default();
        for enhancer in all() {
            let out = enhancer.enhance(&image, &config).expect("enhance");
            assert_eq!(
                (out.width(), out.height()),
                (37, 21),
                "{} changed the size",
                enhancer.name()
            );
        }
    }

    #[test]
    fn test_zero_sized_image_is_returned_unchanged() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let config = EnhancementConfig::default();
        for enhancer in all() {
            let out = enhancer.enhance(&image, &config).expect("enhance");
            assert_eq!(out.width(), 0);
        }
    }

    #[test]
    fn test_input_size_is_applied() {
        let config = EnhancementConfig {
            input_size: Some((16, 8)),
            ..Default::default()
        };
        let out = SharpenLight::default()
            .enhance(&gradient(40, 40), &config)
            .expect("enhance");
        assert_eq!((out.width(), out.height()), (16, 8));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EnhancementConfig {
            clip_range: Some((10.0, 0.0)),
            ..Default::default()
        };
        let err = Identity
            .enhance(&gradient(4, 4), &config)
            .expect_err("inverted clip range");
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_clamp_strength() {
        assert!((clamp_strength(5.0, 0.1, 1.0) - 1.0).abs() < f32::EPSILON);
        assert!((clamp_strength(0.0, 0.1, 1.0) - 0.1).abs() < f32::EPSILON);
        assert!((clamp_strength(f32::NAN, 0.1, 1.0) - 0.1).abs() < f32::EPSILON);
    }
}
