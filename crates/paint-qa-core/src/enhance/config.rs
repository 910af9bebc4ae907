//! Parameters shared by every enhancer.

use std::collections::BTreeMap;

use image::imageops::FilterType;
use image::{ColorType, DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::domain::{ChannelOrder, DistortionError, Result};

/// A free-form, algorithm-specific parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer parameter.
    Int(i64),
    /// Floating point parameter.
    Float(f64),
    /// Text parameter.
    Text(String),
}

/// Configuration applied around every enhancement.
///
/// Read-only during an enhancement; build a new value to change it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    /// Resize to `(width, height)` before processing.
    pub input_size: Option<(u32, u32)>,
    /// Emit 32-bit float RGB scaled to `[0, 1]` instead of 8-bit.
    pub normalize: bool,
    /// Channel order of the images handed in.
    pub color_space: ChannelOrder,
    /// Clamp output intensities to `(min, max)`, on the 0-255 scale.
    pub clip_range: Option<(f32, f32)>,
    /// Algorithm-specific extras.
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl EnhancementConfig {
    /// Checks the configuration for values no enhancement can honour.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero-sized `input_size`, an inverted or
    /// non-finite `clip_range`.
    pub fn validate(&self) -> Result<()> {
        if let Some((w, h)) = self.input_size {
            if w == 0 || h == 0 {
                return Err(DistortionError::InvalidArgument(format!(
                    "input_size must be non-zero, got {w}x{h}"
                )));
            }
        }
        if let Some((lo, hi)) = self.clip_range {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(DistortionError::InvalidArgument(format!(
                    "clip_range must be a finite (min, max) pair, got ({lo}, {hi})"
                )));
            }
        }
        Ok(())
    }

    /// Converts the input to the 8-bit working buffer, resizing if configured.
    pub(crate) fn prepare(&self, image: &DynamicImage) -> RgbImage {
        let rgb = image.to_rgb8();
        match self.input_size {
            Some((w, h)) if (w, h) != rgb.dimensions() => {
                image::imageops::resize(&rgb, w, h, FilterType::Triangle)
            }
            _ => rgb,
        }
    }

    /// Applies clipping and normalisation and restores a grayscale layout
    /// when the input had no colour.
    pub(crate) fn finish(&self, mut working: RgbImage, source: ColorType) -> DynamicImage {
        if let Some((lo, hi)) = self.clip_range {
            let lo = lo.clamp(0.0, 255.0);
            let hi = hi.clamp(0.0, 255.0);
            for value in working.iter_mut() {
                *value = clamp_u8(f32::from(*value).clamp(lo, hi));
            }
        }

        let out = DynamicImage::ImageRgb8(working);
        if self.normalize {
            return DynamicImage::ImageRgb32F(out.to_rgb32f());
        }
        if source.has_color() {
            out
        } else {
            DynamicImage::ImageLuma8(out.to_luma8())
        }
    }
}

/// Rounds and saturates to the 8-bit range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = EnhancementConfig::default();
        assert!(config.input_size.is_none());
        assert!(!config.normalize);
        assert_eq!(config.color_space, ChannelOrder::Rgb);
        assert!(config.clip_range.is_none());
        assert!(config.metadata.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_clip() {
        let config = EnhancementConfig {
            clip_range: Some((200.0, 10.0)),
            ..Default::default()
        };
        assert!(config.validate().expect_err("inverted").is_invalid_argument());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let config = EnhancementConfig {
            input_size: Some((0, 10)),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_prepare_resizes() {
        let config = EnhancementConfig {
            input_size: Some((8, 4)),
            ..Default::default()
        };
        let image = DynamicImage::ImageRgb8(RgbImage::new(16, 16));
        assert_eq!(config.prepare(&image).dimensions(), (8, 4));
    }

    #[test]
    fn test_finish_clips() {
        let config = EnhancementConfig {
            clip_range: Some((10.0, 200.0)),
            ..Default::default()
        };
        let working = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        let out = config.finish(working, ColorType::Rgb8).to_rgb8();
        assert_eq!(out.get_pixel(0, 0).0, [10, 10, 10]);
        assert_eq!(out.get_pixel(1, 0).0, [200, 200, 200]);
    }

    #[test]
    fn test_finish_normalizes_to_unit_range() {
        let config = EnhancementConfig {
            normalize: true,
            ..Default::default()
        };
        let working = RgbImage::from_pixel(1, 1, image::Rgb([255, 0, 51]));
        let out = config.finish(working, ColorType::Rgb8);

        let DynamicImage::ImageRgb32F(buf) = out else {
            panic!("expected float output");
        };
        let px = buf.get_pixel(0, 0).0;
        assert!((px[0] - 1.0).abs() < 1e-6);
        assert!(px[1].abs() < 1e-6);
        assert!((px[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_finish_keeps_grayscale() {
        let config = EnhancementConfig::default();
        let out = config.finish(RgbImage::new(3, 3), ColorType::L8);
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_metadata_from_toml() {
        let config: EnhancementConfig = toml::from_str(
            r#"
            normalize = true
            color_space = "bgr"
            clip_range = [0.0, 250.0]

            [metadata]
            tag = "panel"
            passes = 2
            "#,
        )
        .expect("valid toml");

        assert!(config.normalize);
        assert_eq!(config.color_space, ChannelOrder::Bgr);
        assert_eq!(config.clip_range, Some((0.0, 250.0)));
        assert_eq!(
            config.metadata.get("tag"),
            Some(&MetadataValue::Text("panel".into()))
        );
        assert_eq!(config.metadata.get("passes"), Some(&MetadataValue::Int(2)));
    }
}
