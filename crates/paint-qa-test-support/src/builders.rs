//! Synthetic paint-panel images for tests.

use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use paint_qa_core::domain::{ImageInfo, IntensityPlane};

/// Builds synthetic images with known metric behaviour.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Flat panels ===

    /// A uniform gray panel: zero sharpness, zero variance, zero uniformity.
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> ImageInfo {
        let img = GrayImage::from_pixel(width, height, Luma([value]));
        ImageInfo::new("synthetic://uniform_gray", DynamicImage::ImageLuma8(img))
    }

    /// A fully saturated white panel: over-exposure ratio 1.0 at threshold 250.
    #[must_use]
    pub fn white(width: u32, height: u32) -> ImageInfo {
        let img = GrayImage::from_pixel(width, height, Luma([255]));
        ImageInfo::new("synthetic://white", DynamicImage::ImageLuma8(img))
    }

    /// An all-black panel: uniformity is defined as 0 rather than NaN.
    #[must_use]
    pub fn black(width: u32, height: u32) -> ImageInfo {
        let img = GrayImage::new(width, height);
        ImageInfo::new("synthetic://black", DynamicImage::ImageLuma8(img))
    }

    /// A zero-sized image.
    #[must_use]
    pub fn empty() -> ImageInfo {
        ImageInfo::new("synthetic://empty", DynamicImage::ImageLuma8(GrayImage::new(0, 0)))
    }

    /// A uniform colour panel.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, image::Rgb([r, g, b]));
        ImageInfo::new("synthetic://rgb_uniform", DynamicImage::ImageRgb8(img))
    }

    // === Texture ===

    /// A high-contrast checkerboard (very sharp edges).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> ImageInfo {
        ImageInfo::new(
            "synthetic://checkerboard",
            DynamicImage::ImageLuma8(checker(width, height, cell_size)),
        )
    }

    /// The same checkerboard after a Gaussian blur of `sigma`.
    #[must_use]
    pub fn blurred_checkerboard(width: u32, height: u32, cell_size: u32, sigma: f32) -> ImageInfo {
        let img = gaussian_blur_f32(&checker(width, height, cell_size), sigma);
        ImageInfo::new("synthetic://blurred_checkerboard", DynamicImage::ImageLuma8(img))
    }

    /// A mid-gray panel with deterministic per-pixel speckle of `±amplitude`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn speckled(width: u32, height: u32, amplitude: u8) -> ImageInfo {
        let img = GrayImage::from_fn(width, height, |x, y| {
            // cheap hash so the pattern is fixed across runs
            let h = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663);
            let offset = (h % (2 * u32::from(amplitude) + 1)) as i32 - i32::from(amplitude);
            Luma([(128 + offset).clamp(0, 255) as u8])
        });
        ImageInfo::new("synthetic://speckled", DynamicImage::ImageLuma8(img))
    }

    // === Illumination ===

    /// A left-to-right brightness falloff, from `bright` down to `dark`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn falloff(width: u32, height: u32, bright: u8, dark: u8) -> ImageInfo {
        let span = i64::from(bright) - i64::from(dark);
        let img = GrayImage::from_fn(width, height, |x, _| {
            let v = i64::from(bright) - span * i64::from(x) / i64::from(width.max(1));
            Luma([v.clamp(0, 255) as u8])
        });
        ImageInfo::new("synthetic://falloff", DynamicImage::ImageLuma8(img))
    }

    /// A panel with a saturated highlight band covering `fraction` of the rows.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn highlight_band(width: u32, height: u32, fraction: f64) -> ImageInfo {
        let rows = (f64::from(height) * fraction.clamp(0.0, 1.0)).round() as u32;
        let img = GrayImage::from_fn(width, height, |_, y| {
            if y < rows {
                Luma([255])
            } else {
                Luma([120])
            }
        });
        ImageInfo::new("synthetic://highlight_band", DynamicImage::ImageLuma8(img))
    }

    // === Planes ===

    /// A signed plane with mean 0 and non-zero spread: uniformity is `+∞`.
    #[must_use]
    pub fn zero_mean_plane(width: u32, height: u32, amplitude: f64) -> IntensityPlane {
        IntensityPlane::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                amplitude
            } else {
                -amplitude
            }
        })
    }
}

fn checker(width: u32, height: u32, cell_size: u32) -> GrayImage {
    let cell = cell_size.max(1);
    GrayImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
