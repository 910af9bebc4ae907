//! Pixel-level helpers shared by the enhancers.

use image::RgbImage;
use imageproc::filter::gaussian_blur_f32;

use super::config::clamp_u8;
use crate::domain::{reflect_101, ChannelOrder};

/// Convolves every channel with a 3×3 row-major kernel.
///
/// Borders are mirrored without repeating the edge; results saturate to `0..=255`.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(crate) fn convolve3x3(image: &RgbImage, kernel: &[f32; 9]) -> RgbImage {
    let (w, h) = image.dimensions();
    let (wi, hi) = (i64::from(w), i64::from(h));

    RgbImage::from_fn(w, h, |x, y| {
        let mut acc = [0.0f32; 3];
        for (k, weight) in kernel.iter().enumerate() {
            if *weight == 0.0 {
                continue;
            }
            let sx = reflect_101(i64::from(x) + (k % 3) as i64 - 1, wi) as u32;
            let sy = reflect_101(i64::from(y) + (k / 3) as i64 - 1, hi) as u32;
            let px = image.get_pixel(sx, sy).0;
            for (a, v) in acc.iter_mut().zip(px) {
                *a += weight * f32::from(v);
            }
        }
        image::Rgb(acc.map(clamp_u8))
    })
}

/// Unsharp mask: `(1 + amount) * image - amount * blur(image, sigma)`.
pub(crate) fn unsharp(image: &RgbImage, sigma: f32, amount: f32) -> RgbImage {
    let blurred = gaussian_blur_f32(image, sigma);
    blend(image, &blurred, 1.0 + amount, -amount)
}

/// Per-subpixel `a * wa + b * wb`, saturating.
pub(crate) fn blend(a: &RgbImage, b: &RgbImage, wa: f32, wb: f32) -> RgbImage {
    let mut out = a.clone();
    for ((o, va), vb) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
        *o = clamp_u8(f32::from(*va) * wa + f32::from(*vb) * wb);
    }
    out
}

/// BT.601 luma of every pixel, as floats on the 0-255 scale.
pub(crate) fn luma(image: &RgbImage, order: ChannelOrder) -> Vec<f32> {
    image
        .pixels()
        .map(|px| {
            let [c0, g, c2] = px.0.map(f32::from);
            let (r, b) = match order {
                ChannelOrder::Rgb => (c0, c2),
                ChannelOrder::Bgr => (c2, c0),
            };
            0.299 * r + 0.587 * g + 0.114 * b
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_kernel() {
        let image = RgbImage::from_fn(5, 4, |x, y| image::Rgb([(x * 40) as u8, (y * 50) as u8, 7]));
        let identity = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(convolve3x3(&image, &identity), image);
    }

    #[test]
    fn test_convolution_saturates() {
        let image = RgbImage::from_pixel(3, 3, image::Rgb([200, 200, 200]));
        let doubled = [0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0];
        assert!(convolve3x3(&image, &doubled).iter().all(|v| *v == 255));
    }

    #[test]
    fn test_unsharp_keeps_flat_regions() {
        let image = RgbImage::from_pixel(9, 9, image::Rgb([90, 120, 30]));
        let out = unsharp(&image, 1.0, 0.8);
        for (o, i) in out.iter().zip(image.iter()) {
            assert!(o.abs_diff(*i) <= 1, "{o} vs {i}");
        }
    }

    #[test]
    fn test_luma_respects_order() {
        let image = RgbImage::from_pixel(1, 1, image::Rgb([255, 0, 0]));
        assert!((luma(&image, ChannelOrder::Rgb)[0] - 76.245).abs() < 1e-3);
        assert!((luma(&image, ChannelOrder::Bgr)[0] - 29.07).abs() < 1e-3);
    }
}
