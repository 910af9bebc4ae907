//! Blur / sharpness analysis.
//!
//! Sharpness is the variance of the Laplacian of the intensity plane:
//! `Var(∇²I)`. Strong high-frequency content gives a large variance, blur
//! gives a small one. The value is not normalized for image size, so only
//! compare images of similar size and source.

use crate::domain::{
    reflect_101, variance, IntensityPlane, Metric, MetricAnalyzer, SharpnessResult,
};

/// 4-neighbour Laplacian kernel, row-major.
const LAPLACIAN: [f64; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];

/// Laplacian-variance sharpness metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplacianSharpness;

impl Metric for LaplacianSharpness {
    const NAME: &'static str = "sharpness";
    type Output = SharpnessResult;

    fn measure(&self, plane: &IntensityPlane) -> SharpnessResult {
        SharpnessResult {
            sharpness: variance(&laplacian(plane)),
        }
    }
}

/// Sharpness analyzer.
pub type BlurSharpnessAnalyzer = MetricAnalyzer<LaplacianSharpness>;

impl BlurSharpnessAnalyzer {
    /// Creates an unbound sharpness analyzer.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_metric(LaplacianSharpness)
    }
}

/// Laplacian response at every pixel, borders mirrored without repeating the edge.
#[allow(clippy::cast_possible_wrap)]
pub fn laplacian(plane: &IntensityPlane) -> Vec<f64> {
    let (w, h) = (i64::from(plane.width()), i64::from(plane.height()));
    let values = plane.values();
    let width = plane.width() as usize;

    let mut out = Vec::with_capacity(values.len());
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in LAPLACIAN.iter().enumerate() {
                if *weight == 0.0 {
                    continue;
                }
                let dx = (k % 3) as i64 - 1;
                let dy = (k / 3) as i64 - 1;
                let sx = reflect_101(x + dx, w);
                let sy = reflect_101(y + dy, h);
                acc += weight * values[sy * width + sx];
            }
            out.push(acc);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::domain::Raster;

    fn checkerboard(size: u32, cell: u32) -> image::GrayImage {
        image::GrayImage::from_fn(size, size, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                image::Luma([255u8])
            } else {
                image::Luma([0u8])
            }
        })
    }

    #[test]
    fn test_module_name() {
        assert_eq!(BlurSharpnessAnalyzer::new().name(), "sharpness");
    }

    #[test]
    fn test_uniform_image_has_zero_sharpness() {
        let mut analyzer = BlurSharpnessAnalyzer::new();
        analyzer.bind_raster(image::GrayImage::from_pixel(100, 100, image::Luma([128])));

        let result = analyzer.analyze().expect("analysis should succeed");
        assert_eq!(result.sharpness, 0.0);
    }

    #[test]
    fn test_single_impulse() {
        // One bright pixel in the middle of a 3x3 zero plane.
        let plane = IntensityPlane::from_fn(3, 3, |x, y| if x == 1 && y == 1 { 1.0 } else { 0.0 });
        let response = laplacian(&plane);

        assert_eq!(response[4], -4.0);
        // (1, 0): the mirrored row above is the centre row again.
        assert_eq!(response[1], 2.0);
        assert_eq!(response[0], 0.0);
    }

    #[test]
    fn test_reflected_border() {
        // Linear ramp: mirrored borders make the edge response non-zero,
        // interior response is zero.
        let plane = IntensityPlane::from_fn(4, 1, |x, _| f64::from(x));
        let response = laplacian(&plane);

        assert_eq!(response, vec![2.0, 0.0, 0.0, -2.0]);
    }

    #[test]
    fn test_blur_lowers_sharpness() {
        let sharp = checkerboard(64, 8);
        let blurred = imageproc::filter::gaussian_blur_f32(&sharp, 3.0);

        let mut analyzer = BlurSharpnessAnalyzer::new();
        analyzer.bind_raster(sharp);
        let sharp_score = analyzer.analyze().expect("sharp").sharpness;
        analyzer.bind_raster(blurred);
        let blurred_score = analyzer.analyze().expect("blurred").sharpness;

        assert!(
            blurred_score < sharp_score,
            "blurred {blurred_score} should be below sharp {sharp_score}"
        );
    }

    #[test]
    fn test_empty_raster() {
        let mut analyzer = BlurSharpnessAnalyzer::new();
        analyzer.bind_raster(Raster::from(image::GrayImage::new(0, 0)));
        assert_eq!(analyzer.analyze().expect("empty").sharpness, 0.0);
    }

    #[test]
    fn test_analyze_before_bind() {
        let mut analyzer = BlurSharpnessAnalyzer::new();
        let err = analyzer.analyze().expect_err("nothing bound");
        assert!(err.is_precondition());
        assert!(analyzer.result().is_none());
    }
}
