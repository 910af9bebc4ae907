//! Tone curve and local contrast.

use image::RgbImage;

use super::config::clamp_u8;
use super::filters::luma;
use super::{clamp_strength, EnhancementConfig, Enhancer};
use crate::domain::Result;

/// Global gamma curve.
///
/// Strength in `[-1, 1]`: positive lightens (γ = 1 − 0.5·s, down to 0.5),
/// negative darkens (γ = 1 − s, up to 2.0).
#[derive(Debug, Clone, Copy)]
pub struct GammaAdjust {
    strength: f32,
}

impl GammaAdjust {
    /// Creates the enhancer; `strength` is clamped to `[-1, 1]`.
    #[must_use]
    pub fn new(strength: f32) -> Self {
        Self {
            strength: clamp_strength(strength, -1.0, 1.0),
        }
    }

    /// Effective strength.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// The gamma exponent applied to normalised intensities.
    #[must_use]
    pub fn gamma(&self) -> f32 {
        if self.strength >= 0.0 {
            1.0 - 0.5 * self.strength
        } else {
            1.0 - self.strength
        }
    }

    fn lut(&self) -> [u8; 256] {
        let gamma = self.gamma();
        let mut table = [0u8; 256];
        for (i, entry) in (0u8..=255).zip(table.iter_mut()) {
            *entry = clamp_u8(255.0 * (f32::from(i) / 255.0).powf(gamma));
        }
        table
    }
}

impl Default for GammaAdjust {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl Enhancer for GammaAdjust {
    fn name(&self) -> &'static str {
        "gamma"
    }

    fn apply(&self, working: &RgbImage, _config: &EnhancementConfig) -> Result<RgbImage> {
        let table = self.lut();
        let mut out = working.clone();
        for value in out.iter_mut() {
            *value = table[usize::from(*value)];
        }
        Ok(out)
    }
}

/// Number of CLAHE tiles along each axis.
const CLAHE_GRID: u32 = 8;

/// Contrast-limited adaptive histogram equalisation on luma.
///
/// Strength in `[0.3, 2.0]`; the clip limit is `2 * strength`. Colour
/// images are shifted channel-wise by the luma change.
#[derive(Debug, Clone, Copy)]
pub struct Clahe {
    strength: f32,
}

impl Clahe {
    /// Creates the enhancer; `strength` is clamped to `[0.3, 2.0]`.
    #[must_use]
    pub fn new(strength: f32) -> Self {
        Self {
            strength: clamp_strength(strength, 0.3, 2.0),
        }
    }

    /// Effective strength.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Default for Clahe {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Enhancer for Clahe {
    fn name(&self) -> &'static str {
        "clahe"
    }

    fn apply(&self, working: &RgbImage, config: &EnhancementConfig) -> Result<RgbImage> {
        let (w, h) = working.dimensions();
        let y: Vec<u8> = luma(working, config.color_space)
            .into_iter()
            .map(clamp_u8)
            .collect();
        let equalised = equalise(&y, w, h, 2.0 * self.strength);

        let mut out = working.clone();
        for ((px, before), after) in out.pixels_mut().zip(&y).zip(&equalised) {
            let shift = f32::from(*after) - f32::from(*before);
            for c in &mut px.0 {
                *c = clamp_u8(f32::from(*c) + shift);
            }
        }
        Ok(out)
    }
}

/// Per-tile lookup tables of a `CLAHE_GRID` tiling.
struct TileLuts {
    tile_w: u32,
    tile_h: u32,
    cols: u32,
    rows: u32,
    luts: Vec<[u8; 256]>,
}

impl TileLuts {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn build(plane: &[u8], w: u32, h: u32, clip_limit: f32) -> Self {
        let tile_w = w.div_ceil(CLAHE_GRID).max(1);
        let tile_h = h.div_ceil(CLAHE_GRID).max(1);
        let cols = w.div_ceil(tile_w);
        let rows = h.div_ceil(tile_h);

        let mut luts = Vec::with_capacity((cols * rows) as usize);
        for ty in 0..rows {
            for tx in 0..cols {
                let mut hist = [0u32; 256];
                let x_end = ((tx + 1) * tile_w).min(w);
                let y_end = ((ty + 1) * tile_h).min(h);
                for y in ty * tile_h..y_end {
                    let row = (y * w) as usize;
                    for x in tx * tile_w..x_end {
                        hist[usize::from(plane[row + x as usize])] += 1;
                    }
                }
                let area = (x_end - tx * tile_w) * (y_end - ty * tile_h);
                let limit = ((clip_limit * area as f32 / 256.0) as u32).max(1);
                luts.push(clipped_cdf(&mut hist, area, limit));
            }
        }

        Self {
            tile_w,
            tile_h,
            cols,
            rows,
            luts,
        }
    }

    fn lut(&self, tx: u32, ty: u32) -> &[u8; 256] {
        &self.luts[(ty * self.cols + tx) as usize]
    }
}

/// Clips the histogram at `limit`, spreads the excess evenly and returns the
/// scaled cumulative distribution.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn clipped_cdf(hist: &mut [u32; 256], area: u32, limit: u32) -> [u8; 256] {
    let mut excess = 0;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    let share = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += share + u32::from(i < remainder);
    }

    let scale = 255.0 / area.max(1) as f32;
    let mut lut = [0u8; 256];
    let mut cumulative = 0u32;
    for (entry, bin) in lut.iter_mut().zip(hist.iter()) {
        cumulative += bin;
        *entry = clamp_u8(cumulative as f32 * scale);
    }
    lut
}

/// Equalises a single-channel plane, interpolating bilinearly between the
/// lookup tables of the four nearest tile centres.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]
fn equalise(plane: &[u8], w: u32, h: u32, clip_limit: f32) -> Vec<u8> {
    if plane.is_empty() {
        return Vec::new();
    }
    let tiles = TileLuts::build(plane, w, h, clip_limit);

    let axis = |pos: u32, size: u32, count: u32| -> (u32, u32, f32) {
        let f = (pos as f32 + 0.5) / size as f32 - 0.5;
        let lo = f.floor().max(0.0) as u32;
        let lo = lo.min(count - 1);
        let hi = (lo + 1).min(count - 1);
        let t = (f - lo as f32).clamp(0.0, 1.0);
        (lo, hi, t)
    };

    let mut out = Vec::with_capacity(plane.len());
    for y in 0..h {
        let (ty0, ty1, fy) = axis(y, tiles.tile_h, tiles.rows);
        for x in 0..w {
            let (tx0, tx1, fx) = axis(x, tiles.tile_w, tiles.cols);
            let v = usize::from(plane[(y * w + x) as usize]);
            let top = f32::from(tiles.lut(tx0, ty0)[v]) * (1.0 - fx)
                + f32::from(tiles.lut(tx1, ty0)[v]) * fx;
            let bottom = f32::from(tiles.lut(tx0, ty1)[v]) * (1.0 - fx)
                + f32::from(tiles.lut(tx1, ty1)[v]) * fx;
            out.push(clamp_u8(top * (1.0 - fy) + bottom * fy));
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_mapping() {
        assert!((GammaAdjust::new(1.0).gamma() - 0.5).abs() < f32::EPSILON);
        assert!((GammaAdjust::new(-1.0).gamma() - 2.0).abs() < f32::EPSILON);
        assert!((GammaAdjust::new(0.0).gamma() - 1.0).abs() < f32::EPSILON);
        assert!((GammaAdjust::new(4.0).strength() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_gamma_direction() {
        let mid = RgbImage::from_pixel(2, 2, image::Rgb([128, 128, 128]));
        let config = EnhancementConfig::default();

        let lighter = GammaAdjust::new(0.5).apply(&mid, &config).expect("gamma");
        let darker = GammaAdjust::new(-0.5).apply(&mid, &config).expect("gamma");
        assert!(lighter.get_pixel(0, 0).0[0] > 128);
        assert!(darker.get_pixel(0, 0).0[0] < 128);
    }

    #[test]
    fn test_gamma_keeps_extremes() {
        let lut = GammaAdjust::new(0.7).lut();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn test_clahe_stretches_low_contrast() {
        let image = RgbImage::from_fn(64, 64, |x, y| {
            let v = 100 + ((x + y) % 20) as u8;
            image::Rgb([v, v, v])
        });
        let out = Clahe::default()
            .apply(&image, &EnhancementConfig::default())
            .expect("clahe");

        let range = |img: &RgbImage| {
            let (lo, hi) = img
                .pixels()
                .fold((255u8, 0u8), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
            hi - lo
        };
        assert!(range(&out) > range(&image));
    }

    #[test]
    fn test_clahe_handles_tiny_images() {
        let image = RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let out = Clahe::new(0.3)
            .apply(&image, &EnhancementConfig::default())
            .expect("clahe");
        assert_eq!(out.dimensions(), (3, 2));
    }

    #[test]
    fn test_clipped_cdf_is_monotonic() {
        let mut hist = [0u32; 256];
        hist[10] = 900;
        hist[200] = 100;
        let lut = clipped_cdf(&mut hist, 1000, 8);
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(lut[255], 255);
    }
}
