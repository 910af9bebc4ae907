//! In-memory rasters and their single-channel intensity planes.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use super::error::{DistortionError, Result};

/// BT.601 luma weights, in R, G, B order.
const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Channel order of three- and four-channel image data.
///
/// Only used for the luma conversion. Decoded files are always RGB; callers
/// handing in BGR buffers must say so, the order is never auto-detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Blue, green, red.
    Bgr,
}

/// A decoded raster bound for analysis.
#[derive(Debug, Clone)]
pub enum Raster {
    /// A decoded image of any supported pixel layout.
    Image {
        /// Pixel data.
        image: DynamicImage,
        /// How colour channels are laid out.
        order: ChannelOrder,
    },
    /// A single-channel floating point plane. Values may be negative.
    Plane(IntensityPlane),
}

impl Raster {
    /// Wraps an image whose colour channels are in RGB order.
    #[must_use]
    pub const fn rgb(image: DynamicImage) -> Self {
        Self::Image {
            image,
            order: ChannelOrder::Rgb,
        }
    }

    /// Wraps an image whose colour channels are in BGR order.
    #[must_use]
    pub const fn bgr(image: DynamicImage) -> Self {
        Self::Image {
            image,
            order: ChannelOrder::Bgr,
        }
    }

    /// Wraps an image decoded from a file.
    ///
    /// File data is always brought to 8-bit RGB first, whatever its stored
    /// depth, so thresholds and variances stay on the 0-255 scale.
    #[must_use]
    pub fn from_decoded(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(_) => Self::rgb(image),
            other => Self::rgb(DynamicImage::ImageRgb8(other.to_rgb8())),
        }
    }

    /// Width and height in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Image { image, .. } => image.dimensions(),
            Self::Plane(plane) => (plane.width, plane.height),
        }
    }

    /// Returns the wrapped image, if this raster holds one.
    #[must_use]
    pub const fn as_image(&self) -> Option<&DynamicImage> {
        match self {
            Self::Image { image, .. } => Some(image),
            Self::Plane(_) => None,
        }
    }

    /// Converts to a single intensity channel.
    ///
    /// Single-channel data passes through unchanged. Colour data goes through
    /// BT.601 luma; integer layouts are rounded to whole intensities like an
    /// 8/16-bit grayscale conversion would, float layouts are not.
    #[must_use]
    pub fn to_intensity(&self) -> IntensityPlane {
        match self {
            Self::Plane(plane) => plane.clone(),
            Self::Image { image, order } => image_intensity(image, *order),
        }
    }
}

impl From<DynamicImage> for Raster {
    fn from(image: DynamicImage) -> Self {
        Self::rgb(image)
    }
}

impl From<image::GrayImage> for Raster {
    fn from(image: image::GrayImage) -> Self {
        Self::rgb(DynamicImage::ImageLuma8(image))
    }
}

impl From<image::RgbImage> for Raster {
    fn from(image: image::RgbImage) -> Self {
        Self::rgb(DynamicImage::ImageRgb8(image))
    }
}

impl From<IntensityPlane> for Raster {
    fn from(plane: IntensityPlane) -> Self {
        Self::Plane(plane)
    }
}

/// Decodes an image file as a colour (RGB, 8-bit) raster.
///
/// # Errors
///
/// `NotFound` if the path does not exist, `Decode` if it is not a readable image.
pub fn decode_raster(path: &Path) -> Result<Raster> {
    decode_image(path).map(Raster::from_decoded)
}

/// Decodes an image file in its native pixel layout.
///
/// # Errors
///
/// `NotFound` if the path does not exist, `Decode` if it is not a readable image.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    debug!("Decoding {}", path.display());
    image::open(path).map_err(|source| match source {
        image::ImageError::IoError(ref e) if e.kind() == std::io::ErrorKind::NotFound => {
            DistortionError::NotFound {
                path: path.to_path_buf(),
            }
        }
        source => DistortionError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn image_intensity(image: &DynamicImage, order: ChannelOrder) -> IntensityPlane {
    let (width, height) = image.dimensions();
    match image {
        DynamicImage::ImageLuma8(buf) => from_channels(width, height, buf.as_raw(), 1, order, true),
        DynamicImage::ImageLumaA8(buf) => from_channels(width, height, buf.as_raw(), 2, order, true),
        DynamicImage::ImageRgb8(buf) => from_channels(width, height, buf.as_raw(), 3, order, true),
        DynamicImage::ImageRgba8(buf) => from_channels(width, height, buf.as_raw(), 4, order, true),
        DynamicImage::ImageLuma16(buf) => from_channels(width, height, buf.as_raw(), 1, order, true),
        DynamicImage::ImageLumaA16(buf) => from_channels(width, height, buf.as_raw(), 2, order, true),
        DynamicImage::ImageRgb16(buf) => from_channels(width, height, buf.as_raw(), 3, order, true),
        DynamicImage::ImageRgba16(buf) => from_channels(width, height, buf.as_raw(), 4, order, true),
        DynamicImage::ImageRgb32F(buf) => from_channels(width, height, buf.as_raw(), 3, order, false),
        DynamicImage::ImageRgba32F(buf) => {
            from_channels(width, height, buf.as_raw(), 4, order, false)
        }
        other => from_channels(width, height, other.to_rgb32f().as_raw(), 3, order, false),
    }
}

fn from_channels<T>(
    width: u32,
    height: u32,
    raw: &[T],
    channels: usize,
    order: ChannelOrder,
    round: bool,
) -> IntensityPlane
where
    T: Copy + Into<f64>,
{
    let data = raw
        .chunks_exact(channels)
        .map(|px| {
            if channels < 3 {
                return px[0].into();
            }
            let (r, b) = match order {
                ChannelOrder::Rgb => (px[0].into(), px[2].into()),
                ChannelOrder::Bgr => (px[2].into(), px[0].into()),
            };
            let g: f64 = px[1].into();
            let y = LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b;
            if round {
                y.round()
            } else {
                y
            }
        })
        .collect();
    IntensityPlane {
        width,
        height,
        data,
    }
}

/// A row-major single-channel grid of intensities.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityPlane {
    width: u32,
    height: u32,
    data: Vec<f64>,
}

impl IntensityPlane {
    /// Builds a plane from row-major values.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `data.len() != width * height`.
    pub fn new(width: u32, height: u32, data: Vec<f64>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(DistortionError::InvalidArgument(format!(
                "plane of {width}x{height} needs {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a plane by evaluating `f(x, y)` for every pixel.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f64) -> Self {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Plane width.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Plane height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Value at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the plane holds no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mean intensity, 0 for an empty plane.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> f64 {
        mean(&self.data)
    }

    /// Population variance of the intensities, 0 for an empty plane.
    #[must_use]
    pub fn variance(&self) -> f64 {
        variance(&self.data)
    }

    /// Population standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64
}

/// Mirrors an out-of-range index back into `0..n` without repeating the edge
/// sample (`dcb|abcd|cba` style).
pub(crate) fn reflect_101(index: i64, n: i64) -> usize {
    if n <= 1 {
        return 0;
    }
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= n {
            i = 2 * n - 2 - i;
        } else {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            return i as usize;
        }
    }
}
