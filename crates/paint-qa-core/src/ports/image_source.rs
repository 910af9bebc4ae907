//! Where images to analyze come from.

use crate::domain::ImageInfo;

/// Supplies decoded images for a batch run.
pub trait ImageSource: Send + Sync {
    /// Iterates over the images of this source, decoding lazily.
    ///
    /// # Errors
    ///
    /// An item is an error when that image cannot be read or decoded; the
    /// remaining items are still yielded.
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<ImageInfo>> + Send + '_>;

    /// Number of images the iterator will yield, if known up front.
    fn count_hint(&self) -> Option<usize>;
}
