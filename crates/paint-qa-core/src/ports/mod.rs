//! Boundaries between the analysis core and the outside world.
//!
//! Adapters implement these traits: the filesystem feeds images in,
//! serialisers and progress displays consume what comes out.

mod image_source;
mod progress;
mod result_output;

pub use image_source::ImageSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
