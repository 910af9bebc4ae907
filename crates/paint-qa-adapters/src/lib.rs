//! Filesystem adapters for paint-qa.
//!
//! - [`FsImageSource`]: images from files and directories
//! - [`load_criteria`]: sharpness criteria from TOML files

pub mod criteria;
pub mod fs;

pub use criteria::{load_criteria, parse_criteria};
pub use fs::{load_image, FsImageSource};
