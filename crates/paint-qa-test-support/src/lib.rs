//! Test helpers for paint-qa.
//!
//! Synthetic panels with known metric behaviour and in-memory port
//! implementations for driving the batch pipeline.
//!
//! ```
//! use paint_qa_test_support::{MockImageSource, SyntheticImageBuilder};
//!
//! let sharp = SyntheticImageBuilder::checkerboard(128, 128, 8);
//! let soft = SyntheticImageBuilder::blurred_checkerboard(128, 128, 8, 3.0);
//! let source = MockImageSource::new(vec![sharp, soft]).with_failure("unreadable");
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{MockImageSource, MockProgressSink, MockResultOutput};
