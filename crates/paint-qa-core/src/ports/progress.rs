//! Batch progress notifications.

use crate::domain::AnalysisResult;

/// Something that happened during a batch run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// An image is about to be analyzed.
    Started {
        /// Image path.
        path: String,
        /// Position in the batch, starting at 0.
        index: usize,
        /// Batch size, if known.
        total: Option<usize>,
    },
    /// An image was analyzed.
    Completed {
        /// The finished result.
        result: AnalysisResult,
    },
    /// An image could not be loaded or analyzed.
    Skipped {
        /// Image path, or a positional placeholder if the path is unknown.
        path: String,
        /// Human-readable cause.
        reason: String,
    },
    /// The batch is done.
    Finished {
        /// Images analyzed.
        processed: usize,
        /// Images skipped.
        skipped: usize,
    },
}

/// Receives [`ProgressEvent`]s.
pub trait ProgressSink: Send + Sync {
    /// Handles one event.
    fn on_event(&self, event: ProgressEvent);
}
