//! Where analysis results go.

use crate::domain::AnalysisResult;

/// Receives one [`AnalysisResult`] per analyzed image.
pub trait ResultOutput: Send + Sync {
    /// Records a result. Implementations may buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be serialized or written.
    fn write(&self, result: &AnalysisResult) -> anyhow::Result<()>;

    /// Writes out anything buffered. Called once at the end of a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
