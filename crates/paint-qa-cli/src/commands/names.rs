//! Names command - print the metric vector layout.

use std::io::Write;

use anyhow::Result;
use paint_qa_core::DistortionAnalyzer;

/// Prints one metric name per line, in vector order.
pub fn run() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for name in DistortionAnalyzer::metrics_names() {
        writeln!(stdout, "{name}")?;
    }
    Ok(())
}
