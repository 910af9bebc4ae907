//! Batch progress on stderr, as an indicatif bar or one line per panel.

use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use paint_qa_core::{AnalysisResult, ProgressEvent, ProgressSink};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

enum Mode {
    Silent,
    Bar(ProgressBar),
    Lines,
}

/// Reports batch progress and flags low-quality panels.
pub struct BatchProgress {
    mode: Mode,
    low_quality: AtomicUsize,
}

impl BatchProgress {
    /// `quiet` silences everything, including skip warnings. Otherwise
    /// `show_bar` picks the bar over per-panel metric lines.
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        let mode = match (quiet, show_bar) {
            (true, _) => Mode::Silent,
            (false, true) => Mode::Bar(bar(total)),
            (false, false) => Mode::Lines,
        };
        Self {
            mode,
            low_quality: AtomicUsize::new(0),
        }
    }

    fn completed(&self, result: &AnalysisResult) {
        let flagged = result.plan.as_ref().filter(|p| p.is_low_quality());
        if flagged.is_some() {
            self.low_quality.fetch_add(1, Ordering::Relaxed);
        }

        match &self.mode {
            Mode::Silent => {}
            Mode::Bar(bar) => bar.inc(1),
            Mode::Lines => {
                eprintln!("{}", metrics_line(result));
                if let Some(plan) = flagged {
                    eprintln!("{}: low quality ({})", result.path, plan.sharpness_level);
                }
            }
        }
    }
}

fn bar(total: Option<u64>) -> ProgressBar {
    let bar = total.map_or_else(ProgressBar::new_spinner, ProgressBar::new);
    if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

/// `path: sharpness=… | noise_variance=… | …`
fn metrics_line(result: &AnalysisResult) -> String {
    format!("{}: {}", result.path, result.metrics)
}

fn finish_message(processed: usize, skipped: usize, low_quality: usize) -> String {
    if low_quality == 0 {
        format!("Done: {processed} analyzed, {skipped} skipped")
    } else {
        format!("Done: {processed} analyzed, {skipped} skipped, {low_quality} low quality")
    }
}

impl ProgressSink for BatchProgress {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { path, index, total } => {
                if let Mode::Bar(bar) = &self.mode {
                    if let Some(total) = total {
                        bar.set_length(total as u64);
                    }
                    bar.set_position(index as u64);
                    bar.set_message(path);
                }
            }
            ProgressEvent::Completed { result } => self.completed(&result),
            ProgressEvent::Skipped { path, reason } => match &self.mode {
                Mode::Silent => {}
                Mode::Bar(bar) => {
                    bar.inc(1);
                    bar.suspend(|| eprintln!("WARN: Skipping {path}: {reason}"));
                }
                Mode::Lines => eprintln!("WARN: Skipping {path}: {reason}"),
            },
            ProgressEvent::Finished { processed, skipped } => {
                if let Mode::Bar(bar) = &self.mode {
                    let low_quality = self.low_quality.load(Ordering::Relaxed);
                    bar.finish_with_message(finish_message(processed, skipped, low_quality));
                }
            }
        }
    }
}
