use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use tracing::info;

use super::summary::RunSummary;
use crate::utils::progress_bars;

/// Receives per-unit progress. Implementations only observe; they cannot
/// influence the run.
pub trait ProgressObserver {
    fn started(&mut self, total: usize);

    /// Called after every unit with its 1-based position.
    fn unit_done(&mut self, index: usize, name: &str, ok: bool);

    fn finished(&mut self, summary: &RunSummary);
}

/// Progress written to the tracing log
#[derive(Debug, Default)]
pub struct LogProgress {
    total: usize,
}

impl ProgressObserver for LogProgress {
    fn started(&mut self, total: usize) {
        self.total = total;
    }

    fn unit_done(&mut self, index: usize, name: &str, ok: bool) {
        let status = if ok { "done" } else { "failed" };
        info!("[{}/{}] {} {}", index, self.total, name, status);
    }

    fn finished(&mut self, summary: &RunSummary) {
        info!("{} of {} units succeeded", summary.succeeded, summary.total());
    }
}

/// Terminal progress bar
pub struct BarProgress {
    label: String,
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressObserver for BarProgress {
    fn started(&mut self, total: usize) {
        let style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        self.bar = progress_bars().add(ProgressBar::new(total as u64));
        self.bar.set_style(style);
        self.bar.set_prefix(self.label.clone());
    }

    fn unit_done(&mut self, index: usize, name: &str, _ok: bool) {
        self.bar.set_position(index as u64);
        self.bar.set_message(name.to_string());
    }

    fn finished(&mut self, summary: &RunSummary) {
        self.bar.finish_with_message(format!(
            "{} succeeded, {} failed",
            summary.succeeded, summary.failed
        ));
    }
}

/// A bar when stderr is a terminal, log lines otherwise.
pub fn console_progress(label: &str) -> Box<dyn ProgressObserver> {
    if std::io::stderr().is_terminal() {
        Box::new(BarProgress::new(label))
    } else {
        Box::new(LogProgress::default())
    }
}
