use std::fmt;
use tracing::info;

/// Success and failure counts for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, ok: bool) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Emit the two summary lines.
    pub fn log(&self) {
        info!("succeeded: {}", self.succeeded);
        info!("failed: {}", self.failed);
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "succeeded: {}", self.succeeded)?;
        write!(f, "failed: {}", self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_display() {
        let mut summary = RunSummary::default();
        summary.record(true);
        summary.record(false);
        summary.record(true);

        assert_eq!(summary, RunSummary { succeeded: 2, failed: 1 });
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.to_string(), "succeeded: 2\nfailed: 1");
    }
}
