use anyhow::{Context, Result};
use indicatif::MultiProgress;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Every terminal progress bar is drawn through this set, so console log
/// lines can clear the bars before printing and redraw them afterwards.
pub fn progress_bars() -> &'static MultiProgress {
    static BARS: OnceLock<MultiProgress> = OnceLock::new();
    BARS.get_or_init(MultiProgress::new)
}

/// Stderr writer that suspends the progress bars while a line is written.
#[derive(Debug, Clone, Copy, Default)]
struct ConsoleWriter;

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        progress_bars().suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        progress_bars().suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Console-only logging on stderr.
pub fn init_console() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(|| ConsoleWriter)
        .init();
}

/// `ocr_processing_<YYYYMMDD_HHMMSS>.log` (UTC) inside `dir`.
pub fn run_log_path(dir: &Path, now: chrono::DateTime<chrono::Utc>) -> PathBuf {
    dir.join(format!("ocr_processing_{}.log", now.format("%Y%m%d_%H%M%S")))
}

/// Console logging plus an append-only run log file.
///
/// Returns the path of the log file.
pub fn init_with_run_log(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {:?}", dir))?;

    let path = run_log_path(dir, chrono::Utc::now());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open run log: {:?}", path))?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(|| ConsoleWriter))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install logging")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_log_name_has_utc_suffix() {
        let now = chrono::Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            run_log_path(Path::new("logs"), now),
            PathBuf::from("logs/ocr_processing_20250102_030405.log")
        );
    }

    #[test]
    fn test_console_writer_passes_bytes_through() {
        let mut writer = ConsoleWriter;
        writer.write_all(b"").unwrap();
        assert_eq!(writer.write(b"").unwrap(), 0);
        writer.flush().unwrap();
    }
}
