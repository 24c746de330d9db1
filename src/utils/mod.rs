#[cfg(all(test, unix))]
pub(crate) mod fake_program;
pub mod logging;

pub use logging::{init_console, init_with_run_log, progress_bars};
