use chrono::{DateTime, Utc};
use std::env;

const SEPARATOR_WIDTH: usize = 50;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Recognized text for one image plus the provenance written in its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrResult {
    pub source_name: String,
    pub processed_at: DateTime<Utc>,
    pub operator: String,
    pub lines: Vec<String>,
}

impl OcrResult {
    pub fn new(
        source_name: impl Into<String>,
        operator: impl Into<String>,
        lines: Vec<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            processed_at: Utc::now(),
            operator: operator.into(),
            lines,
        }
    }

    /// Text artifact: four header lines, a blank line, then one line per
    /// recognized line, each newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Source Image: {}\n", self.source_name));
        out.push_str(&format!(
            "Processing Date (UTC): {}\n",
            self.processed_at.format(TIMESTAMP_FORMAT)
        ));
        out.push_str(&format!("Processed by: {}\n", self.operator));
        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push_str("\n\n");

        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Name of the user running the process, as reported by the environment.
pub fn operator_identity() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
