//! Rasterization of PDF pages into numbered PNG files.

mod pdftoppm;

pub use pdftoppm::{page_file_name, parse_page_number, Pdftoppm};

use std::path::{Path, PathBuf};

use crate::error::PipelineResult;

/// A page rasterizer, created once per run.
pub trait PageRenderer {
    /// Render every page of `pdf` into `output_dir` as `page_0001.png`,
    /// `page_0002.png`, ... and return the written files in page order.
    fn render(&mut self, pdf: &Path, output_dir: &Path) -> PipelineResult<Vec<PathBuf>>;

    fn name(&self) -> &str;
}
