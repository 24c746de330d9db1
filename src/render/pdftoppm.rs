use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

use super::PageRenderer;
use crate::error::{PipelineError, PipelineResult};

/// Scratch folder inside the per-PDF folder that receives raw output.
const STAGING_DIR: &str = ".pdftoppm";
/// pdftoppm appends `-<n>.png` (zero padded to the page count) to this root.
const RAW_ROOT: &str = "page";

/// `page_0001.png` style name for a 1-based page number.
pub fn page_file_name(page: u32) -> String {
    format!("page_{page:04}.png")
}

/// Page number of a raw pdftoppm file name such as `page-07.png`.
pub fn parse_page_number(name: &str) -> Option<u32> {
    name.strip_prefix(RAW_ROOT)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// Renders pages with Poppler's `pdftoppm`, one process per PDF.
///
/// Requires poppler-utils on PATH.
/// - Linux: sudo apt-get install poppler-utils
/// - Mac: brew install poppler
/// - Windows: https://github.com/oschwartz10612/poppler-windows/releases/
#[derive(Debug, Clone)]
pub struct Pdftoppm {
    program: String,
    dpi: u32,
}

impl Pdftoppm {
    pub fn new(dpi: u32) -> Self {
        Self::with_program("pdftoppm", dpi)
    }

    pub fn with_program(program: &str, dpi: u32) -> Self {
        Self {
            program: program.to_string(),
            dpi,
        }
    }

    fn render_into(
        &self,
        pdf: &Path,
        staging: &Path,
        output_dir: &Path,
    ) -> PipelineResult<Vec<PathBuf>> {
        let output = Command::new(&self.program)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(staging.join(RAW_ROOT))
            .output()
            .map_err(|e| {
                PipelineError::render(
                    pdf,
                    format!("could not run {}: {e}. Install poppler-utils", self.program),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::render(pdf, stderr.trim()));
        }

        let mut raw_pages = raw_pages(staging)?;
        raw_pages.sort_by_key(|(page, _)| *page);
        debug!("{} rendered {} pages of {:?}", self.program, raw_pages.len(), pdf);

        raw_pages
            .into_iter()
            .map(|(page, raw)| {
                let dest = output_dir.join(page_file_name(page));
                fs::rename(&raw, &dest).map_err(|e| PipelineError::io(&dest, e))?;
                Ok(dest)
            })
            .collect()
    }
}

impl PageRenderer for Pdftoppm {
    fn render(&mut self, pdf: &Path, output_dir: &Path) -> PipelineResult<Vec<PathBuf>> {
        let staging = output_dir.join(STAGING_DIR);
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| PipelineError::io(&staging, e))?;
        }
        fs::create_dir(&staging).map_err(|e| PipelineError::io(&staging, e))?;

        let result = self.render_into(pdf, &staging, output_dir);

        if let Err(e) = fs::remove_dir_all(&staging) {
            warn!("Failed to remove {:?}: {}", staging, e);
        }
        result
    }

    fn name(&self) -> &str {
        "pdftoppm"
    }
}

fn raw_pages(staging: &Path) -> PipelineResult<Vec<(u32, PathBuf)>> {
    let mut pages = Vec::new();
    for entry in fs::read_dir(staging).map_err(|e| PipelineError::io(staging, e))? {
        let entry = entry.map_err(|e| PipelineError::io(staging, e))?;
        if let Some(page) = parse_page_number(&entry.file_name().to_string_lossy()) {
            pages.push((page, entry.path()));
        }
    }
    Ok(pages)
}
