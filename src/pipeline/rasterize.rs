use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

use super::extraction::create_unit_dir;
use super::mirror::container_output_dir;
use super::progress::ProgressObserver;
use super::summary::RunSummary;
use crate::config::RasterConfig;
use crate::data::{ContainerFile, ContainerScanner};
use crate::error::{PipelineError, PipelineResult};
use crate::render::PageRenderer;

const PDF_EXTENSION: &str = "pdf";

/// Renders every page of every PDF under the input root into
/// `<output_root>/<stem>/page_NNNN.png`.
pub struct RasterPipeline {
    config: RasterConfig,
}

impl RasterPipeline {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Render each PDF in turn. A PDF that fails to render is counted and
    /// the run moves on.
    pub fn run(
        &self,
        renderer: &mut dyn PageRenderer,
        observer: &mut dyn ProgressObserver,
    ) -> PipelineResult<RunSummary> {
        let scanner = ContainerScanner::new(&self.config.input_root, PDF_EXTENSION)?;

        fs::create_dir_all(&self.config.output_root)
            .map_err(|e| PipelineError::io(&self.config.output_root, e))?;

        let pdfs: Vec<ContainerFile> = scanner.iter().collect();
        info!("Found {} PDF files to process", pdfs.len());

        let mut summary = RunSummary::default();
        observer.started(pdfs.len());

        for (idx, file) in pdfs.iter().enumerate() {
            let ok = match self.process_pdf(renderer, file) {
                Ok(pages) => {
                    info!("Rendered {} pages from {}", pages.len(), file.name());
                    true
                }
                Err(e) => {
                    error!("Error processing {:?}: {}", file.path, e);
                    false
                }
            };

            summary.record(ok);
            observer.unit_done(idx + 1, &file.name(), ok);
        }

        observer.finished(&summary);
        info!("Processing complete!");
        summary.log();
        info!("Output directory: {:?}", self.config.output_root);

        Ok(summary)
    }

    pub fn process_pdf(
        &self,
        renderer: &mut dyn PageRenderer,
        file: &ContainerFile,
    ) -> PipelineResult<Vec<PathBuf>> {
        let output_dir = container_output_dir(&self.config.output_root, &file.stem());
        create_unit_dir(&output_dir)?;

        info!("Converting {} with {}", file.name(), renderer.name());
        renderer.render(&file.path, &output_dir)
    }
}
