use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{error, info};

use super::mirror::container_output_dir;
use super::progress::ProgressObserver;
use super::summary::RunSummary;
use crate::config::ExtractConfig;
use crate::data::{ContainerFile, ContainerScanner, ResourceContainer};
use crate::error::{PipelineError, PipelineResult};
use crate::extract::{extract_images, ExtractionReport};

/// Drives container discovery and image extraction over one input tree.
pub struct ExtractionPipeline {
    config: ExtractConfig,
}

impl ExtractionPipeline {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Process every container under the input root, one at a time.
    ///
    /// `open` turns a container path into an open session; the session is
    /// dropped before the next container is opened. Only a missing input
    /// root or an unusable output root fails the run.
    pub fn run<F, C>(
        &self,
        mut open: F,
        observer: &mut dyn ProgressObserver,
    ) -> PipelineResult<RunSummary>
    where
        F: FnMut(&Path) -> PipelineResult<C>,
        C: ResourceContainer,
    {
        let scanner =
            ContainerScanner::new(&self.config.input_root, &self.config.container_extension)?;

        fs::create_dir_all(&self.config.output_root)
            .map_err(|e| PipelineError::io(&self.config.output_root, e))?;

        let containers: Vec<ContainerFile> = scanner.iter().collect();
        info!(
            "Found {} {} files to process",
            containers.len(),
            self.config.container_extension
        );

        let mut summary = RunSummary::default();
        observer.started(containers.len());

        for (idx, file) in containers.iter().enumerate() {
            let ok = match self.process_container(file, &mut open) {
                Ok(report) => {
                    info!(
                        "Processed {:?}: {} images written, {} items skipped",
                        file.path,
                        report.written().count(),
                        report.skipped().count()
                    );
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

    /// Extract one container into `<output_root>/<stem>/`.
    ///
    /// The folder is created before the container is opened and is never
    /// cleared, so it exists (possibly empty) even when opening fails.
    pub fn process_container<F, C>(
        &self,
        file: &ContainerFile,
        open: &mut F,
    ) -> PipelineResult<ExtractionReport>
    where
        F: FnMut(&Path) -> PipelineResult<C>,
        C: ResourceContainer,
    {
        let output_dir = container_output_dir(&self.config.output_root, &file.stem());
        create_unit_dir(&output_dir)?;

        info!("Processing {}", file.name());
        let mut container = open(&file.path)?;
        Ok(extract_images(&mut container, &output_dir))
    }
}

/// Create a per-container output folder, keeping one that already exists.
pub(super) fn create_unit_dir(dir: &Path) -> PipelineResult<()> {
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
        Err(e) => Err(PipelineError::io(dir, e)),
    }
}
