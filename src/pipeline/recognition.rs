use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

use super::mirror::mirror_relative;
use super::progress::ProgressObserver;
use super::summary::RunSummary;
use crate::config::OcrConfig;
use crate::data::{ImageFile, ImageScanner};
use crate::error::{PipelineError, PipelineResult};
use crate::ocr::{operator_identity, OcrResult, TextRecognizer};

/// Drives OCR over an image tree, writing a mirrored tree of text artifacts.
pub struct OcrPipeline {
    config: OcrConfig,
    operator: String,
}

impl OcrPipeline {
    pub fn new(config: OcrConfig) -> Self {
        Self {
            config,
            operator: operator_identity(),
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Recognize every image under the input root, one at a time.
    pub fn run(
        &self,
        recognizer: &mut dyn TextRecognizer,
        observer: &mut dyn ProgressObserver,
    ) -> PipelineResult<RunSummary> {
        let scanner = ImageScanner::new(&self.config.input_root)?;

        fs::create_dir_all(&self.config.output_root)
            .map_err(|e| PipelineError::io(&self.config.output_root, e))?;

        let images: Vec<ImageFile> = scanner.iter().collect();
        info!("Found {} images to process", images.len());

        let mut summary = RunSummary::default();
        observer.started(images.len());

        for (idx, image) in images.iter().enumerate() {
            let ok = match self.process_image(recognizer, image) {
                Ok(_) => true,
                Err(e) => {
                    error!("Error processing {:?}: {}", image.path, e);
                    false
                }
            };

            summary.record(ok);
            observer.unit_done(idx + 1, &image.name(), ok);
        }

        observer.finished(&summary);
        info!("Processing Complete!");
        summary.log();
        info!("Output directory: {:?}", self.config.output_root);

        Ok(summary)
    }

    /// Recognize one image and write its artifact at the mirrored path.
    ///
    /// Nothing is written when recognition fails.
    pub fn process_image(
        &self,
        recognizer: &mut dyn TextRecognizer,
        image: &ImageFile,
    ) -> PipelineResult<PathBuf> {
        let output_path = mirror_relative(
            &image.relative,
            &self.config.output_root,
            &self.config.text_extension,
        );
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }

        info!("Processing: {:?}", image.path);
        let lines = recognizer.recognize(&image.path)?;

        let result = OcrResult::new(image.name(), self.operator.as_str(), lines);
        fs::write(&output_path, result.render())
            .map_err(|e| PipelineError::io(&output_path, e))?;

        info!("Saved: {:?}", output_path);
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::mirror::source_relative;
    use crate::pipeline::progress::tests::RecordingProgress;
    use std::collections::HashMap;
    use std::path::Path;
    use tempfile::TempDir;

    /// Recognizer answering from a table keyed by file name
    #[derive(Default)]
    struct ScriptedRecognizer {
        answers: HashMap<String, Result<Vec<String>, String>>,
        calls: Vec<PathBuf>,
    }

    impl ScriptedRecognizer {
        fn answer(mut self, name: &str, lines: &[&str]) -> Self {
            self.answers.insert(
                name.to_string(),
                Ok(lines.iter().map(|l| l.to_string()).collect()),
            );
            self
        }

        fn fail(mut self, name: &str, reason: &str) -> Self {
            self.answers.insert(name.to_string(), Err(reason.to_string()));
            self
        }
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(&mut self, image: &Path) -> PipelineResult<Vec<String>> {
            self.calls.push(image.to_path_buf());
            let name = image.file_name().unwrap().to_string_lossy().into_owned();
            match self.answers.get(&name) {
                Some(Ok(lines)) => Ok(lines.clone()),
                Some(Err(reason)) => Err(PipelineError::recognition(image, reason)),
                None => Err(PipelineError::recognition(image, "unexpected image")),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn setup(files: &[&str]) -> (TempDir, OcrConfig) {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("images");
        for file in files {
            let path = input.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"pixels").unwrap();
        }
        let config = OcrConfig {
            input_root: input,
            output_root: temp_dir.path().join("text"),
            log_dir: temp_dir.path().to_path_buf(),
            ..OcrConfig::default()
        };
        (temp_dir, config)
    }

    fn body(artifact: &str) -> &str {
        artifact.split_once("\n\n").map(|(_, body)| body).unwrap()
    }

    #[test]
    fn test_artifact_body_is_recognized_lines() {
        let (_temp_dir, config) = setup(&["book/page1.jpg"]);
        let output_root = config.output_root.clone();
        let mut recognizer = ScriptedRecognizer::default().answer("page1.jpg", &["Hello", "World"]);

        let summary = OcrPipeline::new(config)
            .with_operator("tester")
            .run(&mut recognizer, &mut RecordingProgress::default())
            .unwrap();

        assert_eq!(summary, RunSummary { succeeded: 1, failed: 0 });
        let artifact_path = output_root.join("book/page1.txt");
        let artifact = fs::read_to_string(&artifact_path).unwrap();

        let header: Vec<&str> = artifact.lines().take(4).collect();
        assert_eq!(header[0], "Source Image: page1.jpg");
        assert!(header[1].starts_with("Processing Date (UTC): "));
        assert_eq!(header[2], "Processed by: tester");
        assert_eq!(header[3], "-".repeat(50));
        assert_eq!(body(&artifact), "Hello\nWorld\n");

        assert_eq!(
            source_relative(&artifact_path, &output_root, "jpg").unwrap(),
            PathBuf::from("book/page1.jpg")
        );
    }

    #[test]
    fn test_recognition_failure_writes_nothing() {
        let (_temp_dir, config) = setup(&["a.png", "b.png", "notes.md"]);
        let output_root = config.output_root.clone();
        let mut recognizer = ScriptedRecognizer::default()
            .fail("a.png", "engine exploded")
            .answer("b.png", &["fine"]);
        let mut progress = RecordingProgress::default();

        let summary = OcrPipeline::new(config)
            .run(&mut recognizer, &mut progress)
            .unwrap();

        assert_eq!(summary, RunSummary { succeeded: 1, failed: 1 });
        assert!(!output_root.join("a.txt").exists());
        assert!(output_root.join("b.txt").exists());
        assert_eq!(recognizer.calls.len(), 2);
        assert_eq!(
            progress.units,
            vec![(1, "a.png".to_string(), false), (2, "b.png".to_string(), true)]
        );
        assert_eq!(progress.summary, Some(summary));
    }

    #[test]
    fn test_lines_keep_engine_order_and_duplicates() {
        let (_temp_dir, config) = setup(&["scan.tiff"]);
        let output_root = config.output_root.clone();
        let mut recognizer = ScriptedRecognizer::default().answer("scan.tiff", &["b", "a", "b"]);

        OcrPipeline::new(config)
            .run(&mut recognizer, &mut RecordingProgress::default())
            .unwrap();

        let artifact = fs::read_to_string(output_root.join("scan.txt")).unwrap();
        assert_eq!(body(&artifact), "b\na\nb\n");
    }

    #[test]
    fn test_missing_input_root_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let config = OcrConfig {
            input_root: temp_dir.path().join("nope"),
            output_root: temp_dir.path().join("text"),
            ..OcrConfig::default()
        };

        let err = OcrPipeline::new(config)
            .run(&mut ScriptedRecognizer::default(), &mut RecordingProgress::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }
}
