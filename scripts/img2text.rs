use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use book_ocr::config::load_config;
use book_ocr::ocr::init_engine;
use book_ocr::pipeline::console_progress;
use book_ocr::utils::init_with_run_log;
use book_ocr::{EngineKind, OcrConfig, OcrPipeline};

#[derive(Debug, Parser)]
#[command(author, version, about = "OCR a tree of images into a mirrored tree of text files")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, env = "BOOK_OCR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory searched recursively for images
    #[arg(short, long, env = "BOOK_OCR_INPUT")]
    input: Option<PathBuf>,

    /// Directory receiving the mirrored text files
    #[arg(short, long, env = "BOOK_OCR_OUTPUT")]
    output: Option<PathBuf>,

    /// Recognition languages, e.g. `chi_sim,eng`
    #[arg(long, env = "BOOK_OCR_LANGUAGES", value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Recognition backend
    #[arg(long, env = "BOOK_OCR_ENGINE", value_enum)]
    engine: Option<EngineKind>,

    /// Directory for the timestamped run log
    #[arg(long, env = "BOOK_OCR_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config: OcrConfig = load_config(args.config.as_deref())?;
    if let Some(input) = args.input {
        config.input_root = input;
    }
    if let Some(output) = args.output {
        config.output_root = output;
    }
    if let Some(languages) = args.languages {
        config.languages = languages;
    }
    if let Some(engine) = args.engine {
        config.engine = engine;
    }
    if let Some(log_dir) = args.log_dir {
        config.log_dir = log_dir;
    }

    let log_path = init_with_run_log(&config.log_dir)?;
    config.validate()?;

    info!("Starting OCR: {}", config);
    info!("Run log: {:?}", log_path);

    let mut recognizer = init_engine(&config).context("Failed to initialize OCR engine")?;
    info!("Engine ready: {}", recognizer.name());

    let pipeline = OcrPipeline::new(config);
    let mut progress = console_progress("Images");
    pipeline
        .run(recognizer.as_mut(), progress.as_mut())
        .with_context(|| format!("OCR aborted for {:?}", pipeline.config().input_root))?;

    Ok(())
}
