use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use book_ocr::config::load_config;
use book_ocr::data::EpubContainer;
use book_ocr::pipeline::console_progress;
use book_ocr::utils::init_console;
use book_ocr::{ExtractConfig, ExtractionPipeline};

#[derive(Debug, Parser)]
#[command(author, version, about = "Extract every image from a tree of EPUB files")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, env = "BOOK_OCR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory searched recursively for EPUB files
    #[arg(short, long, env = "BOOK_OCR_INPUT")]
    input: Option<PathBuf>,

    /// Directory receiving one image folder per EPUB
    #[arg(short, long, env = "BOOK_OCR_OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_console();

    let args = Args::parse();

    let mut config: ExtractConfig = load_config(args.config.as_deref())?;
    if let Some(input) = args.input {
        config.input_root = input;
    }
    if let Some(output) = args.output {
        config.output_root = output;
    }
    config.validate()?;

    info!("Starting image extraction: {}", config);

    let pipeline = ExtractionPipeline::new(config);
    let mut progress = console_progress("EPUBs");
    pipeline
        .run(|path| EpubContainer::open(path), progress.as_mut())
        .with_context(|| format!("Extraction aborted for {:?}", pipeline.config().input_root))?;

    Ok(())
}
