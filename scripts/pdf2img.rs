use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use book_ocr::config::load_config;
use book_ocr::pipeline::console_progress;
use book_ocr::render::Pdftoppm;
use book_ocr::utils::init_console;
use book_ocr::{RasterConfig, RasterPipeline};

#[derive(Debug, Parser)]
#[command(author, version, about = "Render every page of a tree of PDF files to PNG")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, env = "BOOK_OCR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory searched recursively for PDF files
    #[arg(short, long, env = "BOOK_OCR_INPUT")]
    input: Option<PathBuf>,

    /// Directory receiving one page folder per PDF
    #[arg(short, long, env = "BOOK_OCR_OUTPUT")]
    output: Option<PathBuf>,

    /// Render resolution in dots per inch
    #[arg(long, env = "BOOK_OCR_DPI")]
    dpi: Option<u32>,
}

fn main() -> Result<()> {
    init_console();

    let args = Args::parse();

    let mut config: RasterConfig = load_config(args.config.as_deref())?;
    if let Some(input) = args.input {
        config.input_root = input;
    }
    if let Some(output) = args.output {
        config.output_root = output;
    }
    if let Some(dpi) = args.dpi {
        config.dpi = dpi;
    }
    config.validate()?;

    info!("Starting PDF rendering: {}", config);

    let mut renderer = Pdftoppm::with_program(&config.program, config.dpi);
    let pipeline = RasterPipeline::new(config);
    let mut progress = console_progress("PDFs");
    pipeline
        .run(&mut renderer, progress.as_mut())
        .with_context(|| format!("Rendering aborted for {:?}", pipeline.config().input_root))?;

    Ok(())
}
