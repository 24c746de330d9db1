// Library exports shared by the `epub2img`, `pdf2img` and `img2text` binaries

pub mod config;
pub mod data;
pub mod error;
pub mod extract;
pub mod ocr;
pub mod pipeline;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::{EngineKind, ExtractConfig, OcrConfig, RasterConfig};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{ExtractionPipeline, OcrPipeline, RasterPipeline, RunSummary};
