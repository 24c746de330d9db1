mod extraction;
pub mod mirror;
mod progress;
mod rasterize;
mod recognition;
mod summary;

pub use extraction::ExtractionPipeline;
pub use progress::{console_progress, BarProgress, LogProgress, ProgressObserver};
pub use rasterize::RasterPipeline;
pub use recognition::OcrPipeline;
pub use summary::RunSummary;
