mod codec;
mod extractor;
pub mod resolve;

pub use codec::ExtractedImage;
pub use extractor::{extract_images, ExtractionReport, ItemOutcome, ItemReport, SkipReason};

#[cfg(test)]
pub(crate) use codec::tests as codec_fixtures;
