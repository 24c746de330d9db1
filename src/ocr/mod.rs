mod engine;
mod result;

#[cfg(feature = "leptess")]
pub use engine::LeptessEngine;
pub use engine::{init_engine, split_lines, TesseractCli, TextRecognizer};
pub use result::{operator_identity, OcrResult};
