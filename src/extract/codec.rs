use image::DynamicImage;
use std::path::{Path, PathBuf};

use super::resolve::infer_extension;
use crate::data::ResourceItem;
use crate::error::{PipelineError, PipelineResult};

/// A resource payload that decoded cleanly and is ready to be written.
pub struct ExtractedImage {
    pub resource_id: String,
    pub extension: &'static str,
    pub image: DynamicImage,
}

impl ExtractedImage {
    /// Decode `bytes` with the image codec. The declared media type only
    /// picks the output extension; the codec sniffs the real format.
    pub fn decode(item: &ResourceItem, bytes: &[u8]) -> PipelineResult<Self> {
        let image = image::load_from_memory(bytes).map_err(|e| PipelineError::Decode {
            id: item.id.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            resource_id: item.id.clone(),
            extension: infer_extension(&item.media_type),
            image,
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.resource_id, self.extension)
    }

    /// Re-encode into `<dir>/<id>.<ext>`, overwriting any previous file.
    pub fn save(&self, dir: &Path) -> PipelineResult<PathBuf> {
        let path = dir.join(self.file_name());
        self.image
            .save(&path)
            .map_err(|e| {
                PipelineError::io(&path, std::io::Error::new(std::io::ErrorKind::Other, e))
            })?;
        Ok(path)
    }
}
