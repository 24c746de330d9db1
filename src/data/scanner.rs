use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{PipelineError, PipelineResult};

/// Extensions (lowercase, without dot) the OCR run treats as images.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tiff", "bmp"];

/// A container archive found under the input root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFile {
    pub path: PathBuf,
}

impl ContainerFile {
    /// File stem, used as the name of the per-container output folder.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.stem())
    }
}

/// An image file found under a scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    /// Path relative to the scan root
    pub relative: PathBuf,
}

impl ImageFile {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Walks an input tree for files carrying the container extension.
///
/// Each call to [`ContainerScanner::iter`] starts a fresh walk, so the scan
/// can be restarted at will.
#[derive(Debug, Clone)]
pub struct ContainerScanner {
    root: PathBuf,
    extension: String,
}

impl ContainerScanner {
    pub fn new(root: &Path, extension: &str) -> PipelineResult<Self> {
        ensure_root(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            extension: extension.to_lowercase(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = ContainerFile> + '_ {
        walk_files(&self.root)
            .filter(move |path| has_extension(path, &[self.extension.as_str()]))
            .map(|path| ContainerFile { path })
    }
}

/// Walks an image tree for files with a recognized image extension.
#[derive(Debug, Clone)]
pub struct ImageScanner {
    root: PathBuf,
}

impl ImageScanner {
    pub fn new(root: &Path) -> PipelineResult<Self> {
        ensure_root(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = ImageFile> + '_ {
        walk_files(&self.root)
            .filter(|path| has_extension(path, &IMAGE_EXTENSIONS))
            .filter_map(move |path| {
                let relative = path.strip_prefix(&self.root).ok()?.to_path_buf();
                Some(ImageFile { path, relative })
            })
    }
}

fn ensure_root(root: &Path) -> PipelineResult<()> {
    if !root.is_dir() {
        return Err(PipelineError::NotFound(root.to_path_buf()));
    }
    Ok(())
}

fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
}

fn has_extension(path: &Path, wanted: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| wanted.contains(&ext.as_str()))
}
