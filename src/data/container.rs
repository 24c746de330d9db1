use epub::doc::EpubDoc;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// One manifest entry of an open container.
///
/// The payload is not held here; it is read on demand through
/// [`ResourceContainer::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceItem {
    pub id: String,
    pub media_type: String,
    /// Path-like name relative to the package document, used to resolve
    /// markup references
    pub file_name: Option<String>,
}

impl ResourceItem {
    pub fn new(id: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            media_type: media_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// An opened container session.
///
/// Dropping the value releases the underlying archive handle.
pub trait ResourceContainer {
    /// Every resource item, in the container's enumeration order
    fn items(&self) -> &[ResourceItem];

    /// Read the raw payload of the item with the given id
    fn read(&mut self, id: &str) -> PipelineResult<Vec<u8>>;
}

/// EPUB archive backed by the `epub` crate
pub struct EpubContainer {
    path: PathBuf,
    doc: EpubDoc<BufReader<File>>,
    items: Vec<ResourceItem>,
    archive_paths: HashMap<String, PathBuf>,
}

impl EpubContainer {
    pub fn open(path: &Path) -> PipelineResult<Self> {
        let doc = EpubDoc::new(path).map_err(|e| PipelineError::container(path, e))?;

        // The manifest map is unordered; sort by id so runs are reproducible.
        let mut ids: Vec<&String> = doc.resources.keys().collect();
        ids.sort();

        let mut items = Vec::with_capacity(ids.len());
        let mut archive_paths = HashMap::with_capacity(ids.len());

        for id in ids {
            let (archive_path, mime) = &doc.resources[id];
            let relative = archive_path
                .strip_prefix(&doc.root_base)
                .unwrap_or(archive_path);

            items.push(ResourceItem {
                id: id.clone(),
                media_type: mime.clone(),
                file_name: Some(relative.to_string_lossy().replace('\\', "/")),
            });
            archive_paths.insert(id.clone(), archive_path.clone());
        }

        debug!("Opened {:?} with {} resources", path, items.len());

        Ok(Self {
            path: path.to_path_buf(),
            doc,
            items,
            archive_paths,
        })
    }
}

impl ResourceContainer for EpubContainer {
    fn items(&self) -> &[ResourceItem] {
        &self.items
    }

    fn read(&mut self, id: &str) -> PipelineResult<Vec<u8>> {
        let archive_path = self.archive_paths.get(id).ok_or_else(|| {
            PipelineError::container(&self.path, format!("unknown resource id {id}"))
        })?;

        self.doc.get_resource_by_path(archive_path).ok_or_else(|| {
            PipelineError::container(
                &self.path,
                format!("resource {id} missing from archive at {:?}", archive_path),
            )
        })
    }
}

/// Container held entirely in memory, for callers that already have the
/// resources decoded (and for tests).
#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    items: Vec<ResourceItem>,
    payloads: HashMap<String, Vec<u8>>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: ResourceItem, payload: impl Into<Vec<u8>>) {
        self.payloads.insert(item.id.clone(), payload.into());
        self.items.push(item);
    }

    pub fn with(mut self, item: ResourceItem, payload: impl Into<Vec<u8>>) -> Self {
        self.push(item, payload);
        self
    }
}

impl ResourceContainer for MemoryContainer {
    fn items(&self) -> &[ResourceItem] {
        &self.items
    }

    fn read(&mut self, id: &str) -> PipelineResult<Vec<u8>> {
        self.payloads
            .get(id)
            .cloned()
            .ok_or_else(|| {
                PipelineError::container("<memory>", format!("unknown resource id {id}"))
            })
    }
}
