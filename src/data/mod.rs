mod container;
mod scanner;

pub use container::{EpubContainer, MemoryContainer, ResourceContainer, ResourceItem};
pub use scanner::{ContainerFile, ContainerScanner, ImageFile, ImageScanner, IMAGE_EXTENSIONS};

#[cfg(test)]
pub(crate) use container::tests::write_epub;
