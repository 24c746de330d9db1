use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::codec::ExtractedImage;
use super::resolve::{classify, image_sources, resolve_reference, ItemKind};
use crate::data::{ResourceContainer, ResourceItem};

/// Why an item (or a markup reference) produced no image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Svg,
    ExternalReference,
    Unresolved,
    NotAnImage,
    Unreadable(String),
    DecodeFailed(String),
    WriteFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Written(PathBuf),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Resource id, or the raw `src` when a reference did not resolve
    pub subject: String,
    /// Markup page whose `<img>` led here, if any
    pub referenced_from: Option<String>,
    pub outcome: ItemOutcome,
}

/// Everything that happened while extracting one container.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub items: Vec<ItemReport>,
}

impl ExtractionReport {
    fn push(&mut self, subject: &str, referenced_from: Option<&str>, outcome: ItemOutcome) {
        self.items.push(ItemReport {
            subject: subject.to_string(),
            referenced_from: referenced_from.map(str::to_string),
            outcome,
        });
    }

    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.items.iter().filter_map(|r| match &r.outcome {
            ItemOutcome::Written(path) => Some(path.as_path()),
            ItemOutcome::Skipped(_) => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.items.iter().filter_map(|r| match &r.outcome {
            ItemOutcome::Skipped(reason) => Some((r.subject.as_str(), reason)),
            ItemOutcome::Written(_) => None,
        })
    }
}

/// Write every image of `container` into `output_dir`.
///
/// Direct `image/*` items are written as they are met. Markup pages are
/// parsed and each `<img>` is resolved against the container's image items
/// and written again, so an image referenced from several pages is simply
/// overwritten with identical bytes. No single item can fail the container.
pub fn extract_images<C>(container: &mut C, output_dir: &Path) -> ExtractionReport
where
    C: ResourceContainer + ?Sized,
{
    let items = container.items().to_vec();
    let mut report = ExtractionReport::default();

    for item in &items {
        match classify(&item.media_type) {
            ItemKind::Image => {
                let outcome = write_image(container, item, output_dir);
                report.push(&item.id, None, outcome);
            }
            ItemKind::Svg => report.push(&item.id, None, ItemOutcome::Skipped(SkipReason::Svg)),
            ItemKind::Markup => {
                extract_from_markup(container, item, &items, output_dir, &mut report)
            }
            ItemKind::Other => {
                report.push(&item.id, None, ItemOutcome::Skipped(SkipReason::NotAnImage))
            }
        }
    }

    report
}

fn extract_from_markup<C>(
    container: &mut C,
    page: &ResourceItem,
    items: &[ResourceItem],
    output_dir: &Path,
    report: &mut ExtractionReport,
) where
    C: ResourceContainer + ?Sized,
{
    let content = match container.read(&page.id) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read markup page {}: {}", page.id, e);
            report.push(
                &page.id,
                None,
                ItemOutcome::Skipped(SkipReason::Unreadable(e.to_string())),
            );
            return;
        }
    };

    let html = String::from_utf8_lossy(&content);
    let sources = image_sources(&html);
    debug!("Markup page {} references {} images", page.id, sources.len());

    for src in sources {
        let outcome = match resolve_reference(&src, items) {
            Ok(Some(target)) if classify(&target.media_type) == ItemKind::Svg => {
                let outcome = ItemOutcome::Skipped(SkipReason::Svg);
                report.push(&target.id, Some(page.id.as_str()), outcome);
                continue;
            }
            Ok(Some(target)) => {
                let outcome = write_image(container, target, output_dir);
                report.push(&target.id, Some(page.id.as_str()), outcome);
                continue;
            }
            Ok(None) => ItemOutcome::Skipped(SkipReason::ExternalReference),
            // Dangling references are expected in real books and stay quiet.
            Err(_) => ItemOutcome::Skipped(SkipReason::Unresolved),
        };
        report.push(&src, Some(page.id.as_str()), outcome);
    }
}

/// Read, decode and save one image item.
fn write_image<C>(container: &mut C, item: &ResourceItem, output_dir: &Path) -> ItemOutcome
where
    C: ResourceContainer + ?Sized,
{
    let bytes = match container.read(&item.id) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read image {}: {}", item.id, e);
            return ItemOutcome::Skipped(SkipReason::Unreadable(e.to_string()));
        }
    };

    let extracted = match ExtractedImage::decode(item, &bytes) {
        Ok(extracted) => extracted,
        Err(e) => {
            warn!("Failed to decode image {}: {}", item.id, e);
            return ItemOutcome::Skipped(SkipReason::DecodeFailed(e.to_string()));
        }
    };

    match extracted.save(output_dir) {
        Ok(path) => {
            debug!("Saved image: {:?}", path);
            ItemOutcome::Written(path)
        }
        Err(e) => {
            warn!("Failed to save image {}: {}", item.id, e);
            ItemOutcome::Skipped(SkipReason::WriteFailed(e.to_string()))
        }
    }
}
