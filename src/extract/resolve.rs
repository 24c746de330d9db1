//! Classification of manifest items and resolution of `<img>` references
//! found in markup pages.

use scraper::{Html, Selector};

use crate::data::ResourceItem;
use crate::error::{PipelineError, PipelineResult};

const SVG_MEDIA_TYPE: &str = "image/svg+xml";
const MARKUP_MEDIA_TYPE: &str = "application/xhtml+xml";
const KEPT_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "gif"];
const FALLBACK_EXTENSION: &str = "jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// `image/*` other than SVG
    Image,
    Svg,
    Markup,
    Other,
}

pub fn classify(media_type: &str) -> ItemKind {
    let media_type = media_type.trim().to_ascii_lowercase();
    if media_type == SVG_MEDIA_TYPE {
        ItemKind::Svg
    } else if media_type.starts_with("image/") {
        ItemKind::Image
    } else if media_type == MARKUP_MEDIA_TYPE {
        ItemKind::Markup
    } else {
        ItemKind::Other
    }
}

/// File extension for an image media type: the subtype when it is one of
/// jpeg/jpg/png/gif, `jpg` otherwise.
pub fn infer_extension(media_type: &str) -> &'static str {
    let subtype = media_type
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    KEPT_EXTENSIONS
        .iter()
        .find(|ext| **ext == subtype)
        .copied()
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Every non-empty `src` attribute of an `<img>` element, in document order.
pub fn image_sources(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip leading `.` and `/` characters from a reference.
///
/// This is a lenient character strip, not path normalization: `../../a`,
/// `./a` and `.a` all become `a`. It runs twice, once for `./` and once
/// for `../`; the second pass never changes anything after the first.
pub fn clean_src(src: &str) -> &str {
    let once = src.trim_start_matches(['.', '/']);
    once.trim_start_matches(['.', '/'])
}

pub fn is_external(src: &str) -> bool {
    src.starts_with("http")
}

/// Find the resource an `<img src>` points at.
///
/// Returns `Ok(None)` for external references, which are never looked up.
/// Otherwise the first `image/*` item whose file name *contains* the cleaned
/// reference wins. Containment rather than equality is deliberate and can
/// match an unrelated resource when the reference is short.
pub fn resolve_reference<'a>(
    src: &str,
    items: &'a [ResourceItem],
) -> PipelineResult<Option<&'a ResourceItem>> {
    if is_external(src) {
        return Ok(None);
    }

    let cleaned = clean_src(src);
    items
        .iter()
        .filter(|item| matches!(classify(&item.media_type), ItemKind::Image | ItemKind::Svg))
        .find(|item| {
            item.file_name
                .as_deref()
                .is_some_and(|name| name.contains(cleaned))
        })
        .map(Some)
        .ok_or_else(|| PipelineError::UnresolvedReference(cleaned.to_string()))
}
