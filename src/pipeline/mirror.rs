//! Pure path arithmetic for mirrored output trees. Nothing here touches the
//! filesystem.

use std::path::{Path, PathBuf};

/// `<output_root>/<relative>` with the extension swapped for
/// `text_extension`. `relative` is the image path relative to its scan root.
pub fn mirror_relative(relative: &Path, output_root: &Path, text_extension: &str) -> PathBuf {
    output_root.join(relative).with_extension(text_extension)
}

/// Inverse of [`mirror_relative`]: recover the image path relative to its
/// scan root from an artifact path and the image's original extension.
pub fn source_relative(
    artifact: &Path,
    output_root: &Path,
    image_extension: &str,
) -> Option<PathBuf> {
    let relative = artifact.strip_prefix(output_root).ok()?;
    Some(relative.with_extension(image_extension))
}

/// Per-container output folder, named after the container's stem.
pub fn container_output_dir(output_root: &Path, container_stem: &str) -> PathBuf {
    output_root.join(container_stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mirror_relative_replaces_extension() {
        let out = mirror_relative(Path::new("book/page1.jpg"), Path::new("/data/text"), "txt");
        assert_eq!(out, PathBuf::from("/data/text/book/page1.txt"));
    }

    #[test]
    fn test_mirror_relative_keeps_inner_dots() {
        let out = mirror_relative(Path::new("v1.2/scan.001.png"), Path::new("out"), "txt");
        assert_eq!(out, PathBuf::from("out/v1.2/scan.001.txt"));
    }

    #[test]
    fn test_source_relative_outside_root() {
        assert!(source_relative(Path::new("/elsewhere/a.txt"), Path::new("/out"), "png").is_none());
    }

    #[test]
    fn test_container_output_dir() {
        assert_eq!(
            container_output_dir(Path::new("book_images"), "Collected Works"),
            PathBuf::from("book_images/Collected Works")
        );
    }

    fn relative_image_path() -> impl Strategy<Value = (PathBuf, String)> {
        (
            prop::collection::vec("[a-zA-Z0-9_ -]{1,10}", 0..4),
            "[a-zA-Z0-9_-]{1,10}(\\.[a-z0-9]{1,4})?",
            prop::sample::select(vec!["png", "jpg", "jpeg", "tiff", "bmp", "PNG"]),
        )
            .prop_map(|(dirs, stem, ext)| {
                let mut path: PathBuf = dirs.iter().collect();
                path.push(format!("{stem}.{ext}"));
                (path, ext.to_string())
            })
    }

    proptest! {
        #[test]
        fn prop_mirror_round_trip((relative, ext) in relative_image_path()) {
            let output_root = Path::new("/out/root");

            let artifact = mirror_relative(&relative, output_root, "txt");
            prop_assert_eq!(artifact.extension().unwrap(), "txt");
            prop_assert!(artifact.starts_with(output_root));

            let recovered = source_relative(&artifact, output_root, &ext).unwrap();
            prop_assert_eq!(recovered, relative);
        }
    }
}
