//! File formats the editor can open and save, keyed by extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Extensions accepted by open and save, lowercase, without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "bmp", "tif", "tiff", "png", "gif"];

/// A supported on-disk image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFileFormat {
    Bmp,
    Jpeg,
    Gif,
    Png,
    Tiff,
}

impl ImageFileFormat {
    /// Look up a format by extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFileFormat::Jpeg),
            "bmp" => Some(ImageFileFormat::Bmp),
            "tif" | "tiff" => Some(ImageFileFormat::Tiff),
            "png" => Some(ImageFileFormat::Png),
            "gif" => Some(ImageFileFormat::Gif),
            _ => None,
        }
    }

    /// Format implied by the extension of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Convert to the image crate's ImageFormat.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFileFormat::Bmp => image::ImageFormat::Bmp,
            ImageFileFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFileFormat::Gif => image::ImageFormat::Gif,
            ImageFileFormat::Png => image::ImageFormat::Png,
            ImageFileFormat::Tiff => image::ImageFormat::Tiff,
        }
    }

    /// Whether the format can store an alpha channel.
    pub fn supports_alpha(self) -> bool {
        matches!(
            self,
            ImageFileFormat::Png | ImageFileFormat::Gif | ImageFileFormat::Tiff
        )
    }
}

/// Returns true if `path` has one of [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_path(path: impl AsRef<Path>) -> bool {
    ImageFileFormat::from_path(path).is_some()
}

/// The extension of `path` as written, or an empty string.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_extension_resolves() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(ImageFileFormat::from_extension(ext).is_some(), "{ext}");
        }
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(
            ImageFileFormat::from_extension("JPG"),
            Some(ImageFileFormat::Jpeg)
        );
        assert_eq!(
            ImageFileFormat::from_path("scan.TiFf"),
            Some(ImageFileFormat::Tiff)
        );
    }

    #[test]
    fn test_unsupported_paths() {
        assert!(!is_supported_path("notes.txt"));
        assert!(!is_supported_path("photo.webp"));
        assert!(!is_supported_path("no_extension"));
        assert!(is_supported_path("/tmp/a/b/photo.jpeg"));
    }

    #[test]
    fn test_image_format_mapping() {
        assert_eq!(
            ImageFileFormat::Jpeg.to_image_format(),
            image::ImageFormat::Jpeg
        );
        assert_eq!(
            ImageFileFormat::Tiff.to_image_format(),
            image::ImageFormat::Tiff
        );
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/b.PNG")), "PNG");
        assert_eq!(extension_of(Path::new("a/b")), "");
    }
}
