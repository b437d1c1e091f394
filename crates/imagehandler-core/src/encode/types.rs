//! Error type for image encoding.

use thiserror::Error;

/// Errors that can occur while encoding or saving an image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The target extension is not one of the supported formats.
    #[error("Unsupported image extension: {0:?}")]
    UnsupportedExtension(String),

    /// A never-saved image has no path to write back to.
    #[error("Image has never been saved; a target path is required")]
    DraftWithoutPath,

    /// I/O error while writing the file.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The codec rejected the pixels.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
