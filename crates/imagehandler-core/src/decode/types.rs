//! Core types for image decoding.

use thiserror::Error;

use crate::buffer::{PixelBuffer, PixelError};

/// Resolution assumed when a file carries no usable resolution metadata.
pub const DEFAULT_DPI: f32 = 96.0;

/// PNG and BMP store resolution in pixels per metre.
pub(crate) const METRES_PER_INCH: f32 = 0.0254;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file extension is not one of the supported formats.
    #[error("Unsupported image extension: {0:?}")]
    UnsupportedExtension(String),

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// I/O error during file reading.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The decoded pixels could not be placed in a buffer.
    #[error(transparent)]
    Buffer(#[from] PixelError),
}

/// A decoded image together with its resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Pixels, `Argb32` when the file has alpha and `Rgb24` otherwise.
    pub buffer: PixelBuffer,
    /// Horizontal resolution in dots per inch.
    pub dpi_x: f32,
    /// Vertical resolution in dots per inch.
    pub dpi_y: f32,
}

impl DecodedImage {
    /// Wrap a buffer with the default resolution.
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            dpi_x: DEFAULT_DPI,
            dpi_y: DEFAULT_DPI,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelFormat;

    #[test]
    fn test_decoded_image_defaults_to_96_dpi() {
        let buffer = PixelBuffer::new(3, 2, PixelFormat::Rgb24).unwrap();
        let img = DecodedImage::new(buffer);
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!((img.dpi_x, img.dpi_y), (96.0, 96.0));
    }

    #[test]
    fn test_error_display() {
        let err = DecodeError::UnsupportedExtension("txt".to_string());
        assert_eq!(err.to_string(), "Unsupported image extension: \"txt\"");

        let err = DecodeError::CorruptedFile("truncated".to_string());
        assert!(err.to_string().contains("truncated"));

        let err: DecodeError = PixelError::InvalidDimension {
            width: 0,
            height: 5,
        }
        .into();
        assert!(err.to_string().contains("0x5"));
    }
}
