//! Image decoding for the editor.
//!
//! This module provides functionality for:
//! - Decoding BMP, JPEG, GIF, PNG and TIFF files into a [`PixelBuffer`]
//! - Reading the stored resolution (EXIF, JFIF density, PNG `pHYs` or the
//!   BMP header)
//!
//! Codec work is delegated to the `image` crate; this module only picks the
//! pixel format and copies the decoded pixels into the editor's layout.
//!
//! # Examples
//!
//! ```ignore
//! use imagehandler_core::decode::decode_file;
//!
//! let image = decode_file("photo.jpg")?;
//! println!("Decoded {}x{} at {} dpi", image.width(), image.height(), image.dpi_x);
//! ```
//!
//! [`PixelBuffer`]: crate::buffer::PixelBuffer

mod file;
mod types;

pub use file::{decode_bytes, decode_file, read_dpi};
pub use types::{DecodeError, DecodedImage, DEFAULT_DPI};
pub(crate) use types::METRES_PER_INCH;
