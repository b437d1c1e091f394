//! Image encoding for save and save-as.
//!
//! This module provides functionality for:
//! - Encoding buffers to BMP, JPEG, GIF, PNG or TIFF, chosen by extension
//! - Storing the image resolution in every format except GIF
//!
//! # Examples
//!
//! ```ignore
//! use imagehandler_core::encode::save_buffer;
//!
//! save_buffer(&buffer, 300.0, 300.0, "print.jpg", 90)?;
//! ```

mod file;
mod jpeg;
mod lossless;
mod types;

pub use file::{encode_buffer, save_buffer};
pub use jpeg::encode_jpeg;
pub use lossless::{encode_bmp, encode_png, encode_tiff};
pub use types::EncodeError;
