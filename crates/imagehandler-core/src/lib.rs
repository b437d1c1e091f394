//! ImageHandler Core - raster editing engine
//!
//! This crate provides the pixel-level core of the ImageHandler editor:
//! stride-aware pixel buffers, grayscale, brightness, arbitrary-angle
//! rotation, filtered and nearest-neighbour resizing, and loading/saving of
//! BMP, JPEG, GIF, PNG and TIFF files with their resolution.
//!
//! Transforms are plain functions in [`transform`]; [`asset::ImageAsset`]
//! adds undo/reload and file state on top, and [`engine::RasterEngine`]
//! runs serialized [`engine::EditCommand`]s with a configured worker pool.

pub mod asset;
pub mod buffer;
pub mod config;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod format;
pub mod geometry;
pub mod parallel;
pub mod transform;

pub use asset::ImageAsset;
pub use buffer::{PixelBuffer, PixelError, PixelFormat};
pub use config::EngineConfig;
pub use decode::DecodeError;
pub use encode::EncodeError;
pub use engine::{EditCommand, RasterEngine};
pub use error::EngineError;
pub use format::{is_supported_path, ImageFileFormat};
pub use geometry::{rotate_point, Point};
pub use transform::{
    change_brightness, resize_filtered, resize_nearest, rotate, to_grayscale, ResizeRequest,
    MAX_DIMENSION,
};
