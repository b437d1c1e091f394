//! Raster transforms: grayscale, brightness, rotation and resizing.
//!
//! Every transform is a stateless function over an explicit buffer. Pixel
//! loops run on [`crate::parallel::map_pixels`]; filtered resize hands the
//! whole image to a [`Resampler`].
//!
//! # Ownership
//!
//! - In place: [`to_grayscale`], [`change_brightness`] mutate the buffer they
//!   are given.
//! - New buffer: [`rotate`], [`resize_filtered`], [`resize_nearest`] borrow
//!   the source and return a freshly allocated result. The caller decides
//!   when to drop the source.
//!
//! # Validation
//!
//! Target dimensions must lie in `[1, MAX_DIMENSION]`. Validation happens
//! before any allocation or write, so a failed call leaves the source
//! untouched.

mod brightness;
mod grayscale;
mod request;
mod resize;
mod rotation;

pub use brightness::{change_brightness, MIN_CHANNEL_VALUE};
pub use grayscale::{luma, to_grayscale};
pub use request::{ResizeRequest, ResizeUnit};
pub use resize::{
    resize_filtered, resize_filtered_with, resize_nearest, FilteredResampler, ResampleFilter,
    Resampler,
};
pub use rotation::{rotate, OUTSIDE_PIXEL};

pub(crate) use resize::{resize_filtered_within, resize_nearest_within};
pub(crate) use rotation::rotate_within;

use crate::buffer::PixelError;

/// Largest width or height a transform may produce.
pub const MAX_DIMENSION: u32 = 9999;

/// Check that `width` and `height` both lie in `[1, max]`.
///
/// # Errors
///
/// Returns `PixelError::InvalidDimension` naming the rejected pair.
pub fn validate_dimensions(width: i64, height: i64, max: u32) -> Result<(u32, u32), PixelError> {
    let max = i64::from(max);
    if (1..=max).contains(&width) && (1..=max).contains(&height) {
        Ok((width as u32, height as u32))
    } else {
        log::warn!("rejected target dimensions {width}x{height} (allowed 1..={max})");
        Err(PixelError::InvalidDimension { width, height })
    }
}
