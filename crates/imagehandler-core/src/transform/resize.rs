//! Resizing: filtered resampling through a [`Resampler`], and a manual
//! nearest-neighbour resample on the pixel map.
//!
//! Both validate the target size before touching anything and return a new
//! buffer of exactly the requested dimensions.

use std::borrow::Cow;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, PixelError, PixelFormat};
use crate::parallel::render;

use super::{validate_dimensions, MAX_DIMENSION};

/// Interpolation filter used by [`FilteredResampler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResampleFilter {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Bicubic (Catmull-Rom) interpolation, the default for editing.
    #[default]
    Bicubic,
    /// Lanczos3 interpolation (slower, sharpest).
    Lanczos3,
}

impl ResampleFilter {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResampleFilter::Nearest => image::imageops::FilterType::Nearest,
            ResampleFilter::Bilinear => image::imageops::FilterType::Triangle,
            ResampleFilter::Bicubic => image::imageops::FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// High-quality 2-D resampling service.
///
/// Implementations receive a logical RGBA image and must return one of
/// exactly `width x height`.
pub trait Resampler: Send + Sync {
    fn resample(&self, source: &RgbaImage, width: u32, height: u32) -> RgbaImage;
}

/// [`Resampler`] backed by `image::imageops::resize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilteredResampler {
    pub filter: ResampleFilter,
}

impl FilteredResampler {
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }
}

impl Resampler for FilteredResampler {
    fn resample(&self, source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        image::imageops::resize(source, width, height, self.filter.to_image_filter())
    }
}

/// Resize with bicubic interpolation.
///
/// # Arguments
///
/// * `buffer` - Source image (either format)
/// * `width` - Target width, 1 to [`MAX_DIMENSION`]
/// * `height` - Target height, 1 to [`MAX_DIMENSION`]
///
/// # Returns
///
/// A new `Argb32` buffer of exactly `width x height`.
///
/// # Errors
///
/// Returns `PixelError::InvalidDimension` if either side is out of range.
pub fn resize_filtered(
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, PixelError> {
    resize_filtered_with(buffer, width, height, &FilteredResampler::default())
}

/// [`resize_filtered`] through a caller-supplied [`Resampler`].
pub fn resize_filtered_with(
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
    resampler: &dyn Resampler,
) -> Result<PixelBuffer, PixelError> {
    resize_filtered_within(buffer, width, height, resampler, MAX_DIMENSION)
}

pub(crate) fn resize_filtered_within(
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
    resampler: &dyn Resampler,
    max_dimension: u32,
) -> Result<PixelBuffer, PixelError> {
    let (width, height) =
        validate_dimensions(i64::from(width), i64::from(height), max_dimension)?;
    log::debug!(
        "resize (filtered) {}x{} -> {width}x{height}",
        buffer.width(),
        buffer.height()
    );

    let resampled = resampler.resample(&buffer.to_rgba_image(), width, height);
    if resampled.dimensions() != (width, height) {
        return Err(PixelError::LengthMismatch {
            expected: width as usize * height as usize * 4,
            actual: resampled.as_raw().len(),
        });
    }
    PixelBuffer::from_rgba_image(&resampled)
}

/// Resize by nearest-neighbour sampling.
///
/// For output pixel `(j, i)` the source is
/// `(min(floor(j / scale_x), w - 1), min(floor(i / scale_y), h - 1))` with
/// `scale = new / old`. Pixels are copied byte for byte.
///
/// # Returns
///
/// A new `Rgb24` buffer of exactly `width x height`. An `Argb32` source is
/// converted first (alpha dropped).
///
/// # Errors
///
/// Returns `PixelError::InvalidDimension` if either side is out of range.
pub fn resize_nearest(
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, PixelError> {
    resize_nearest_within(buffer, width, height, MAX_DIMENSION)
}

pub(crate) fn resize_nearest_within(
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
    max_dimension: u32,
) -> Result<PixelBuffer, PixelError> {
    let (width, height) =
        validate_dimensions(i64::from(width), i64::from(height), max_dimension)?;
    log::debug!(
        "resize (nearest) {}x{} -> {width}x{height}",
        buffer.width(),
        buffer.height()
    );

    let source = match buffer.format() {
        PixelFormat::Rgb24 => Cow::Borrowed(buffer),
        PixelFormat::Argb32 => Cow::Owned(buffer.convert(PixelFormat::Rgb24)),
    };
    let source: &PixelBuffer = &source;
    let (src_w, src_h) = (buffer.width() as usize, buffer.height() as usize);
    let scale_x = width as f32 / src_w as f32;
    let scale_y = height as f32 / src_h as f32;

    render(width, height, PixelFormat::Rgb24, |col, row, pixel| {
        let src_x = ((col as f32 / scale_x) as usize).min(src_w - 1);
        let src_y = ((row as f32 / scale_y) as usize).min(src_h - 1);
        pixel.copy_from_slice(source.pixel(src_x, src_y));
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: output dimensions always equal the request.
        #[test]
        fn prop_nearest_exact_dimensions(
            (src_w, src_h) in (1u32..=40, 1u32..=40),
            (dst_w, dst_h) in (1u32..=120, 1u32..=120),
        ) {
            let img = PixelBuffer::new(src_w, src_h, PixelFormat::Rgb24).unwrap();
            let resized = resize_nearest(&img, dst_w, dst_h).unwrap();
            prop_assert_eq!(resized.dimensions(), (dst_w, dst_h));

            let back = resize_nearest(&resized, src_w, src_h).unwrap();
            prop_assert_eq!(back.dimensions(), (src_w, src_h));
        }

        /// Property: every output pixel is a copy of some source pixel.
        #[test]
        fn prop_nearest_copies_source_values(
            (src_w, src_h) in (1u32..=12, 1u32..=12),
            (dst_w, dst_h) in (1u32..=30, 1u32..=30),
        ) {
            let mut img = PixelBuffer::new(src_w, src_h, PixelFormat::Rgb24).unwrap();
            for y in 0..src_h as usize {
                for x in 0..src_w as usize {
                    img.set_rgba(x, y, [x as u8, y as u8, 0, 255]);
                }
            }
            let resized = resize_nearest(&img, dst_w, dst_h).unwrap();
            for y in 0..dst_h as usize {
                for x in 0..dst_w as usize {
                    let [r, g, _, _] = resized.rgba_at(x, y);
                    prop_assert!(u32::from(r) < src_w && u32::from(g) < src_h);
                }
            }
        }
    }
}
