//! Stride-aware pixel storage.
//!
//! A [`PixelBuffer`] owns a contiguous byte array laid out as `height` rows of
//! `stride` bytes. Only the first `width * bytes_per_pixel` bytes of each row
//! hold pixel data; the remainder is alignment padding that transforms never
//! touch.
//!
//! # Channel Order
//!
//! The physical byte order is the reverse of the format name:
//! - `Rgb24` pixels are stored as `B, G, R`
//! - `Argb32` pixels are stored as `B, G, R, A`
//!
//! The logical accessors ([`PixelBuffer::rgba_at`], [`PixelBuffer::set_rgba`])
//! and the `image` crate conversions always speak `R, G, B, A`.

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parallel::map_pixels;

/// Physical index of the blue channel.
pub const BLUE: usize = 0;
/// Physical index of the green channel.
pub const GREEN: usize = 1;
/// Physical index of the red channel.
pub const RED: usize = 2;
/// Physical index of the alpha channel (`Argb32` only).
pub const ALPHA: usize = 3;

/// Row alignment applied by [`PixelFormat::min_stride`].
const ROW_ALIGNMENT: usize = 4;

/// Errors raised when constructing or transforming pixel buffers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PixelError {
    /// Width or height is outside the accepted range.
    #[error("Invalid dimensions: {width}x{height} is outside the allowed range")]
    InvalidDimension { width: i64, height: i64 },

    /// Row stride is shorter than one row of pixel data.
    #[error("Invalid stride: {stride} bytes is shorter than a {row_bytes}-byte row")]
    InvalidStride { stride: usize, row_bytes: usize },

    /// `stride * height` overflows the address space.
    #[error("Buffer too large: {height} rows of {stride} bytes")]
    TooLarge { stride: usize, height: u32 },

    /// Raw byte data does not match the declared layout.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Rotation angle is NaN or infinite.
    #[error("Invalid rotation angle: {0}")]
    InvalidAngle(f64),
}

/// Pixel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 24-bit colour, stored `B, G, R`.
    Rgb24,
    /// 32-bit colour with alpha, stored `B, G, R, A`.
    #[default]
    Argb32,
}

impl PixelFormat {
    /// Number of bytes one pixel occupies.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb24 => 3,
            PixelFormat::Argb32 => 4,
        }
    }

    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Argb32)
    }

    /// Smallest stride for a row of `width` pixels, rounded up to a 4-byte boundary.
    #[inline]
    pub fn min_stride(self, width: u32) -> usize {
        let row_bytes = width as usize * self.bytes_per_pixel();
        row_bytes.div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT
    }

    /// Convert a logical `[r, g, b, a]` colour into physical byte order.
    ///
    /// Only the first `bytes_per_pixel` entries of the result are meaningful.
    #[inline]
    pub fn to_physical(self, rgba: [u8; 4]) -> [u8; 4] {
        let [r, g, b, a] = rgba;
        [b, g, r, a]
    }

    /// Read a logical `[r, g, b, a]` colour from physical pixel bytes.
    ///
    /// `Rgb24` pixels report an opaque alpha of 255.
    #[inline]
    pub fn to_logical(self, pixel: &[u8]) -> [u8; 4] {
        let alpha = match self {
            PixelFormat::Rgb24 => 255,
            PixelFormat::Argb32 => pixel[ALPHA],
        };
        [pixel[RED], pixel[GREEN], pixel[BLUE], alpha]
    }
}

/// An owned, row-major pixel grid with an explicit row stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer with the minimum aligned stride.
    ///
    /// # Errors
    ///
    /// Returns `PixelError::InvalidDimension` if width or height is zero.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, PixelError> {
        Self::with_stride(width, height, format, format.min_stride(width))
    }

    /// Create a zero-filled buffer with an explicit stride.
    ///
    /// # Errors
    ///
    /// - `PixelError::InvalidDimension` if width or height is zero.
    /// - `PixelError::InvalidStride` if `stride` cannot hold one row.
    /// - `PixelError::TooLarge` if `stride * height` overflows.
    pub fn with_stride(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
    ) -> Result<Self, PixelError> {
        check_layout(width, height, format, stride)?;
        Ok(Self::zeroed(width, height, format, stride))
    }

    /// Wrap existing physical-order bytes laid out with `stride`.
    ///
    /// # Errors
    ///
    /// Fails if the layout is invalid or `bytes.len() != stride * height`.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        bytes: Vec<u8>,
    ) -> Result<Self, PixelError> {
        let expected = check_layout(width, height, format, stride)?;
        if bytes.len() != expected {
            return Err(PixelError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            stride,
            bytes,
        })
    }

    /// Create a buffer where every pixel holds the logical colour `rgba`.
    pub fn filled(
        width: u32,
        height: u32,
        format: PixelFormat,
        rgba: [u8; 4],
    ) -> Result<Self, PixelError> {
        let mut buffer = Self::new(width, height, format)?;
        let physical = format.to_physical(rgba);
        let bpp = format.bytes_per_pixel();
        map_pixels(&mut buffer, |_, _, pixel| {
            pixel.copy_from_slice(&physical[..bpp])
        });
        Ok(buffer)
    }

    /// Copy a decoded RGB image into a new `Rgb24` buffer.
    pub fn from_rgb_image(image: &RgbImage) -> Result<Self, PixelError> {
        let (width, height) = image.dimensions();
        let mut buffer = Self::new(width, height, PixelFormat::Rgb24)?;
        map_pixels(&mut buffer, |col, row, pixel| {
            let Rgb([r, g, b]) = *image.get_pixel(col as u32, row as u32);
            pixel[BLUE] = b;
            pixel[GREEN] = g;
            pixel[RED] = r;
        });
        Ok(buffer)
    }

    /// Copy a decoded RGBA image into a new `Argb32` buffer.
    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self, PixelError> {
        let (width, height) = image.dimensions();
        let mut buffer = Self::new(width, height, PixelFormat::Argb32)?;
        map_pixels(&mut buffer, |col, row, pixel| {
            let Rgba([r, g, b, a]) = *image.get_pixel(col as u32, row as u32);
            pixel[BLUE] = b;
            pixel[GREEN] = g;
            pixel[RED] = r;
            pixel[ALPHA] = a;
        });
        Ok(buffer)
    }

    /// Copy any decoded image, choosing `Argb32` when it carries alpha and
    /// `Rgb24` otherwise.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Self, PixelError> {
        if image.color().has_alpha() {
            Self::from_rgba_image(&image.to_rgba8())
        } else {
            Self::from_rgb_image(&image.to_rgb8())
        }
    }

    /// Export the pixels as a tightly packed logical RGB image (alpha dropped).
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b, _] = self.rgba_at(x as usize, y as usize);
            Rgb([r, g, b])
        })
    }

    /// Export the pixels as a tightly packed logical RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(self.rgba_at(x as usize, y as usize))
        })
    }

    /// Convert to another pixel format.
    ///
    /// `Rgb24 -> Argb32` makes every pixel opaque; `Argb32 -> Rgb24` drops
    /// alpha. Converting to the same format returns a copy.
    pub fn convert(&self, format: PixelFormat) -> PixelBuffer {
        if format == self.format {
            return self.clone();
        }
        let mut converted =
            Self::zeroed(self.width, self.height, format, format.min_stride(self.width));
        let bpp = format.bytes_per_pixel();
        map_pixels(&mut converted, |col, row, pixel| {
            let physical = format.to_physical(self.rgba_at(col, row));
            pixel.copy_from_slice(&physical[..bpp]);
        });
        converted
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes from the start of one row to the start of the next.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Number of meaningful bytes at the start of each row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// The whole backing array, padding included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Byte offset of pixel `(col, row)` in the backing array.
    #[inline]
    pub fn offset(&self, col: usize, row: usize) -> usize {
        row * self.stride + col * self.bytes_per_pixel()
    }

    /// Pixel bytes of row `row`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    #[inline]
    pub fn scanline(&self, row: usize) -> &[u8] {
        let start = row * self.stride;
        &self.bytes[start..start + self.row_bytes()]
    }

    /// Mutable pixel bytes of row `row`, without padding.
    #[inline]
    pub fn scanline_mut(&mut self, row: usize) -> &mut [u8] {
        let start = row * self.stride;
        let end = start + self.row_bytes();
        &mut self.bytes[start..end]
    }

    /// Iterate over every scanline from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height as usize).map(move |row| self.scanline(row))
    }

    /// Physical bytes of pixel `(col, row)`.
    #[inline]
    pub fn pixel(&self, col: usize, row: usize) -> &[u8] {
        let start = self.offset(col, row);
        &self.bytes[start..start + self.bytes_per_pixel()]
    }

    #[inline]
    pub fn pixel_mut(&mut self, col: usize, row: usize) -> &mut [u8] {
        let start = self.offset(col, row);
        let end = start + self.bytes_per_pixel();
        &mut self.bytes[start..end]
    }

    /// Logical `[r, g, b, a]` colour of pixel `(col, row)`.
    #[inline]
    pub fn rgba_at(&self, col: usize, row: usize) -> [u8; 4] {
        self.format.to_logical(self.pixel(col, row))
    }

    /// Write a logical `[r, g, b, a]` colour; alpha is ignored for `Rgb24`.
    #[inline]
    pub fn set_rgba(&mut self, col: usize, row: usize, rgba: [u8; 4]) {
        let physical = self.format.to_physical(rgba);
        let bpp = self.bytes_per_pixel();
        self.pixel_mut(col, row).copy_from_slice(&physical[..bpp]);
    }

    /// Compare dimensions, format and pixel bytes, ignoring row padding.
    pub fn same_pixels(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
            && self.format == other.format
            && self.rows().zip(other.rows()).all(|(a, b)| a == b)
    }

    /// Allocate without validation. Callers guarantee a valid layout.
    fn zeroed(width: u32, height: u32, format: PixelFormat, stride: usize) -> Self {
        Self {
            width,
            height,
            format,
            stride,
            bytes: vec![0u8; stride * height as usize],
        }
    }
}

/// Validate a layout and return its length in bytes.
fn check_layout(
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
) -> Result<usize, PixelError> {
    if width == 0 || height == 0 {
        return Err(PixelError::InvalidDimension {
            width: i64::from(width),
            height: i64::from(height),
        });
    }
    let row_bytes = width as usize * format.bytes_per_pixel();
    if stride < row_bytes {
        return Err(PixelError::InvalidStride { stride, row_bytes });
    }
    stride
        .checked_mul(height as usize)
        .ok_or(PixelError::TooLarge { stride, height })
}
