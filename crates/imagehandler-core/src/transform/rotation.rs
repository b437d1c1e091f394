//! Arbitrary-angle rotation with nearest-pixel inverse mapping.
//!
//! # Algorithm
//!
//! 1. The four corners are rotated to find the output canvas and the offset
//!    that moves its top-left corner to `(0, 0)` (see
//!    [`crate::geometry::rotated_bounds`]).
//! 2. For each output pixel `(j, i)` the inverse rotation finds its source:
//!    ```text
//!    src = rotate_point((j - offset_x, i - offset_y), -angle)
//!    ```
//! 3. In-bounds sources are copied byte for byte. Everything else becomes
//!    [`OUTSIDE_PIXEL`], white with zero alpha.
//!
//! Inverse mapping guarantees every output pixel is written, so the rotated
//! image has no holes.

use std::borrow::Cow;

use crate::buffer::{PixelBuffer, PixelError, PixelFormat};
use crate::geometry::{rotated_bounds, Point, Rotation};
use crate::parallel::render;

use super::{validate_dimensions, MAX_DIMENSION};

/// Physical bytes written where the rotated image does not cover the canvas.
pub const OUTSIDE_PIXEL: [u8; 4] = [0xFF, 0xFF, 0xFF, 0x00];

/// Rotate an image clockwise by `angle_degrees` onto an expanded canvas.
///
/// The angle is reduced modulo 360 first. The result is always `Argb32`;
/// an `Rgb24` source is converted (opaque) before sampling.
///
/// # Errors
///
/// - `PixelError::InvalidAngle` if the angle is NaN or infinite.
/// - `PixelError::InvalidDimension` if the rotated canvas would exceed
///   [`MAX_DIMENSION`] on either side.
///
/// # Example
///
/// ```ignore
/// let rotated = rotate(&buffer, 90.0)?;
/// assert_eq!(rotated.dimensions(), (buffer.height(), buffer.width()));
/// ```
pub fn rotate(buffer: &PixelBuffer, angle_degrees: f64) -> Result<PixelBuffer, PixelError> {
    rotate_within(buffer, angle_degrees, MAX_DIMENSION)
}

/// [`rotate`] with a caller-chosen canvas limit.
pub(crate) fn rotate_within(
    buffer: &PixelBuffer,
    angle_degrees: f64,
    max_dimension: u32,
) -> Result<PixelBuffer, PixelError> {
    if !angle_degrees.is_finite() {
        return Err(PixelError::InvalidAngle(angle_degrees));
    }
    let angle = angle_degrees % 360.0;

    let bounds = rotated_bounds(buffer.width(), buffer.height(), angle);
    let (dst_w, dst_h) = validate_dimensions(bounds.width, bounds.height, max_dimension)?;
    log::debug!(
        "rotate {}x{} by {angle} -> {dst_w}x{dst_h}",
        buffer.width(),
        buffer.height()
    );

    let source = match buffer.format() {
        PixelFormat::Argb32 => Cow::Borrowed(buffer),
        PixelFormat::Rgb24 => Cow::Owned(buffer.convert(PixelFormat::Argb32)),
    };
    let source: &PixelBuffer = &source;
    let (src_w, src_h) = (i64::from(buffer.width()), i64::from(buffer.height()));
    let inverse = Rotation::new(-angle);

    render(dst_w, dst_h, PixelFormat::Argb32, |col, row, pixel| {
        let src = inverse.apply(Point::new(
            col as i64 - bounds.offset_x,
            row as i64 - bounds.offset_y,
        ));
        if (0..src_w).contains(&src.x) && (0..src_h).contains(&src.y) {
            pixel.copy_from_slice(source.pixel(src.x as usize, src.y as usize));
        } else {
            pixel.copy_from_slice(&OUTSIDE_PIXEL);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height, PixelFormat::Argb32).unwrap();
        for y in 0..height as usize {
            for x in 0..width as usize {
                buf.set_rgba(x, y, [x as u8, y as u8, (x * y) as u8, 200]);
            }
        }
        buf
    }

    #[test]
    fn test_no_rotation_is_exact() {
        let img = test_image(10, 5);
        let result = rotate(&img, 0.0).unwrap();
        assert!(result.same_pixels(&img));
    }

    #[test]
    fn test_full_turn_is_exact() {
        let img = test_image(7, 3);
        let result = rotate(&img, 360.0).unwrap();
        assert!(result.same_pixels(&img));
    }

    #[test]
    fn test_90_degree_rotation_dimensions() {
        let img = test_image(10, 5);
        let result = rotate(&img, 90.0).unwrap();
        assert_eq!(result.dimensions(), (5, 10));
    }

    #[test]
    fn test_90_degree_rotation_moves_pixels_clockwise() {
        let img = test_image(10, 5);
        let result = rotate(&img, 90.0).unwrap();
        // Source top-left ends up at the top-right of the rotated canvas
        assert_eq!(result.rgba_at(4, 0), img.rgba_at(0, 0));
        // Source bottom-left ends up at the top-left
        assert_eq!(result.rgba_at(0, 0), img.rgba_at(0, 4));
        // Source top-right ends up at the bottom-right
        assert_eq!(result.rgba_at(4, 9), img.rgba_at(9, 0));
    }

    #[test]
    fn test_180_degree_rotation_reverses() {
        let img = test_image(6, 4);
        let result = rotate(&img, 180.0).unwrap();
        assert_eq!(result.dimensions(), (6, 4));
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(result.rgba_at(x, y), img.rgba_at(5 - x, 3 - y));
            }
        }
    }

    #[test]
    fn test_angle_reduced_modulo_360() {
        let img = test_image(10, 5);
        let a = rotate(&img, 450.0).unwrap();
        let b = rotate(&img, 90.0).unwrap();
        assert!(a.same_pixels(&b));
    }

    #[test]
    fn test_uncovered_pixels_are_transparent_white() {
        let img = test_image(20, 20);
        let result = rotate(&img, 45.0).unwrap();
        assert!(result.width() > 20 && result.height() > 20);
        // Canvas corners lie outside the rotated square
        assert_eq!(result.pixel(0, 0), &OUTSIDE_PIXEL);
        let (w, h) = (result.width() as usize, result.height() as usize);
        assert_eq!(result.pixel(w - 1, h - 1), &OUTSIDE_PIXEL);
    }

    #[test]
    fn test_rgb24_source_becomes_argb32() {
        let img = PixelBuffer::filled(4, 4, PixelFormat::Rgb24, [10, 20, 30, 255]).unwrap();
        let result = rotate(&img, 0.0).unwrap();
        assert_eq!(result.format(), PixelFormat::Argb32);
        assert_eq!(result.rgba_at(3, 3), [10, 20, 30, 255]);
    }

    #[test]
    fn test_single_pixel() {
        let img = test_image(1, 1);
        let result = rotate(&img, 33.0).unwrap();
        assert_eq!(result.dimensions(), (1, 1));
        assert_eq!(result.rgba_at(0, 0), img.rgba_at(0, 0));
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let img = test_image(4, 4);
        assert!(matches!(
            rotate(&img, f64::NAN),
            Err(PixelError::InvalidAngle(_))
        ));
        assert!(rotate(&img, f64::INFINITY).is_err());
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let img = test_image(200, 100);
        let result = rotate_within(&img, 45.0, 150);
        assert!(matches!(result, Err(PixelError::InvalidDimension { .. })));
    }

    #[test]
    fn test_source_untouched() {
        let img = test_image(9, 4);
        let before = img.clone();
        let _ = rotate(&img, 30.0).unwrap();
        assert_eq!(img, before);
    }
}
