//! JPEG encoding with embedded resolution.
//!
//! The resolution is written as JFIF pixel density in dots per inch, so a
//! saved file reopens at the DPI it was saved with.

use std::io::Cursor;

use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};
use image::ExtendedColorType;
use image::ImageEncoder;

use super::EncodeError;
use crate::buffer::PixelBuffer;
use crate::decode::DEFAULT_DPI;

/// Encode a buffer to JPEG bytes.
///
/// # Arguments
///
/// * `buffer` - Source pixels (either format; alpha is dropped)
/// * `dpi_x`, `dpi_y` - Resolution stored in the JFIF header
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 60-80: Medium quality, acceptable for web
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(
    buffer: &PixelBuffer,
    dpi_x: f32,
    dpi_y: f32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let rgb = buffer.to_rgb_image();

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut out = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder.set_pixel_density(PixelDensity {
        density: (density(dpi_x), density(dpi_y)),
        unit: PixelDensityUnit::Inches,
    });

    encoder
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(out.into_inner())
}

/// JFIF density field for a DPI value; non-finite values use the default.
fn density(dpi: f32) -> u16 {
    let dpi = if dpi.is_finite() { dpi } else { DEFAULT_DPI };
    dpi.round().clamp(1.0, f32::from(u16::MAX)) as u16
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::PixelFormat;
    use proptest::prelude::*;

    proptest! {
        /// Property: Encoding always produces a complete JPEG stream.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (width, height) in (1u32..=50, 1u32..=50),
            quality in 1u8..=100,
        ) {
            let buffer = PixelBuffer::new(width, height, PixelFormat::Rgb24).unwrap();
            let jpeg_bytes = encode_jpeg(&buffer, 96.0, 96.0, quality).unwrap();

            prop_assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8], "Should have SOI marker");
            let len = jpeg_bytes.len();
            prop_assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9], "Should have EOI marker");
        }

        /// Property: Same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=20, 1u32..=20),
            quality in 1u8..=100,
        ) {
            let gray = [100, 100, 100, 255];
            let buffer = PixelBuffer::filled(width, height, PixelFormat::Rgb24, gray).unwrap();
            let first = encode_jpeg(&buffer, 72.0, 72.0, quality).unwrap();
            let second = encode_jpeg(&buffer, 72.0, 72.0, quality).unwrap();
            prop_assert_eq!(first, second, "Same input should produce same output");
        }
    }
}
