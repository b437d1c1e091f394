//! PNG, BMP and TIFF encoding with embedded resolution.
//!
//! PNG and BMP store pixels per metre, TIFF stores a rational number of dots
//! per inch. Alpha is kept when the buffer has it.

use std::io::Cursor;

use image::DynamicImage;
use png::{BitDepth, ColorType, PixelDimensions, Unit};
use tiff::encoder::{colortype, Rational, TiffEncoder};
use tiff::tags::ResolutionUnit;

use super::EncodeError;
use crate::buffer::PixelBuffer;
use crate::decode::{DEFAULT_DPI, METRES_PER_INCH};
use crate::format::ImageFileFormat;

/// BITMAPINFOHEADER pixels-per-metre fields, after the 14-byte file header.
const BMP_X_DENSITY: usize = 38;
const BMP_Y_DENSITY: usize = 42;

/// TIFF resolutions are written in hundredths of a dot per inch.
const TIFF_DENSITY_SCALE: f32 = 100.0;

/// Encode a buffer to PNG bytes with a `pHYs` chunk.
pub fn encode_png(buffer: &PixelBuffer, dpi_x: f32, dpi_y: f32) -> Result<Vec<u8>, EncodeError> {
    let (color, data) = if buffer.format().has_alpha() {
        (ColorType::Rgba, buffer.to_rgba_image().into_raw())
    } else {
        (ColorType::Rgb, buffer.to_rgb_image().into_raw())
    };

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, buffer.width(), buffer.height());
    encoder.set_color(color);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_pixel_dims(Some(PixelDimensions {
        xppu: pixels_per_metre(dpi_x),
        yppu: pixels_per_metre(dpi_y),
        unit: Unit::Meter,
    }));

    let mut writer = encoder.write_header().map_err(encoding_failed)?;
    writer.write_image_data(&data).map_err(encoding_failed)?;
    writer.finish().map_err(encoding_failed)?;
    Ok(out)
}

/// Encode a buffer to BMP bytes with the header's pixels-per-metre set.
pub fn encode_bmp(buffer: &PixelBuffer, dpi_x: f32, dpi_y: f32) -> Result<Vec<u8>, EncodeError> {
    let img = if buffer.format().has_alpha() {
        DynamicImage::ImageRgba8(buffer.to_rgba_image())
    } else {
        DynamicImage::ImageRgb8(buffer.to_rgb_image())
    };

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFileFormat::Bmp.to_image_format())
        .map_err(encoding_failed)?;
    let mut bytes = out.into_inner();

    if bytes.len() < BMP_Y_DENSITY + 4 {
        return Err(EncodeError::EncodingFailed(format!(
            "BMP header is only {} bytes",
            bytes.len()
        )));
    }
    // Stored as signed 32-bit little-endian values
    let x = pixels_per_metre(dpi_x).min(i32::MAX as u32);
    let y = pixels_per_metre(dpi_y).min(i32::MAX as u32);
    bytes[BMP_X_DENSITY..BMP_X_DENSITY + 4].copy_from_slice(&x.to_le_bytes());
    bytes[BMP_Y_DENSITY..BMP_Y_DENSITY + 4].copy_from_slice(&y.to_le_bytes());
    Ok(bytes)
}

/// Encode a buffer to uncompressed TIFF bytes with resolution tags in inches.
pub fn encode_tiff(buffer: &PixelBuffer, dpi_x: f32, dpi_y: f32) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = buffer.dimensions();
    let mut out = Cursor::new(Vec::new());
    let mut encoder = TiffEncoder::new(&mut out).map_err(encoding_failed)?;

    if buffer.format().has_alpha() {
        let rgba = buffer.to_rgba_image();
        let mut image = encoder
            .new_image::<colortype::RGBA8>(width, height)
            .map_err(encoding_failed)?;
        image.resolution_unit(ResolutionUnit::Inch);
        image.x_resolution(tiff_resolution(dpi_x));
        image.y_resolution(tiff_resolution(dpi_y));
        image.write_data(rgba.as_raw()).map_err(encoding_failed)?;
    } else {
        let rgb = buffer.to_rgb_image();
        let mut image = encoder
            .new_image::<colortype::RGB8>(width, height)
            .map_err(encoding_failed)?;
        image.resolution_unit(ResolutionUnit::Inch);
        image.x_resolution(tiff_resolution(dpi_x));
        image.y_resolution(tiff_resolution(dpi_y));
        image.write_data(rgb.as_raw()).map_err(encoding_failed)?;
    }

    Ok(out.into_inner())
}

fn encoding_failed(e: impl std::fmt::Display) -> EncodeError {
    EncodeError::EncodingFailed(e.to_string())
}

fn finite_dpi(dpi: f32) -> f32 {
    if dpi.is_finite() && dpi > 0.0 {
        dpi
    } else {
        DEFAULT_DPI
    }
}

/// Pixels per metre for a DPI value, at least 1.
fn pixels_per_metre(dpi: f32) -> u32 {
    (finite_dpi(dpi) / METRES_PER_INCH)
        .round()
        .clamp(1.0, u32::MAX as f32) as u32
}

fn tiff_resolution(dpi: f32) -> Rational {
    let n = (finite_dpi(dpi) * TIFF_DENSITY_SCALE)
        .round()
        .clamp(1.0, u32::MAX as f32) as u32;
    Rational {
        n,
        d: TIFF_DENSITY_SCALE as u32,
    }
}
