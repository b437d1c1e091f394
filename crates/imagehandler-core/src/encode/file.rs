//! Saving buffers to disk in the format named by the file extension.

use std::io::Cursor;
use std::path::Path;

use image::DynamicImage;

use super::{encode_bmp, encode_jpeg, encode_png, encode_tiff, EncodeError};
use crate::buffer::PixelBuffer;
use crate::decode::DEFAULT_DPI;
use crate::format::{extension_of, ImageFileFormat};

/// Encode `buffer` as `format`.
///
/// Every format except GIF stores the resolution. JPEG drops alpha; the
/// other formats keep it when the buffer has it (GIF is always written with
/// alpha).
///
/// # Errors
///
/// Returns `EncodeError::EncodingFailed` if the codec rejects the image.
pub fn encode_buffer(
    buffer: &PixelBuffer,
    format: ImageFileFormat,
    dpi_x: f32,
    dpi_y: f32,
    jpeg_quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        ImageFileFormat::Jpeg => encode_jpeg(buffer, dpi_x, dpi_y, jpeg_quality),
        ImageFileFormat::Png => encode_png(buffer, dpi_x, dpi_y),
        ImageFileFormat::Bmp => encode_bmp(buffer, dpi_x, dpi_y),
        ImageFileFormat::Tiff => encode_tiff(buffer, dpi_x, dpi_y),
        ImageFileFormat::Gif => encode_gif(buffer, dpi_x, dpi_y),
    }
}

fn encode_gif(buffer: &PixelBuffer, dpi_x: f32, dpi_y: f32) -> Result<Vec<u8>, EncodeError> {
    if dpi_x != DEFAULT_DPI || dpi_y != DEFAULT_DPI {
        log::warn!("GIF output does not store resolution; {dpi_x}x{dpi_y} dpi dropped");
    }

    let img = DynamicImage::ImageRgba8(buffer.to_rgba_image());
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFileFormat::Gif.to_image_format())
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(out.into_inner())
}

/// Encode and write `buffer` to `path`, choosing the format by extension.
///
/// # Errors
///
/// - `EncodeError::UnsupportedExtension` if the extension is not supported.
/// - `EncodeError::EncodingFailed` if the codec fails.
/// - `EncodeError::IoError` if the file cannot be written.
pub fn save_buffer(
    buffer: &PixelBuffer,
    dpi_x: f32,
    dpi_y: f32,
    path: impl AsRef<Path>,
    jpeg_quality: u8,
) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let format = ImageFileFormat::from_path(path).ok_or_else(|| {
        log::warn!("refusing to save {}: unsupported extension", path.display());
        EncodeError::UnsupportedExtension(extension_of(path))
    })?;

    let bytes = encode_buffer(buffer, format, dpi_x, dpi_y, jpeg_quality)?;
    std::fs::write(path, &bytes)
        .map_err(|e| EncodeError::IoError(format!("{}: {e}", path.display())))?;
    log::debug!(
        "saved {}x{} as {format:?} ({} bytes) to {}",
        buffer.width(),
        buffer.height(),
        bytes.len(),
        path.display()
    );
    Ok(())
}
