//! Decoding image files into pixel buffers, with resolution from metadata.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag, Value};
use image::ImageReader;
use png::{PixelDimensions, Unit};

use super::{DecodeError, DecodedImage, DEFAULT_DPI, METRES_PER_INCH};
use crate::buffer::PixelBuffer;
use crate::format::{extension_of, ImageFileFormat};

const CM_PER_INCH: f32 = 2.54;

/// JFIF APP0 segment at the start of a JPEG: SOI, APP0, length, identifier.
const JFIF_PREFIX: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
const JFIF_IDENTIFIER: &[u8; 5] = b"JFIF\0";

/// BMP file header magic and the BITMAPINFOHEADER density fields.
const BMP_MAGIC: &[u8; 2] = b"BM";
const BMP_INFO_HEADER_LEN: u32 = 40;
const BMP_X_DENSITY: usize = 38;
const BMP_Y_DENSITY: usize = 42;

/// Decode an image file.
///
/// The extension must be one of [`crate::format::SUPPORTED_EXTENSIONS`];
/// the actual codec is chosen from the file contents. The whole file is read
/// into memory and the handle closed before decoding.
///
/// # Errors
///
/// - `DecodeError::UnsupportedExtension` for any other extension.
/// - `DecodeError::IoError` if the file cannot be read.
/// - `DecodeError::CorruptedFile` if the codec rejects the contents.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedImage, DecodeError> {
    let path = path.as_ref();
    if ImageFileFormat::from_path(path).is_none() {
        log::warn!("refusing to open {}: unsupported extension", path.display());
        return Err(DecodeError::UnsupportedExtension(extension_of(path)));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| DecodeError::IoError(format!("{}: {e}", path.display())))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    decode_bytes(&bytes)
}

/// Decode an in-memory image file.
///
/// Images with an alpha channel become `Argb32` buffers, all others `Rgb24`.
/// Resolution is taken from [`read_dpi`], falling back to [`DEFAULT_DPI`].
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let buffer = PixelBuffer::from_dynamic_image(&img)?;
    let (dpi_x, dpi_y) = read_dpi(bytes).unwrap_or((DEFAULT_DPI, DEFAULT_DPI));
    log::debug!(
        "decoded {}x{} {:?} at {dpi_x}x{dpi_y} dpi",
        buffer.width(),
        buffer.height(),
        buffer.format()
    );

    Ok(DecodedImage {
        buffer,
        dpi_x,
        dpi_y,
    })
}

/// Read the resolution stored in an image file, in dots per inch.
///
/// Sources are tried in order: EXIF (JPEG, TIFF, PNG `eXIf`), the JFIF
/// density, the PNG `pHYs` chunk and the BMP header. Returns `None` if the
/// file has no usable resolution.
pub fn read_dpi(bytes: &[u8]) -> Option<(f32, f32)> {
    exif_dpi(bytes)
        .or_else(|| jfif_dpi(bytes))
        .or_else(|| png_dpi(bytes))
        .or_else(|| bmp_dpi(bytes))
}

fn exif_dpi(bytes: &[u8]) -> Option<(f32, f32)> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;

    let rational = |tag| match exif.get_field(tag, In::PRIMARY).map(|f| &f.value) {
        Some(Value::Rational(values)) => values.first().map(|r| r.to_f64() as f32),
        _ => None,
    };
    let x = rational(Tag::XResolution)?;
    let y = rational(Tag::YResolution).unwrap_or(x);

    // ResolutionUnit: 2 = inches (default), 3 = centimetres
    let unit = exif
        .get_field(Tag::ResolutionUnit, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(2);
    let scale = match unit {
        3 => CM_PER_INCH,
        2 => 1.0,
        _ => return None,
    };

    to_dpi(x * scale, y * scale)
}

fn jfif_dpi(bytes: &[u8]) -> Option<(f32, f32)> {
    if bytes.len() < 18 || bytes[..4] != JFIF_PREFIX || &bytes[6..11] != JFIF_IDENTIFIER {
        return None;
    }
    let x = f32::from(u16::from_be_bytes([bytes[14], bytes[15]]));
    let y = f32::from(u16::from_be_bytes([bytes[16], bytes[17]]));

    // Units: 0 = aspect ratio only, 1 = dots per inch, 2 = dots per cm
    match bytes[13] {
        1 => to_dpi(x, y),
        2 => to_dpi(x * CM_PER_INCH, y * CM_PER_INCH),
        _ => None,
    }
}

fn png_dpi(bytes: &[u8]) -> Option<(f32, f32)> {
    let reader = png::Decoder::new(Cursor::new(bytes)).read_info().ok()?;
    match reader.info().pixel_dims {
        Some(PixelDimensions {
            xppu,
            yppu,
            unit: Unit::Meter,
        }) => to_dpi(ppm_to_dpi(xppu as f32), ppm_to_dpi(yppu as f32)),
        _ => None,
    }
}

fn bmp_dpi(bytes: &[u8]) -> Option<(f32, f32)> {
    if bytes.len() < BMP_Y_DENSITY + 4 || &bytes[..2] != BMP_MAGIC {
        return None;
    }
    // OS/2 core headers have no density fields
    let header_len = u32::from_le_bytes(bytes[14..18].try_into().ok()?);
    if header_len < BMP_INFO_HEADER_LEN {
        return None;
    }
    let x = i32::from_le_bytes(bytes[BMP_X_DENSITY..BMP_X_DENSITY + 4].try_into().ok()?);
    let y = i32::from_le_bytes(bytes[BMP_Y_DENSITY..BMP_Y_DENSITY + 4].try_into().ok()?);
    to_dpi(ppm_to_dpi(x as f32), ppm_to_dpi(y as f32))
}

/// Pixels per metre to DPI, snapped to a whole DPI when within one pixel per
/// metre of it.
fn ppm_to_dpi(ppm: f32) -> f32 {
    let dpi = ppm * METRES_PER_INCH;
    let whole = dpi.round();
    if (dpi - whole).abs() <= METRES_PER_INCH {
        whole
    } else {
        dpi
    }
}

fn to_dpi(x: f32, y: f32) -> Option<(f32, f32)> {
    (x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0).then_some((x, y))
}
