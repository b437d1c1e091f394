//! The image being edited: a pixel buffer plus where it came from.
//!
//! An [`ImageAsset`] owns its buffer exclusively. Transforms that keep the
//! size and format run in place; rotate and resize produce a new buffer that
//! replaces the current one. Either way the previous pixels are kept as a
//! single undo snapshot, and the pixels as loaded (or last saved) are kept
//! for [`ImageAsset::reload`].

use std::path::{Path, PathBuf};

use crate::buffer::{PixelBuffer, PixelError, PixelFormat};
use crate::decode::{decode_file, DecodeError, DecodedImage};
use crate::encode::{save_buffer, EncodeError};
use crate::transform::{self, validate_dimensions, MAX_DIMENSION};

/// Resolution of a blank canvas.
pub const BLANK_DPI: f32 = 72.0;

/// Path reported by a canvas that has never been saved.
pub const UNTITLED: &str = "Untitled";

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// An image open for editing.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    buffer: PixelBuffer,
    dpi_x: f32,
    dpi_y: f32,
    source_path: PathBuf,
    draft: bool,
    backup: Option<PixelBuffer>,
    original: PixelBuffer,
}

impl ImageAsset {
    /// Decode the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `DecodeError` if the extension is unsupported or the file
    /// cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let decoded = decode_file(path)?;
        Ok(Self::from_decoded(decoded, path))
    }

    /// A white, opaque `Argb32` canvas at 72 DPI that has never been saved.
    ///
    /// # Errors
    ///
    /// Returns `PixelError::InvalidDimension` unless both sides lie in
    /// `[1, MAX_DIMENSION]`.
    pub fn blank(width: u32, height: u32) -> Result<Self, PixelError> {
        let (width, height) =
            validate_dimensions(i64::from(width), i64::from(height), MAX_DIMENSION)?;
        let buffer = PixelBuffer::filled(width, height, PixelFormat::Argb32, WHITE)?;
        Ok(Self {
            original: buffer.clone(),
            buffer,
            dpi_x: BLANK_DPI,
            dpi_y: BLANK_DPI,
            source_path: PathBuf::from(UNTITLED),
            draft: true,
            backup: None,
        })
    }

    /// Wrap an already decoded image loaded from `path`.
    pub fn from_decoded(decoded: DecodedImage, path: impl Into<PathBuf>) -> Self {
        Self {
            original: decoded.buffer.clone(),
            buffer: decoded.buffer,
            dpi_x: decoded.dpi_x,
            dpi_y: decoded.dpi_y,
            source_path: path.into(),
            draft: false,
            backup: None,
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Horizontal and vertical resolution in dots per inch.
    pub fn dpi(&self) -> (f32, f32) {
        (self.dpi_x, self.dpi_y)
    }

    pub fn set_dpi(&mut self, dpi_x: f32, dpi_y: f32) {
        self.dpi_x = dpi_x;
        self.dpi_y = dpi_y;
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// True for a blank canvas that has not been saved yet.
    pub fn is_draft(&self) -> bool {
        self.draft
    }

    /// True if [`ImageAsset::undo`] has something to restore.
    pub fn can_undo(&self) -> bool {
        self.backup.is_some()
    }

    /// Convert to grayscale in place.
    pub fn to_grayscale(&mut self) {
        self.edit_in_place(transform::to_grayscale);
    }

    /// Add `delta` to every colour channel, in place.
    pub fn change_brightness(&mut self, delta: i32) {
        self.edit_in_place(|buffer| transform::change_brightness(buffer, delta));
    }

    /// Rotate clockwise by `angle_degrees`; see [`transform::rotate`].
    pub fn rotate(&mut self, angle_degrees: f64) -> Result<(), PixelError> {
        self.replace_with(|buffer| transform::rotate(buffer, angle_degrees))
    }

    /// Bicubic resize; see [`transform::resize_filtered`].
    pub fn resize_filtered(&mut self, width: u32, height: u32) -> Result<(), PixelError> {
        self.replace_with(|buffer| transform::resize_filtered(buffer, width, height))
    }

    /// Nearest-neighbour resize; see [`transform::resize_nearest`].
    pub fn resize_nearest(&mut self, width: u32, height: u32) -> Result<(), PixelError> {
        self.replace_with(|buffer| transform::resize_nearest(buffer, width, height))
    }

    /// Snapshot the buffer, then run `edit` on it.
    pub(crate) fn edit_in_place(&mut self, edit: impl FnOnce(&mut PixelBuffer)) {
        self.backup = Some(self.buffer.clone());
        edit(&mut self.buffer);
    }

    /// Build a new buffer from the current one and swap it in.
    ///
    /// On error nothing changes, including the undo snapshot.
    pub(crate) fn replace_with(
        &mut self,
        produce: impl FnOnce(&PixelBuffer) -> Result<PixelBuffer, PixelError>,
    ) -> Result<(), PixelError> {
        let next = produce(&self.buffer)?;
        self.backup = Some(std::mem::replace(&mut self.buffer, next));
        Ok(())
    }

    /// Restore the buffer from before the last edit.
    ///
    /// The snapshot is kept, so undoing twice gives the same result. Returns
    /// `false` if there has been no edit.
    pub fn undo(&mut self) -> bool {
        match &self.backup {
            Some(backup) => {
                self.buffer = backup.clone();
                log::debug!("undo -> {}x{}", self.width(), self.height());
                true
            }
            None => false,
        }
    }

    /// Discard all edits since the image was opened or last saved.
    pub fn reload(&mut self) {
        self.buffer = self.original.clone();
        log::debug!("reload {}", self.source_path.display());
    }

    /// Save to `path` and make it the asset's path.
    ///
    /// Afterwards the asset is no longer a draft and [`ImageAsset::reload`]
    /// returns to the saved pixels.
    ///
    /// # Errors
    ///
    /// Returns an `EncodeError` if the extension is unsupported or writing
    /// fails; the asset is unchanged in that case.
    pub fn save_as(&mut self, path: impl AsRef<Path>, jpeg_quality: u8) -> Result<(), EncodeError> {
        let path = path.as_ref();
        save_buffer(&self.buffer, self.dpi_x, self.dpi_y, path, jpeg_quality)?;
        self.source_path = path.to_path_buf();
        self.draft = false;
        self.original = self.buffer.clone();
        Ok(())
    }

    /// Save back to the asset's own path.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::DraftWithoutPath` for a draft; otherwise as
    /// [`ImageAsset::save_as`].
    pub fn save(&mut self, jpeg_quality: u8) -> Result<(), EncodeError> {
        if self.draft {
            return Err(EncodeError::DraftWithoutPath);
        }
        let path = self.source_path.clone();
        self.save_as(path, jpeg_quality)
    }
}
