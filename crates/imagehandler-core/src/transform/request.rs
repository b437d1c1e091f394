//! Resize targets expressed in pixels or percent, with optional aspect lock.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelError;

use super::{validate_dimensions, MAX_DIMENSION};

/// Unit of the values held by a [`ResizeRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeUnit {
    #[default]
    Pixels,
    Percent,
}

/// A requested resize of an image of known size.
///
/// Values are kept signed and unvalidated so a caller can hold whatever the
/// user typed; [`ResizeRequest::validate`] turns them into a target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeRequest {
    pub source_width: u32,
    pub source_height: u32,
    pub unit: ResizeUnit,
    pub width: i64,
    pub height: i64,
}

impl ResizeRequest {
    /// A pixel request initialised to the source size.
    pub fn new(source_width: u32, source_height: u32) -> Self {
        Self {
            source_width,
            source_height,
            unit: ResizeUnit::Pixels,
            width: i64::from(source_width),
            height: i64::from(source_height),
        }
    }

    pub fn pixels(source_width: u32, source_height: u32, width: i64, height: i64) -> Self {
        Self {
            unit: ResizeUnit::Pixels,
            width,
            height,
            ..Self::new(source_width, source_height)
        }
    }

    pub fn percent(source_width: u32, source_height: u32, width: i64, height: i64) -> Self {
        Self {
            unit: ResizeUnit::Percent,
            width,
            height,
            ..Self::new(source_width, source_height)
        }
    }

    /// Set the width and derive the height from the source aspect ratio.
    ///
    /// In pixels the height becomes `source_height * width / source_width`
    /// (integer division); in percent it takes the same value as the width.
    pub fn with_width_locked(mut self, width: i64) -> Self {
        self.width = width;
        self.height = match self.unit {
            ResizeUnit::Pixels => locked_side(width, self.source_height, self.source_width),
            ResizeUnit::Percent => width,
        };
        self
    }

    /// Set the height and derive the width from the source aspect ratio.
    pub fn with_height_locked(mut self, height: i64) -> Self {
        self.height = height;
        self.width = match self.unit {
            ResizeUnit::Pixels => locked_side(height, self.source_width, self.source_height),
            ResizeUnit::Percent => height,
        };
        self
    }

    /// Target size in pixels, before range checking.
    ///
    /// A percentage is applied as `source * pct / 100` only when it is
    /// positive; zero or negative percentages are passed through unchanged
    /// so validation rejects them.
    pub fn resolve(&self) -> (i64, i64) {
        match self.unit {
            ResizeUnit::Pixels => (self.width, self.height),
            ResizeUnit::Percent => (
                scale_percent(self.source_width, self.width),
                scale_percent(self.source_height, self.height),
            ),
        }
    }

    /// Resolve and check the target against [`MAX_DIMENSION`].
    ///
    /// # Errors
    ///
    /// Returns `PixelError::InvalidDimension` if either side is outside
    /// `[1, MAX_DIMENSION]`.
    pub fn validate(&self) -> Result<(u32, u32), PixelError> {
        let (width, height) = self.resolve();
        validate_dimensions(width, height, MAX_DIMENSION)
    }
}

fn locked_side(value: i64, other_source: u32, this_source: u32) -> i64 {
    if this_source == 0 {
        return value;
    }
    value.saturating_mul(i64::from(other_source)) / i64::from(this_source)
}

fn scale_percent(source: u32, pct: i64) -> i64 {
    if pct > 0 {
        i64::from(source).saturating_mul(pct) / 100
    } else {
        pct
    }
}
