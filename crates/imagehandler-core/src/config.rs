//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::transform::{ResampleFilter, MAX_DIMENSION};

/// Settings for a [`crate::engine::RasterEngine`].
///
/// Every field has a default, so a partial serialized config is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest width or height a transform may produce (1 to 9999)
    pub max_dimension: u32,
    /// Worker threads for pixel maps; `None` uses rayon's global pool
    pub worker_threads: Option<usize>,
    /// JPEG quality used on save (1 to 100)
    pub jpeg_quality: u8,
    /// Filter used by filtered resize
    pub resample_filter: ResampleFilter,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            worker_threads: None,
            jpeg_quality: 90,
            resample_filter: ResampleFilter::Bicubic,
        }
    }
}

impl EngineConfig {
    /// Same as [`Default::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy with every field forced into its valid range.
    pub fn normalized(&self) -> Self {
        Self {
            max_dimension: self.max_dimension.clamp(1, MAX_DIMENSION),
            worker_threads: self.worker_threads.filter(|&n| n > 0),
            jpeg_quality: self.jpeg_quality.clamp(1, 100),
            resample_filter: self.resample_filter,
        }
    }
}
