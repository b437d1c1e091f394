//! Error type for engine-level operations.

use thiserror::Error;

use crate::buffer::PixelError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Any failure reported by [`crate::engine::RasterEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Pixel(#[from] PixelError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The worker pool could not be started.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_transparently() {
        let err: EngineError = PixelError::InvalidDimension {
            width: 10000,
            height: 1,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: 10000x1 is outside the allowed range"
        );

        let err: EngineError = EncodeError::DraftWithoutPath.into();
        assert!(matches!(err, EngineError::Encode(_)));
    }
}
