//! Configured entry point for editing: runs [`EditCommand`]s against an
//! [`ImageAsset`] on the engine's worker pool.

use std::path::Path;

use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::asset::ImageAsset;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::transform::{
    change_brightness, resize_filtered_within, resize_nearest_within, rotate_within,
    to_grayscale, validate_dimensions, FilteredResampler, Resampler,
};

/// One editing operation, as issued by a shell.
///
/// Sizes are signed so out-of-range input reaches validation instead of
/// failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    Grayscale,
    Brightness { delta: i32 },
    Rotate { angle: f64 },
    ResizeFiltered { width: i64, height: i64 },
    ResizeNearest { width: i64, height: i64 },
}

/// Applies edits using a fixed configuration.
pub struct RasterEngine {
    config: EngineConfig,
    pool: Option<ThreadPool>,
    resampler: Box<dyn Resampler>,
}

impl RasterEngine {
    /// Build an engine; starts a dedicated pool if `worker_threads` is set.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ThreadPool` if the pool cannot be started.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let config = config.normalized();
        let pool = match config.worker_threads {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("imagehandler-worker-{i}"))
                    .build()
                    .map_err(|e| EngineError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };
        log::debug!("engine ready: {config:?}");
        Ok(Self {
            resampler: Box::new(FilteredResampler::new(config.resample_filter)),
            config,
            pool,
        })
    }

    /// Replace the resampler used by filtered resize.
    pub fn with_resampler(mut self, resampler: impl Resampler + 'static) -> Self {
        self.resampler = Box::new(resampler);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply `command` to `asset`.
    ///
    /// On success the previous pixels become the asset's undo snapshot. On
    /// error the asset is unchanged.
    pub fn apply(&self, asset: &mut ImageAsset, command: &EditCommand) -> Result<(), EngineError> {
        log::debug!("apply {command:?} to {}", asset.source_path().display());
        let max = self.config.max_dimension;
        self.install(|| -> Result<(), EngineError> {
            match *command {
                EditCommand::Grayscale => {
                    asset.edit_in_place(to_grayscale);
                    Ok(())
                }
                EditCommand::Brightness { delta } => {
                    asset.edit_in_place(|buffer| change_brightness(buffer, delta));
                    Ok(())
                }
                EditCommand::Rotate { angle } => {
                    asset.replace_with(|buffer| rotate_within(buffer, angle, max))?;
                    Ok(())
                }
                EditCommand::ResizeFiltered { width, height } => {
                    let (width, height) = validate_dimensions(width, height, max)?;
                    let resampler = self.resampler.as_ref();
                    asset.replace_with(|buffer| {
                        resize_filtered_within(buffer, width, height, resampler, max)
                    })?;
                    Ok(())
                }
                EditCommand::ResizeNearest { width, height } => {
                    let (width, height) = validate_dimensions(width, height, max)?;
                    asset.replace_with(|buffer| {
                        resize_nearest_within(buffer, width, height, max)
                    })?;
                    Ok(())
                }
            }
        })
    }

    /// Open an image file.
    pub fn open(&self, path: impl AsRef<Path>) -> Result<ImageAsset, EngineError> {
        Ok(ImageAsset::open(path)?)
    }

    /// A blank canvas, limited by the configured maximum dimension.
    pub fn blank(&self, width: u32, height: u32) -> Result<ImageAsset, EngineError> {
        validate_dimensions(
            i64::from(width),
            i64::from(height),
            self.config.max_dimension,
        )?;
        Ok(ImageAsset::blank(width, height)?)
    }

    /// Save the asset to its own path at the configured JPEG quality.
    pub fn save(&self, asset: &mut ImageAsset) -> Result<(), EngineError> {
        Ok(asset.save(self.config.jpeg_quality)?)
    }

    /// Save the asset to `path` at the configured JPEG quality.
    pub fn save_as(
        &self,
        asset: &mut ImageAsset,
        path: impl AsRef<Path>,
    ) -> Result<(), EngineError> {
        Ok(asset.save_as(path, self.config.jpeg_quality)?)
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{PixelError, PixelFormat};
    use crate::encode::EncodeError;
    use image::RgbaImage;

    fn engine() -> RasterEngine {
        RasterEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_string(&EditCommand::Brightness { delta: -20 }).unwrap();
        assert_eq!(json, r#"{"op":"brightness","delta":-20}"#);

        let cmd: EditCommand =
            serde_json::from_str(r#"{"op":"resize_nearest","width":10,"height":-1}"#).unwrap();
        assert_eq!(
            cmd,
            EditCommand::ResizeNearest {
                width: 10,
                height: -1
            }
        );

        let cmd: EditCommand = serde_json::from_str(r#"{"op":"grayscale"}"#).unwrap();
        assert_eq!(cmd, EditCommand::Grayscale);
    }

    #[test]
    fn test_apply_sequence() {
        let engine = engine();
        let mut asset = engine.blank(10, 5).unwrap();

        engine
            .apply(&mut asset, &EditCommand::Brightness { delta: -55 })
            .unwrap();
        engine.apply(&mut asset, &EditCommand::Grayscale).unwrap();
        assert_eq!(asset.buffer().rgba_at(0, 0), [200, 200, 200, 255]);

        engine
            .apply(&mut asset, &EditCommand::Rotate { angle: 90.0 })
            .unwrap();
        assert_eq!((asset.width(), asset.height()), (5, 10));

        engine
            .apply(
                &mut asset,
                &EditCommand::ResizeFiltered {
                    width: 20,
                    height: 40,
                },
            )
            .unwrap();
        assert_eq!(asset.buffer().dimensions(), (20, 40));

        engine
            .apply(
                &mut asset,
                &EditCommand::ResizeNearest {
                    width: 3,
                    height: 3,
                },
            )
            .unwrap();
        assert_eq!(asset.buffer().dimensions(), (3, 3));
        assert_eq!(asset.buffer().format(), PixelFormat::Rgb24);
    }

    #[test]
    fn test_negative_size_rejected_without_change() {
        let engine = engine();
        let mut asset = engine.blank(4, 4).unwrap();
        let before = asset.buffer().clone();
        let result = engine.apply(
            &mut asset,
            &EditCommand::ResizeFiltered {
                width: -1,
                height: 4,
            },
        );
        assert!(matches!(
            result,
            Err(EngineError::Pixel(PixelError::InvalidDimension {
                width: -1,
                height: 4
            }))
        ));
        assert_eq!(asset.buffer(), &before);
        assert!(!asset.can_undo());
    }

    #[test]
    fn test_configured_limit_applies() {
        let mut config = EngineConfig::default();
        config.max_dimension = 64;
        let engine = RasterEngine::new(config).unwrap();

        assert!(engine.blank(65, 10).is_err());
        let mut asset = engine.blank(60, 60).unwrap();
        assert!(engine
            .apply(&mut asset, &EditCommand::Rotate { angle: 45.0 })
            .is_err());
        assert!(engine
            .apply(
                &mut asset,
                &EditCommand::ResizeNearest {
                    width: 100,
                    height: 10
                }
            )
            .is_err());
        assert_eq!(asset.buffer().dimensions(), (60, 60));
    }

    #[test]
    fn test_dedicated_pool() {
        let mut config = EngineConfig::default();
        config.worker_threads = Some(2);
        let engine = RasterEngine::new(config).unwrap();
        let mut asset = engine.blank(64, 64).unwrap();
        engine.apply(&mut asset, &EditCommand::Grayscale).unwrap();
        engine
            .apply(&mut asset, &EditCommand::Rotate { angle: 30.0 })
            .unwrap();
        assert!(asset.width() > 64);
    }

    /// Fills the output with a marker colour so its use is visible.
    struct MarkerResampler;

    impl Resampler for MarkerResampler {
        fn resample(&self, _: &RgbaImage, width: u32, height: u32) -> RgbaImage {
            RgbaImage::from_pixel(width, height, image::Rgba([1, 2, 3, 4]))
        }
    }

    #[test]
    fn test_custom_resampler() {
        let engine = engine().with_resampler(MarkerResampler);
        let mut asset = engine.blank(8, 8).unwrap();
        engine
            .apply(
                &mut asset,
                &EditCommand::ResizeFiltered {
                    width: 2,
                    height: 2,
                },
            )
            .unwrap();
        assert_eq!(asset.buffer().rgba_at(1, 1), [1, 2, 3, 4]);
    }

    #[test]
    fn test_save_uses_config_and_reports_drafts() {
        let engine = engine();
        let mut asset = engine.blank(4, 4).unwrap();
        assert!(matches!(
            engine.save(&mut asset),
            Err(EngineError::Encode(EncodeError::DraftWithoutPath))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        engine.save_as(&mut asset, &path).unwrap();
        let reopened = engine.open(&path).unwrap();
        assert_eq!(reopened.dpi(), (72.0, 72.0));
        assert_eq!(reopened.buffer().dimensions(), (4, 4));
    }
}
