//! In-place brightness adjustment.

use crate::buffer::{PixelBuffer, BLUE, RED};
use crate::parallel::map_pixels;

/// Lowest value a colour channel can take after a brightness change.
///
/// Channels are clamped to 1, not 0: an adjusted pixel is never full black.
pub const MIN_CHANNEL_VALUE: u8 = 1;

/// Add `delta` to the colour channels of every pixel.
///
/// Each channel becomes `clamp(channel + delta, 1, 255)`; alpha is never
/// touched. Any `delta` is accepted.
pub fn change_brightness(buffer: &mut PixelBuffer, delta: i32) {
    log::debug!(
        "brightness {delta:+} on {}x{} {:?}",
        buffer.width(),
        buffer.height(),
        buffer.format()
    );
    let delta = i64::from(delta);
    let (low, high) = (i64::from(MIN_CHANNEL_VALUE), i64::from(u8::MAX));
    map_pixels(buffer, |_, _, pixel| {
        for channel in &mut pixel[BLUE..=RED] {
            *channel = (i64::from(*channel) + delta).clamp(low, high) as u8;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelFormat;

    #[test]
    fn test_clamps_high() {
        let mut buf = PixelBuffer::filled(2, 2, PixelFormat::Argb32, [250, 250, 250, 128]).unwrap();
        change_brightness(&mut buf, 10);
        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(buf.rgba_at(col, row), [255, 255, 255, 128]);
            }
        }
    }

    #[test]
    fn test_clamps_low_to_one() {
        let mut buf = PixelBuffer::filled(2, 1, PixelFormat::Argb32, [5, 50, 100, 0]).unwrap();
        change_brightness(&mut buf, -60);
        assert_eq!(buf.rgba_at(0, 0), [1, 1, 40, 0]);
    }

    #[test]
    fn test_zero_delta_lifts_black_to_floor() {
        let mut buf = PixelBuffer::new(1, 1, PixelFormat::Argb32).unwrap();
        change_brightness(&mut buf, 0);
        assert_eq!(buf.pixel(0, 0), &[1, 1, 1, 0]);
    }

    #[test]
    fn test_extreme_deltas() {
        let mut buf = PixelBuffer::filled(1, 1, PixelFormat::Argb32, [1, 2, 3, 9]).unwrap();
        change_brightness(&mut buf, i32::MAX);
        assert_eq!(buf.rgba_at(0, 0), [255, 255, 255, 9]);
        change_brightness(&mut buf, i32::MIN);
        assert_eq!(buf.rgba_at(0, 0), [1, 1, 1, 9]);
    }

    #[test]
    fn test_rgb24_buffer() {
        let mut buf = PixelBuffer::filled(3, 3, PixelFormat::Rgb24, [10, 20, 30, 255]).unwrap();
        change_brightness(&mut buf, 5);
        assert_eq!(buf.pixel(2, 2), &[35, 25, 15]);
    }
}
