//! In-place grayscale conversion.

use crate::buffer::{PixelBuffer, BLUE, GREEN, RED};
use crate::parallel::map_pixels;

/// BT.601 luma weights in thousandths (0.299, 0.587, 0.114).
const WEIGHT_R: u32 = 299;
const WEIGHT_G: u32 = 587;
const WEIGHT_B: u32 = 114;

/// `floor(0.299 R + 0.587 G + 0.114 B)`.
///
/// Evaluated in integer thousandths so the floor is exact: a gray pixel
/// `(v, v, v)` always maps to `v`, which keeps grayscale idempotent.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = WEIGHT_R * u32::from(r) + WEIGHT_G * u32::from(g) + WEIGHT_B * u32::from(b);
    (weighted / 1000) as u8
}

/// Replace every pixel's colour channels with its luma.
///
/// Dimensions and format are unchanged; alpha (for `Argb32`) is untouched.
pub fn to_grayscale(buffer: &mut PixelBuffer) {
    log::debug!(
        "grayscale {}x{} {:?}",
        buffer.width(),
        buffer.height(),
        buffer.format()
    );
    map_pixels(buffer, |_, _, pixel| {
        let y = luma(pixel[RED], pixel[GREEN], pixel[BLUE]);
        pixel[BLUE] = y;
        pixel[GREEN] = y;
        pixel[RED] = y;
    });
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::PixelFormat;
    use proptest::prelude::*;

    /// Strategy for a small buffer of random pixels in either format.
    fn buffer_strategy() -> impl Strategy<Value = PixelBuffer> {
        (1u32..=12, 1u32..=12, prop::bool::ANY).prop_flat_map(|(w, h, alpha)| {
            let format = if alpha {
                PixelFormat::Argb32
            } else {
                PixelFormat::Rgb24
            };
            let stride = format.min_stride(w);
            prop::collection::vec(any::<u8>(), stride * h as usize).prop_map(move |bytes| {
                PixelBuffer::from_raw(w, h, format, stride, bytes).unwrap()
            })
        })
    }

    proptest! {
        /// Property: applying grayscale twice equals applying it once.
        #[test]
        fn prop_grayscale_idempotent(buf in buffer_strategy()) {
            let mut once = buf.clone();
            to_grayscale(&mut once);
            let mut twice = once.clone();
            to_grayscale(&mut twice);
            prop_assert_eq!(once, twice);
        }

        /// Property: output colour channels are equal for every pixel.
        #[test]
        fn prop_channels_equal(buf in buffer_strategy()) {
            let mut gray = buf.clone();
            to_grayscale(&mut gray);
            for row in 0..gray.height() as usize {
                for col in 0..gray.width() as usize {
                    let [r, g, b, _] = gray.rgba_at(col, row);
                    prop_assert!(r == g && g == b);
                }
            }
        }
    }
}
