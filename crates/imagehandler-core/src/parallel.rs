//! Data-parallel pixel map, the one parallel primitive the engine builds on.
//!
//! [`map_pixels`] hands every pixel of a destination buffer to a closure,
//! exactly once, on rayon worker threads. Rows are split with
//! `par_chunks_mut(stride)` and pixels with `chunks_exact_mut(bpp)` over the
//! meaningful part of each row, so every invocation owns a disjoint byte range
//! and no locking is needed. Row padding is never handed out.
//!
//! The closure may only read state captured at call start (typically a source
//! buffer borrowed immutably). Visiting order is unspecified and there is no
//! early exit: a map always runs to completion.
//!
//! Work runs on the current rayon pool; wrap the call in
//! `ThreadPool::install` to confine it to a dedicated pool.

use rayon::prelude::*;

use crate::buffer::{PixelBuffer, PixelError, PixelFormat};

/// Visit every pixel of `dst` in parallel.
///
/// `f(col, row, pixel)` receives the pixel's physical bytes, exactly
/// `bytes_per_pixel` long. For an in-place transform the slice holds the
/// current value; for a freshly allocated buffer it holds zeros.
pub fn map_pixels<F>(dst: &mut PixelBuffer, f: F)
where
    F: Fn(usize, usize, &mut [u8]) + Sync,
{
    let bpp = dst.bytes_per_pixel();
    let row_bytes = dst.row_bytes();
    let stride = dst.stride();

    dst.bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(row, line)| {
            for (col, pixel) in line[..row_bytes].chunks_exact_mut(bpp).enumerate() {
                f(col, row, pixel);
            }
        });
}

/// Allocate a `width x height` buffer and fill it with [`map_pixels`].
pub fn render<F>(
    width: u32,
    height: u32,
    format: PixelFormat,
    f: F,
) -> Result<PixelBuffer, PixelError>
where
    F: Fn(usize, usize, &mut [u8]) + Sync,
{
    let mut dst = PixelBuffer::new(width, height, format)?;
    map_pixels(&mut dst, f);
    Ok(dst)
}
