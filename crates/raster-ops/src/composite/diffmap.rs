//! Per-channel difference maps between two images.

use crate::buffer::PixelBuffer;
use crate::point::wrapping_scale;

/// Replace `a` with `|a - b|` over the region both images share.
///
/// The shared region is the per-dimension minimum of width, height and
/// channel count. Pixels and channels of `a` outside it keep their values.
pub fn diffmap(a: &mut PixelBuffer, b: &PixelBuffer) {
    absolute_difference(a, b);
}

/// [`diffmap`], then stretch the result for visibility.
///
/// After differencing, **every** byte of `a` (not only the shared region) is
/// multiplied by `255 / max(1, largest, scale)` in integer arithmetic, where
/// `largest` is the biggest difference found. The multiply wraps modulo 256
/// like [`color_mask`](crate::point::color_mask), so bytes outside the
/// shared region can overflow. Returns the factor that was applied.
pub fn diffmap_with_scale(a: &mut PixelBuffer, b: &PixelBuffer, scale: u8) -> u32 {
    let largest = absolute_difference(a, b);
    let factor = 255 / largest.max(scale).max(1) as u32;

    for value in a.data_mut() {
        *value = wrapping_scale(*value, factor);
    }
    tracing::debug!(largest, scale, factor, "Scaled diffmap");
    factor
}

/// Write `|a - b|` into `a` over the shared extent; returns the largest difference.
fn absolute_difference(a: &mut PixelBuffer, b: &PixelBuffer) -> u8 {
    let width = a.width().min(b.width());
    let height = a.height().min(b.height());
    let channels = a.channels().min(b.channels());
    let mut largest = 0u8;

    for y in 0..height {
        for x in 0..width {
            let theirs = b.pixel(x, y);
            let ours = a.pixel_mut(x, y);
            for c in 0..channels {
                let diff = ours[c].abs_diff(theirs[c]);
                ours[c] = diff;
                largest = largest.max(diff);
            }
        }
    }
    largest
}
