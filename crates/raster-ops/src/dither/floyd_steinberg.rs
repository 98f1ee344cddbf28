//! Floyd-Steinberg error diffusion on channel 0.

use crate::buffer::PixelBuffer;

use super::{DiffusionKernel, FLOYD_STEINBERG};

/// Level above which a pixel is quantized to 0.
pub const FLOYD_STEINBERG_MIDPOINT: u8 = 0x80;

/// Floyd-Steinberg error diffusion.
///
/// Scans left-to-right, top-to-bottom. Only pixels whose four forward
/// neighbours are all inside the image are quantized; the bottom row and
/// the leftmost and rightmost columns keep whatever error has been pushed
/// into them but are never binarized.
///
/// # Polarity
///
/// Quantization is inverted with respect to the input: channel 0 above
/// [`FLOYD_STEINBERG_MIDPOINT`] maps to 0 and anything else maps to 255.
/// The signed error `old - new` is then diffused with the usual weights:
///
/// ```text
///        X   7
///    3   5   1      (/16)
/// ```
///
/// Each neighbour's channel 0 plus its fractional share of the error is
/// saturated to 0..=255, truncated, and written to every channel of that
/// neighbour.
pub fn floyd_steinberg(buffer: &mut PixelBuffer) {
    diffuse(buffer, &FLOYD_STEINBERG);
}

fn diffuse(buffer: &mut PixelBuffer, kernel: &DiffusionKernel) {
    let width = buffer.width();
    let height = buffer.height();
    let channels = buffer.channels();

    for y in 0..height {
        for x in 0..width {
            if !kernel.fits(x, y, width, height) {
                continue;
            }

            let idx = buffer.offset(x, y);
            let old = buffer.data()[idx] as i32;
            let new = if old > FLOYD_STEINBERG_MIDPOINT as i32 {
                0x00
            } else {
                0xFF
            };
            buffer.data_mut()[idx..idx + channels].fill(new as u8);
            let error = old - new;

            for &(dx, dy, weight) in kernel.entries {
                let nx = (x as isize + dx) as usize;
                let ny = (y as isize + dy) as usize;
                let nidx = buffer.offset(nx, ny);
                let current = buffer.data()[nidx] as f64;
                let share = error as f64 * weight as f64 / kernel.divisor as f64;
                let value = (current + share).clamp(0.0, 255.0) as u8;
                buffer.data_mut()[nidx..nidx + channels].fill(value);
            }
        }
    }
}
