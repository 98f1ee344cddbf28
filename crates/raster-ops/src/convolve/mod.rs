//! Neighbourhood transforms: 2D kernel convolution on one channel.
//!
//! # Formula
//!
//! For a kernel anchored at `(ar, ac)` the output of pixel `(x, y)` is
//!
//! ```text
//! out(x, y) = sum over cells (i, j) of  k[i][j] * in(x - (j - ac), y - (i - ar))
//! ```
//!
//! i.e. a true convolution (the kernel is mirrored relative to a
//! correlation). The sum is rounded half away from zero and saturated to
//! 0..=255.
//!
//! # Boundaries
//!
//! Source coordinates that leave the image are resolved by a
//! [`BoundaryPolicy`]: [`ClampToZero`](BoundaryPolicy::ClampToZero) drops
//! the term, [`ClampToBorder`](BoundaryPolicy::ClampToBorder) reads the
//! nearest edge pixel instead.
//!
//! # Isolation
//!
//! Results are written to a separate plane and copied back once the whole
//! channel has been computed, so a single call never reads a pixel it has
//! already updated.

mod kernel;

pub use kernel::Kernel;

use crate::buffer::PixelBuffer;
use crate::error::OpError;

/// How out-of-range source pixels contribute to a convolution sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Terms whose source pixel lies outside the image contribute nothing.
    #[default]
    ClampToZero,
    /// Out-of-range coordinates are clamped to the nearest valid row/column.
    ClampToBorder,
}

/// Convolve one channel of the buffer with `kernel`.
///
/// Other channels are left untouched. Returns
/// [`OpError::ChannelOutOfRange`] without modifying the buffer when
/// `channel` does not exist.
pub fn convolve(
    buffer: &mut PixelBuffer,
    channel: usize,
    kernel: &Kernel,
    policy: BoundaryPolicy,
) -> Result<(), OpError> {
    let channels = buffer.channels();
    if channel >= channels {
        return Err(OpError::ChannelOutOfRange { channel, channels });
    }

    let width = buffer.width() as isize;
    let height = buffer.height() as isize;
    let (anchor_row, anchor_col) = kernel.anchor();
    let (anchor_row, anchor_col) = (anchor_row as isize, anchor_col as isize);

    let source = buffer.data();
    let sample = |x: isize, y: isize| source[((y * width + x) as usize) * channels + channel];

    let mut plane = Vec::with_capacity(buffer.width() * buffer.height());
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f64;
            for i in 0..kernel.height() {
                let mut row = y - (i as isize - anchor_row);
                match policy {
                    BoundaryPolicy::ClampToZero if row < 0 || row >= height => continue,
                    BoundaryPolicy::ClampToZero => {}
                    BoundaryPolicy::ClampToBorder => row = row.clamp(0, height - 1),
                }
                for j in 0..kernel.width() {
                    let mut col = x - (j as isize - anchor_col);
                    match policy {
                        BoundaryPolicy::ClampToZero if col < 0 || col >= width => continue,
                        BoundaryPolicy::ClampToZero => {}
                        BoundaryPolicy::ClampToBorder => col = col.clamp(0, width - 1),
                    }
                    sum += kernel.weight(i, j) * sample(col, row) as f64;
                }
            }
            plane.push(sum.round().clamp(0.0, 255.0) as u8);
        }
    }

    for (px, value) in buffer
        .data_mut()
        .chunks_exact_mut(channels)
        .zip(plane)
    {
        px[channel] = value;
    }
    Ok(())
}

/// Convolve every color channel, leaving alpha alone.
///
/// Uses [`PixelBuffer::color_channels`] to decide which channels carry color.
pub fn convolve_color_channels(
    buffer: &mut PixelBuffer,
    kernel: &Kernel,
    policy: BoundaryPolicy,
) -> Result<(), OpError> {
    for channel in 0..buffer.color_channels() {
        convolve(buffer, channel, kernel, policy)?;
    }
    Ok(())
}
