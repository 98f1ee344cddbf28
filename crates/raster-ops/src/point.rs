//! Per-pixel transforms with no neighbourhood.
//!
//! Grayscale conversion and color masking need at least three color
//! channels. On a narrower buffer they return [`OpError::ChannelCount`] and
//! leave the pixels alone.

use crate::buffer::PixelBuffer;
use crate::error::OpError;

/// Rec. 709 luma weights for R, G, B.
pub const LUMA_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Multiply a byte by `factor`, keeping the low eight bits of the product.
///
/// Products wrap modulo 256 rather than saturating: `200 * 2` becomes 144.
/// Both [`color_mask`] and
/// [`diffmap_with_scale`](crate::composite::diffmap_with_scale) scale this
/// way.
#[inline]
pub fn wrapping_scale(value: u8, factor: u32) -> u8 {
    ((value as u32).wrapping_mul(factor) % 256) as u8
}

/// Set channels 0-2 of every pixel to the integer mean of R, G and B.
pub fn grayscale_average(buffer: &mut PixelBuffer) -> Result<(), OpError> {
    buffer.require_channels(3)?;
    let channels = buffer.channels();

    for px in buffer.data_mut().chunks_exact_mut(channels) {
        let sum = px[0] as u16 + px[1] as u16 + px[2] as u16;
        px[..3].fill((sum / 3) as u8);
    }
    Ok(())
}

/// Set channels 0-2 of every pixel to its truncated Rec. 709 luminance.
pub fn grayscale_luminance(buffer: &mut PixelBuffer) -> Result<(), OpError> {
    buffer.require_channels(3)?;
    let channels = buffer.channels();

    for px in buffer.data_mut().chunks_exact_mut(channels) {
        let luma = LUMA_WEIGHTS[0] * px[0] as f64
            + LUMA_WEIGHTS[1] * px[1] as f64
            + LUMA_WEIGHTS[2] * px[2] as f64;
        px[..3].fill(luma as u8);
    }
    Ok(())
}

/// Scale the R, G and B channels by integer factors.
///
/// The factors multiply raw byte values and the products wrap modulo 256
/// (see [`wrapping_scale`]). A factor of 1 leaves a channel unchanged and 0
/// clears it.
pub fn color_mask(buffer: &mut PixelBuffer, r: u32, g: u32, b: u32) -> Result<(), OpError> {
    buffer.require_channels(3)?;
    let channels = buffer.channels();

    for px in buffer.data_mut().chunks_exact_mut(channels) {
        px[0] = wrapping_scale(px[0], r);
        px[1] = wrapping_scale(px[1], g);
        px[2] = wrapping_scale(px[2], b);
    }
    Ok(())
}
