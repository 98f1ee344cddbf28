//! Random-threshold binarization.

use rand::Rng;

use crate::buffer::PixelBuffer;

/// Binarize each pixel against a fresh uniform draw in 0..=255.
///
/// Uses the thread-local generator; see [`random_with_rng`] for a
/// reproducible variant.
pub fn random(buffer: &mut PixelBuffer) {
    random_with_rng(buffer, &mut rand::thread_rng());
}

/// Binarize each pixel against draws from `rng`.
///
/// A pixel becomes all 255 when the draw is `<=` its channel 0 value and
/// all 0 otherwise, so brighter pixels turn white more often. A value of
/// 255 is always white; a value of 0 is white with probability 1/256.
pub fn random_with_rng<R: Rng + ?Sized>(buffer: &mut PixelBuffer, rng: &mut R) {
    let channels = buffer.channels();
    for px in buffer.data_mut().chunks_exact_mut(channels) {
        let draw: u8 = rng.gen();
        let value = if draw <= px[0] { 0xFF } else { 0x00 };
        px.fill(value);
    }
}
