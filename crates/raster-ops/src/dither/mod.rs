//! Binarization of the luminance signal held in channel 0.
//!
//! Callers normally convert to grayscale first; every algorithm here reads
//! channel 0 only and writes the result to all channels.
//!
//! - [`threshold`]: fixed level
//! - [`random`] / [`random_with_rng`]: per-pixel random level
//! - [`floyd_steinberg`]: error diffusion
//!
//! [`DitherMethod`] selects one of these at runtime.

mod floyd_steinberg;
mod kernel;
mod random;
mod threshold;

pub use floyd_steinberg::{floyd_steinberg, FLOYD_STEINBERG_MIDPOINT};
pub use kernel::*;
pub use random::{random, random_with_rng};
pub use threshold::{threshold, DEFAULT_THRESHOLD};

use crate::buffer::PixelBuffer;

/// Dithering algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherMethod {
    /// Fixed threshold on channel 0.
    Threshold(u8),
    /// Uniform random threshold per pixel.
    Random,
    /// Floyd-Steinberg error diffusion.
    FloydSteinberg,
}

impl Default for DitherMethod {
    fn default() -> Self {
        DitherMethod::Threshold(DEFAULT_THRESHOLD)
    }
}

impl DitherMethod {
    /// Run the selected algorithm on `buffer`.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        match *self {
            DitherMethod::Threshold(level) => threshold(buffer, level),
            DitherMethod::Random => random(buffer),
            DitherMethod::FloydSteinberg => floyd_steinberg(buffer),
        }
    }
}
