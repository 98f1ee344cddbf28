//! raster-ops: in-place transforms over interleaved 8-bit pixel buffers
//!
//! Every operation takes a [`PixelBuffer`] by mutable reference and changes
//! it in place. Operations are free functions that never call each other, so
//! callers compose them in whatever order they need.
//!
//! # Quick Start
//!
//! ```
//! use raster_ops::{crop, grayscale_luminance, threshold, PixelBuffer};
//!
//! let mut image = PixelBuffer::filled(4, 4, 3, 200).unwrap();
//! grayscale_luminance(&mut image).unwrap();
//! crop(&mut image, 0, 0, 2, 2);
//! threshold(&mut image, 127);
//!
//! assert_eq!(image.width(), 2);
//! assert!(image.data().iter().all(|&v| v == 255));
//! ```
//!
//! # Modules
//!
//! | Module | Operations |
//! |--------|------------|
//! | [`geometry`] | flip horizontal/vertical, crop |
//! | [`point`] | grayscale (average, luminance), color mask |
//! | [`convolve`] | 2D kernel convolution with two boundary policies |
//! | [`dither`] | threshold, random, Floyd-Steinberg |
//! | [`composite`] | opaque and alpha overlay, text, diffmap |
//! | [`stego`] | length-prefixed LSB embedding |
//!
//! # Errors
//!
//! Operations that can refuse their input return [`OpError`] and leave the
//! buffer untouched. Out-of-range coordinates (crop windows, overlay
//! positions, glyph placement) are never errors: they clip.
//!
//! # Wrapping arithmetic
//!
//! [`color_mask`] and [`diffmap_with_scale`] multiply bytes modulo 256
//! instead of saturating. See [`point::wrapping_scale`].

pub mod buffer;
pub mod composite;
pub mod convolve;
pub mod dither;
pub mod error;
pub mod geometry;
pub mod point;
pub mod stego;


pub use buffer::{PixelBuffer, MAX_CHANNELS};
pub use composite::{
    diffmap, diffmap_with_scale, overlay, overlay_text, overlay_with_alpha, GlyphBitmap,
    GlyphSource, TextColor, TextReport,
};
pub use convolve::{convolve, convolve_color_channels, BoundaryPolicy, Kernel};
pub use dither::{
    floyd_steinberg, random, random_with_rng, threshold, DitherMethod, DEFAULT_THRESHOLD,
};
pub use error::{MissingGlyph, OpError};
pub use geometry::{crop, flip_horizontal, flip_vertical};
pub use point::{color_mask, grayscale_average, grayscale_luminance};
