//! Test images and constants.

use imagegene::raster_ops::PixelBuffer;

/// Message used by steganography tests
pub const SECRET: &str = "The eagle lands at dawn";

/// Horizontal gray ramp, 0 on the left to 255 on the right
pub fn gray_ramp(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height);
    for _ in 0..height {
        for x in 0..width {
            data.push((x * 255 / width.saturating_sub(1).max(1)) as u8);
        }
    }
    PixelBuffer::from_raw(width, height, 1, data).unwrap()
}

/// RGB image with a distinct color per pixel
pub fn rgb_pattern(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8]);
        }
    }
    PixelBuffer::from_raw(width, height, 3, data).unwrap()
}

/// Solid RGBA image
pub fn solid_rgba(width: usize, height: usize, rgba: [u8; 4]) -> PixelBuffer {
    let data = rgba.repeat(width * height);
    PixelBuffer::from_raw(width, height, 4, data).unwrap()
}
