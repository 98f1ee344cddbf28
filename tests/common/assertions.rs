//! Assertion helpers for tests.

use imagegene::raster_ops::PixelBuffer;
use pretty_assertions::assert_eq;

/// Assert the buffer has the expected shape
pub fn assert_shape(buffer: &PixelBuffer, width: usize, height: usize, channels: usize) {
    assert_eq!(
        (buffer.width(), buffer.height(), buffer.channels()),
        (width, height, channels),
        "Unexpected image shape"
    );
}

/// Assert every byte is 0 or 255
pub fn assert_binary(buffer: &PixelBuffer) {
    let stray = buffer.data().iter().find(|&&v| v != 0 && v != 255);
    assert!(stray.is_none(), "Expected a binary image, found value {stray:?}");
}

/// Assert the file at `path` starts with the PNG signature
pub fn assert_png_file(path: &std::path::Path) {
    let bytes = std::fs::read(path).expect("Failed to read output");
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "Expected PNG at {}, got {} bytes starting with {:?}",
        path.display(),
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
