//! Index-remapping transforms: flips and crop.
//!
//! None of these can fail. Crop windows that hang off the source image are
//! zero-filled where they have no source pixels.

use crate::buffer::PixelBuffer;

/// Mirror every row left-to-right, in place.
pub fn flip_horizontal(buffer: &mut PixelBuffer) {
    let width = buffer.width();
    let channels = buffer.channels();
    let stride = buffer.stride();
    if stride == 0 {
        return;
    }

    for row in buffer.data_mut().chunks_exact_mut(stride) {
        for x in 0..width / 2 {
            let mirror = width - 1 - x;
            let (left, right) = row.split_at_mut(mirror * channels);
            left[x * channels..(x + 1) * channels].swap_with_slice(&mut right[..channels]);
        }
    }
}

/// Mirror the image top-to-bottom, in place.
pub fn flip_vertical(buffer: &mut PixelBuffer) {
    let height = buffer.height();
    let stride = buffer.stride();
    if stride == 0 {
        return;
    }

    let data = buffer.data_mut();
    for y in 0..height / 2 {
        let mirror = height - 1 - y;
        let (top, bottom) = data.split_at_mut(mirror * stride);
        top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
    }
}

/// Replace the buffer with the `width x height` window whose top-left corner
/// is `(x, y)` in the source.
///
/// The result always has exactly the requested shape. Window pixels that
/// fall outside the source are zero, so a window entirely off the image
/// yields an all-zero buffer. A window whose byte size cannot be
/// represented is logged and leaves the buffer unchanged.
pub fn crop(buffer: &mut PixelBuffer, x: usize, y: usize, width: usize, height: usize) {
    let channels = buffer.channels();
    let Some(len) = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .filter(|&n| n <= isize::MAX as usize)
    else {
        tracing::warn!(width, height, channels, "Crop window too large, ignoring");
        return;
    };
    let mut cropped = vec![0u8; len];

    let copy_w = buffer.width().saturating_sub(x).min(width);
    let copy_h = buffer.height().saturating_sub(y).min(height);

    if copy_w > 0 {
        let row_bytes = copy_w * channels;
        for row in 0..copy_h {
            let src = buffer.offset(x, y + row);
            let dst = row * width * channels;
            cropped[dst..dst + row_bytes].copy_from_slice(&buffer.data()[src..src + row_bytes]);
        }
    }

    tracing::debug!(x, y, width, height, copy_w, copy_h, "Cropped image");
    buffer.replace(width, height, cropped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered(width: usize, height: usize, channels: usize) -> PixelBuffer {
        let data = (0..width * height * channels).map(|i| i as u8).collect();
        PixelBuffer::from_raw(width, height, channels, data).unwrap()
    }

    #[test]
    fn test_flip_horizontal_moves_whole_pixels() {
        let mut buf = numbered(3, 1, 2);
        flip_horizontal(&mut buf);
        assert_eq!(buf.data(), &[4, 5, 2, 3, 0, 1]);
    }

    #[test]
    fn test_flip_horizontal_twice_is_identity() {
        let original = numbered(5, 3, 3);
        let mut buf = original.clone();
        flip_horizontal(&mut buf);
        assert_ne!(buf, original);
        flip_horizontal(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_flip_vertical_swaps_rows() {
        let mut buf = numbered(2, 3, 1);
        flip_vertical(&mut buf);
        assert_eq!(buf.data(), &[4, 5, 2, 3, 0, 1]);
    }

    #[test]
    fn test_flip_vertical_twice_is_identity() {
        let original = numbered(4, 5, 4);
        let mut buf = original.clone();
        flip_vertical(&mut buf);
        flip_vertical(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_flip_empty_image() {
        let mut buf = PixelBuffer::new(0, 0, 3).unwrap();
        flip_horizontal(&mut buf);
        flip_vertical(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_crop_inside() {
        let mut buf = numbered(4, 4, 1);
        crop(&mut buf, 1, 1, 2, 2);
        assert_eq!((buf.width(), buf.height()), (2, 2));
        assert_eq!(buf.data(), &[5, 6, 9, 10]);
    }

    #[test]
    fn test_crop_partial_overlap_zero_fills() {
        let mut buf = PixelBuffer::filled(3, 3, 2, 9).unwrap();
        crop(&mut buf, 2, 1, 3, 3);
        assert_eq!((buf.width(), buf.height(), buf.channels()), (3, 3, 2));
        // Only source column 2, rows 1..3 overlap the window
        let expected: Vec<u8> = vec![
            9, 9, 0, 0, 0, 0, //
            9, 9, 0, 0, 0, 0, //
            0, 0, 0, 0, 0, 0,
        ];
        assert_eq!(buf.data(), expected.as_slice());
    }

    #[test]
    fn test_crop_outside_is_all_zero() {
        let mut buf = PixelBuffer::filled(2, 2, 3, 200).unwrap();
        crop(&mut buf, 10, 10, 3, 2);
        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert!(buf.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_crop_to_zero_size() {
        let mut buf = numbered(3, 3, 3);
        crop(&mut buf, 0, 0, 0, 5);
        assert_eq!((buf.width(), buf.height()), (0, 5));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_crop_with_unrepresentable_size_is_ignored() {
        let original = numbered(3, 2, 3);
        let mut buf = original.clone();
        crop(&mut buf, 0, 0, usize::MAX, 2);
        assert_eq!(buf, original);
        crop(&mut buf, 1, 1, usize::MAX / 2, usize::MAX / 2);
        assert_eq!(buf, original);
    }
}
