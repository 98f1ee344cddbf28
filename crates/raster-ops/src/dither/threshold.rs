//! Fixed-level binarization.

use crate::buffer::PixelBuffer;

/// Threshold used when the caller does not pick one.
pub const DEFAULT_THRESHOLD: u8 = 0x7F;

/// Binarize on channel 0.
///
/// A pixel whose channel 0 is `<= level` becomes all zeros; any brighter
/// pixel becomes all 255, across every channel (alpha included).
pub fn threshold(buffer: &mut PixelBuffer, level: u8) {
    let channels = buffer.channels();
    for px in buffer.data_mut().chunks_exact_mut(channels) {
        let value = if px[0] <= level { 0x00 } else { 0xFF };
        px.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_threshold_inclusive_low() {
        let mut buf = PixelBuffer::from_raw(4, 1, 1, vec![0, 127, 128, 255]).unwrap();
        threshold(&mut buf, DEFAULT_THRESHOLD);
        assert_eq!(buf.data(), &[0, 0, 255, 255]);
    }

    #[test]
    fn test_threshold_uses_channel_zero_only() {
        let mut buf = PixelBuffer::from_raw(2, 1, 3, vec![10, 250, 250, 200, 0, 0]).unwrap();
        threshold(&mut buf, 100);
        assert_eq!(buf.data(), &[0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn test_threshold_extremes() {
        let mut buf = PixelBuffer::from_raw(2, 1, 1, vec![0, 255]).unwrap();
        threshold(&mut buf, 255);
        assert_eq!(buf.data(), &[0, 0]);

        let mut buf = PixelBuffer::from_raw(2, 1, 1, vec![0, 1]).unwrap();
        threshold(&mut buf, 0);
        assert_eq!(buf.data(), &[0, 255]);
    }
}
