//! Hiding a byte string in the least-significant bits of a buffer.
//!
//! # Layout
//!
//! The flat byte array is used as a stream of carrier bytes, one payload
//! bit per byte, regardless of width, height or channel layout:
//!
//! ```text
//! bytes 0..32          message length in bits, u32, most significant bit first
//! bytes 32..32+len     message bits, each byte most significant bit first
//! ```
//!
//! Only bit 0 of a carrier byte is ever changed.

use crate::buffer::PixelBuffer;
use crate::error::OpError;

/// Carrier bytes taken by the length header.
pub const HEADER_BITS: usize = 32;

/// Longest message, in bytes, that [`encode`] can fit into `buffer`.
pub fn capacity(buffer: &PixelBuffer) -> usize {
    buffer.len().saturating_sub(HEADER_BITS) / 8
}

/// Embed `message` into the buffer.
///
/// Fails with [`OpError::Capacity`] and leaves the buffer untouched when
/// the header plus one byte per message bit exceeds the buffer size.
pub fn encode(buffer: &mut PixelBuffer, message: &[u8]) -> Result<(), OpError> {
    let payload_bits = message.len() * 8;
    let required_bits = HEADER_BITS + payload_bits;
    let available_bits = buffer.len();
    let length = u32::try_from(payload_bits).map_err(|_| OpError::Capacity {
        required_bits,
        available_bits,
    })?;
    if required_bits > available_bits {
        return Err(OpError::Capacity {
            required_bits,
            available_bits,
        });
    }

    let (header, body) = buffer.data_mut().split_at_mut(HEADER_BITS);
    write_bits(header, &length.to_be_bytes());
    write_bits(&mut body[..payload_bits], message);

    tracing::debug!(bytes = message.len(), "Embedded message");
    Ok(())
}

/// Recover a message written by [`encode`].
///
/// Returns [`OpError::Capacity`] when the buffer is too small to hold a
/// header, or when the header announces more bits than the buffer carries.
/// A buffer that never had a message embedded decodes to whatever its low
/// bits happen to spell, as long as the length fits.
pub fn decode(buffer: &PixelBuffer) -> Result<Vec<u8>, OpError> {
    let data = buffer.data();
    if data.len() < HEADER_BITS {
        return Err(OpError::Capacity {
            required_bits: HEADER_BITS,
            available_bits: data.len(),
        });
    }

    let mut header = [0u8; 4];
    read_bits(&data[..HEADER_BITS], &mut header);
    let payload_bits = u32::from_be_bytes(header) as usize;

    let required_bits = HEADER_BITS.saturating_add(payload_bits);
    if required_bits > data.len() {
        return Err(OpError::Capacity {
            required_bits,
            available_bits: data.len(),
        });
    }

    // Trailing bits that do not fill a byte are dropped
    let mut message = vec![0u8; payload_bits / 8];
    read_bits(&data[HEADER_BITS..HEADER_BITS + message.len() * 8], &mut message);
    Ok(message)
}

/// Spread `bytes` over the low bits of `carrier`, eight carrier bytes each.
fn write_bits(carrier: &mut [u8], bytes: &[u8]) {
    for (chunk, &byte) in carrier.chunks_exact_mut(8).zip(bytes) {
        for (i, slot) in chunk.iter_mut().enumerate() {
            let bit = (byte >> (7 - i)) & 1;
            *slot = (*slot & !1) | bit;
        }
    }
}

/// Inverse of [`write_bits`].
fn read_bits(carrier: &[u8], bytes: &mut [u8]) {
    for (chunk, byte) in carrier.chunks_exact(8).zip(bytes.iter_mut()) {
        *byte = chunk.iter().fold(0u8, |acc, &slot| (acc << 1) | (slot & 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_encodes_bit_length() {
        let mut buf = PixelBuffer::new(100, 1, 1).unwrap();
        encode(&mut buf, b"A").unwrap();
        let header: Vec<u8> = buf.data()[..32].iter().map(|b| b & 1).collect();
        let mut expected = vec![0u8; 32];
        expected[28] = 1; // 8 = 0b1000
        assert_eq!(header, expected);
        // 'A' = 0x41 = 0b0100_0001
        let payload: Vec<u8> = buf.data()[32..40].iter().map(|b| b & 1).collect();
        assert_eq!(payload, vec![0, 1, 0, 0, 0, 0, 0, 1]);
        // Carrier bytes past the message stay as they were
        assert!(buf.data()[40..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_only_low_bit_changes() {
        let mut buf = PixelBuffer::filled(8, 8, 1, 0b1010_1010).unwrap();
        encode(&mut buf, b"hi").unwrap();
        assert!(buf.data().iter().all(|&b| b & !1 == 0b1010_1010));
    }

    #[test]
    fn test_roundtrip_multichannel() {
        let data: Vec<u8> = (0..300u32).map(|i| (i * 37 % 256) as u8).collect();
        let mut buf = PixelBuffer::from_raw(10, 10, 3, data).unwrap();
        let message = "pixel secrets \u{e9}".as_bytes();
        encode(&mut buf, message).unwrap();
        assert_eq!(decode(&buf).unwrap(), message);
    }

    #[test]
    fn test_empty_message() {
        let mut buf = PixelBuffer::filled(32, 1, 1, 255).unwrap();
        encode(&mut buf, b"").unwrap();
        assert_eq!(decode(&buf).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_capacity_exact_fit() {
        // 32 header + 2 * 8 payload = 48 bytes
        let mut buf = PixelBuffer::new(4, 4, 3).unwrap();
        assert_eq!(capacity(&buf), 2);
        encode(&mut buf, b"ok").unwrap();
        assert_eq!(decode(&buf).unwrap(), b"ok");
    }

    #[test]
    fn test_too_large_leaves_buffer_unchanged() {
        let mut buf = PixelBuffer::filled(5, 8, 1, 3).unwrap();
        let before = buf.clone();
        let err = encode(&mut buf, b"too long").unwrap_err();
        assert_eq!(
            err,
            OpError::Capacity {
                required_bits: 96,
                available_bits: 40
            }
        );
        assert_eq!(buf, before);
    }

    #[test]
    fn test_decode_short_buffer() {
        let buf = PixelBuffer::new(4, 4, 1).unwrap();
        assert!(matches!(decode(&buf), Err(OpError::Capacity { .. })));
        assert_eq!(capacity(&buf), 0);
    }

    #[test]
    fn test_decode_rejects_oversized_header() {
        // All low bits set -> length u32::MAX
        let buf = PixelBuffer::filled(64, 1, 1, 1).unwrap();
        assert!(matches!(decode(&buf), Err(OpError::Capacity { .. })));
    }
}
