//! Error types for buffer operations.
//!
//! Every variant of [`OpError`] is reported *before* the buffer is touched,
//! so an operation that fails leaves its input exactly as it was.

use std::fmt;

/// Error returned by transforms that validate their input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    /// Channel count outside the supported 1-4 range
    UnsupportedChannels(usize),
    /// Raw data length does not match `width * height * channels`
    LengthMismatch {
        /// Length implied by the declared shape
        expected: usize,
        /// Length of the data actually supplied
        actual: usize,
    },
    /// Operation needs more color channels than the buffer has
    ChannelCount {
        /// Minimum number of channels the operation requires
        required: usize,
        /// Number of channels in the buffer
        actual: usize,
    },
    /// Requested channel index does not exist in the buffer
    ChannelOutOfRange {
        /// Channel index that was requested
        channel: usize,
        /// Number of channels in the buffer
        channels: usize,
    },
    /// Kernel weights do not fill `width * height` cells
    KernelShape {
        /// Number of cells implied by the kernel dimensions
        expected: usize,
        /// Number of weights supplied
        actual: usize,
    },
    /// Kernel anchor lies outside the kernel
    KernelAnchor {
        /// Anchor row
        row: usize,
        /// Anchor column
        col: usize,
    },
    /// Payload does not fit into the buffer's least-significant bits
    Capacity {
        /// Number of carrier bytes the payload needs (one bit per byte)
        required_bits: usize,
        /// Number of carrier bytes available
        available_bits: usize,
    },
}

impl OpError {
    /// True for precondition failures (wrong channel layout for the operation).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            OpError::ChannelCount { .. } | OpError::ChannelOutOfRange { .. }
        )
    }
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpError::UnsupportedChannels(channels) => {
                write!(f, "unsupported channel count {} (expected 1-4)", channels)
            }
            OpError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel data has {} bytes, shape requires {}",
                    actual, expected
                )
            }
            OpError::ChannelCount { required, actual } => {
                write!(
                    f,
                    "operation needs at least {} channels, image has {}",
                    required, actual
                )
            }
            OpError::ChannelOutOfRange { channel, channels } => {
                write!(
                    f,
                    "channel {} out of range for a {}-channel image",
                    channel, channels
                )
            }
            OpError::KernelShape { expected, actual } => {
                write!(f, "kernel needs {} weights, got {}", expected, actual)
            }
            OpError::KernelAnchor { row, col } => {
                write!(f, "kernel anchor ({}, {}) lies outside the kernel", row, col)
            }
            OpError::Capacity {
                required_bits,
                available_bits,
            } => {
                write!(
                    f,
                    "message too large: {} / {} bits",
                    required_bits, available_bits
                )
            }
        }
    }
}

impl std::error::Error for OpError {}

/// A glyph the font rasterizer cannot produce.
///
/// Text overlay treats this as recoverable: the character is skipped and
/// the pen does not advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingGlyph {
    /// Character that has no glyph in the face
    pub codepoint: char,
}

impl fmt::Display for MissingGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "font is missing character {:?} (U+{:04X})",
            self.codepoint, self.codepoint as u32
        )
    }
}

impl std::error::Error for MissingGlyph {}
