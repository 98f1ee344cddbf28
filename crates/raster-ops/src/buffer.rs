//! Owned, interleaved 8-bit pixel storage.

use crate::error::OpError;

/// Largest channel count a buffer may carry (RGBA).
pub const MAX_CHANNELS: usize = 4;

/// One image in memory: a flat byte array plus its shape.
///
/// Pixels are stored row-major with interleaved channels, so the byte for
/// pixel `(x, y)` and channel `c` lives at `(y * width + x) * channels + c`.
/// Channel order is up to the caller (usually R, G, B, A); compositing
/// treats channel 3 as alpha when a fourth channel exists.
///
/// `data.len() == width * height * channels` holds for every value of this
/// type. Operations that change the shape build a replacement vector and
/// swap it in through [`PixelBuffer::replace`]. `Clone` is a deep copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, OpError> {
        Self::filled(width, height, channels, 0)
    }

    /// Allocate a buffer with every byte set to `value`.
    pub fn filled(
        width: usize,
        height: usize,
        channels: usize,
        value: u8,
    ) -> Result<Self, OpError> {
        check_channels(channels)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![value; width * height * channels],
        })
    }

    /// Wrap decoded pixel data, validating its length against the shape.
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, OpError> {
        check_channels(channels)?;
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(OpError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Image width in pixels
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved channels per pixel (1-4)
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// True when channel 3 carries alpha.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.channels >= 4
    }

    /// Number of channels that carry color rather than alpha.
    ///
    /// Gray+alpha and RGBA layouts exclude their last channel.
    pub fn color_channels(&self) -> usize {
        match self.channels {
            2 => 1,
            4 => 3,
            c => c,
        }
    }

    /// Total byte count (`width * height * channels`).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-area image.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width * self.channels
    }

    /// Byte offset of the first channel of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }

    /// All channels of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the image.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = self.offset(x, y);
        &self.data[start..start + self.channels]
    }

    /// Mutable access to all channels of pixel `(x, y)`.
    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = self.offset(x, y);
        let channels = self.channels;
        &mut self.data[start..start + channels]
    }

    /// Raw interleaved bytes
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw bytes; the shape cannot change through this slice.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer, returning its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Swap in a new backing store with a new shape.
    ///
    /// The channel count is preserved; `data` must already hold
    /// `width * height * channels` bytes.
    pub(crate) fn replace(&mut self, width: usize, height: usize, data: Vec<u8>) {
        debug_assert_eq!(data.len(), width * height * self.channels);
        self.width = width;
        self.height = height;
        self.data = data;
    }

    /// Fail with a precondition error unless the buffer has `required` channels.
    pub(crate) fn require_channels(&self, required: usize) -> Result<(), OpError> {
        if self.channels < required {
            return Err(OpError::ChannelCount {
                required,
                actual: self.channels,
            });
        }
        Ok(())
    }
}

fn check_channels(channels: usize) -> Result<(), OpError> {
    if channels == 0 || channels > MAX_CHANNELS {
        return Err(OpError::UnsupportedChannels(channels));
    }
    Ok(())
}
