//! Frame and pixel stream buffers

use alloc::vec;
use alloc::vec::Vec;

use crate::config::AddressWindow;
use crate::error::SourceError;

/// Bytes per decoded pixel
pub const SOURCE_BYTES_PER_PIXEL: usize = 3;

/// Bytes per RGB565 pixel
pub const WIRE_BYTES_PER_PIXEL: usize = 2;

/// Channel order of a decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelOrder {
    /// Red, green, blue
    #[default]
    Rgb,
    /// Blue, green, red (OpenCV-style capture)
    Bgr,
}

impl PixelOrder {
    /// Byte offsets of (red, green, blue) inside one pixel
    pub const fn offsets(self) -> (usize, usize, usize) {
        match self {
            PixelOrder::Rgb => (0, 1, 2),
            PixelOrder::Bgr => (2, 1, 0),
        }
    }
}

/// Decoded video frame, 3 bytes per pixel, row-major, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    order: PixelOrder,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Wrap decoded bytes
    ///
    /// Fails with `MalformedFrame` if the byte count is not
    /// `width * height * 3` or either dimension is zero.
    pub fn new(width: u32, height: u32, order: PixelOrder, data: Vec<u8>) -> Result<Self, SourceError> {
        let expected = Self::byte_len(width, height).ok_or(SourceError::MalformedFrame)?;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(SourceError::MalformedFrame);
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    /// Byte length of a frame of this size, `None` on overflow
    pub fn byte_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(SOURCE_BYTES_PER_PIXEL)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel order
    pub fn order(&self) -> PixelOrder {
        self.order
    }

    /// Raw pixel bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// RGB565 big-endian pixels ready for RAMWR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelStream {
    width: u16,
    height: u16,
    bytes: Vec<u8>,
}

impl PixelStream {
    pub(crate) fn from_encoded(width: u16, height: u16, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(
            bytes.len(),
            usize::from(width) * usize::from(height) * WIRE_BYTES_PER_PIXEL
        );
        Self {
            width,
            height,
            bytes,
        }
    }

    /// Stream of a single color
    pub fn solid(width: u16, height: u16, color: u16) -> Self {
        let [hi, lo] = color.to_be_bytes();
        let pixels = usize::from(width) * usize::from(height);
        let mut bytes = vec![0u8; pixels * WIRE_BYTES_PER_PIXEL];
        for px in bytes.chunks_exact_mut(WIRE_BYTES_PER_PIXEL) {
            px[0] = hi;
            px[1] = lo;
        }
        Self {
            width,
            height,
            bytes,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Wire bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the stream holds no pixels
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Window anchored at the origin covering this stream
    pub fn window(&self) -> Option<AddressWindow> {
        AddressWindow::from_size(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_length_checked() {
        assert!(FrameBuffer::new(2, 2, PixelOrder::Rgb, vec![0; 12]).is_ok());
        assert_eq!(
            FrameBuffer::new(2, 2, PixelOrder::Rgb, vec![0; 11]),
            Err(SourceError::MalformedFrame)
        );
        assert_eq!(
            FrameBuffer::new(0, 2, PixelOrder::Rgb, Vec::new()),
            Err(SourceError::MalformedFrame)
        );
    }

    #[test]
    fn test_solid_stream() {
        let stream = PixelStream::solid(3, 2, 0xF800);
        assert_eq!(stream.len(), 12);
        assert!(stream.as_bytes().chunks(2).all(|px| px == [0xF8, 0x00]));
        assert_eq!(stream.window(), Some(AddressWindow::new(0, 0, 2, 1)));
    }

    #[test]
    fn test_bgr_offsets() {
        assert_eq!(PixelOrder::Rgb.offsets(), (0, 1, 2));
        assert_eq!(PixelOrder::Bgr.offsets(), (2, 1, 0));
    }
}
