//! Frame scaler trait

use crate::codec::FrameBuffer;

/// Resizes decoded frames that do not match the panel
///
/// The codec only packs pixels; fitting a frame to the panel is left to
/// an image-scaling routine on the host.
pub trait FrameScaler {
    /// Resize `frame` to exactly `width` x `height`
    ///
    /// A frame handed back at another size is clipped or padded with black
    /// by the codec.
    fn resize(&mut self, frame: FrameBuffer, width: u32, height: u32) -> FrameBuffer;
}

impl<T: FrameScaler + ?Sized> FrameScaler for &mut T {
    fn resize(&mut self, frame: FrameBuffer, width: u32, height: u32) -> FrameBuffer {
        T::resize(self, frame, width, height)
    }
}
