//! Frame sink trait for the panel

use crate::codec::PixelStream;
use crate::error::ProtocolError;

/// Trait for anything that can show a converted frame
///
/// Implemented by the ST7789 driver. A failed write abandons that frame
/// only; the sink stays usable for the next one.
pub trait FrameSink {
    /// Visible panel size (width, height) after orientation
    fn panel_size(&self) -> (u16, u16);

    /// Address the window for `stream` and transmit its pixels
    fn write_frame(&mut self, stream: &PixelStream) -> Result<(), ProtocolError>;

    /// Fill the whole panel with one RGB565 color
    fn fill(&mut self, color: u16) -> Result<(), ProtocolError> {
        let (width, height) = self.panel_size();
        self.write_frame(&PixelStream::solid(width, height, color))
    }
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    fn panel_size(&self) -> (u16, u16) {
        T::panel_size(self)
    }

    fn write_frame(&mut self, stream: &PixelStream) -> Result<(), ProtocolError> {
        T::write_frame(self, stream)
    }

    fn fill(&mut self, color: u16) -> Result<(), ProtocolError> {
        T::fill(self, color)
    }
}
