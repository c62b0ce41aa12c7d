//! Frame codec
//!
//! Converts decoded 24-bit frames into the panel's RGB565 big-endian wire
//! format. Frames of another size go through a [`FrameScaler`] first.

pub mod frame;

use alloc::vec::Vec;

pub use frame::{FrameBuffer, PixelOrder, PixelStream, SOURCE_BYTES_PER_PIXEL, WIRE_BYTES_PER_PIXEL};

use crate::traits::FrameScaler;

/// Pack 8-bit channels into RGB565
#[inline]
pub const fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Convert a frame to a pixel stream of exactly `target_width` x `target_height`
///
/// Output length is always `2 * target_width * target_height`.
pub fn convert<Z: FrameScaler + ?Sized>(
    frame: FrameBuffer,
    target_width: u16,
    target_height: u16,
    scaler: &mut Z,
) -> PixelStream {
    let tw = u32::from(target_width);
    let th = u32::from(target_height);

    let frame = if (frame.width(), frame.height()) == (tw, th) || tw == 0 || th == 0 {
        frame
    } else {
        scaler.resize(frame, tw, th)
    };

    pack(&frame, target_width, target_height)
}

/// Pack a frame into RGB565 without resampling
///
/// Pixels beyond the target are clipped; target pixels the frame does not
/// cover are black.
pub fn pack(frame: &FrameBuffer, target_width: u16, target_height: u16) -> PixelStream {
    let tw = usize::from(target_width);
    let th = usize::from(target_height);
    let sw = frame.width() as usize;
    let sh = frame.height() as usize;
    let (ro, go, bo) = frame.order().offsets();
    let stride = sw * SOURCE_BYTES_PER_PIXEL;
    let covered = sw.min(tw);

    let mut out = Vec::with_capacity(tw * th * WIRE_BYTES_PER_PIXEL);

    for row in frame.data().chunks_exact(stride).take(th) {
        for px in row.chunks_exact(SOURCE_BYTES_PER_PIXEL).take(covered) {
            out.extend_from_slice(&rgb565(px[ro], px[go], px[bo]).to_be_bytes());
        }
        out.resize(out.len() + (tw - covered) * WIRE_BYTES_PER_PIXEL, 0);
    }
    out.resize(tw * th * WIRE_BYTES_PER_PIXEL, 0);

    PixelStream::from_encoded(target_width, target_height, out)
}
