//! Frame resizing for sources that are not prescaled by ffmpeg

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb};
use telecine_core::codec::FrameBuffer;
use telecine_core::traits::FrameScaler;
use tracing::warn;

/// Nearest-neighbour resize through `image::imageops`
///
/// Channels are sampled as a unit, so BGR frames pass through as if they
/// were RGB and keep their order.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestScaler;

impl FrameScaler for NearestScaler {
    fn resize(&mut self, frame: FrameBuffer, width: u32, height: u32) -> FrameBuffer {
        let source = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(frame.width(), frame.height(), frame.data());
        let resized = match source {
            Some(source) => imageops::resize(&source, width, height, FilterType::Nearest),
            None => {
                warn!(width = frame.width(), height = frame.height(), "frame does not fit its size");
                return frame;
            }
        };

        match FrameBuffer::new(width, height, frame.order(), resized.into_raw()) {
            Ok(scaled) => scaled,
            Err(e) => {
                warn!(error = %e, width, height, "resize failed");
                frame
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telecine_core::codec::{self, PixelOrder};

    fn halves(width: u32, height: u32) -> FrameBuffer {
        // Left half red, right half blue
        let mut data = Vec::new();
        for _ in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    data.extend_from_slice(&[255, 0, 0]);
                } else {
                    data.extend_from_slice(&[0, 0, 255]);
                }
            }
        }
        FrameBuffer::new(width, height, PixelOrder::Rgb, data).unwrap()
    }

    #[test]
    fn test_downscale_keeps_halves() {
        let scaled = NearestScaler.resize(halves(4, 2), 2, 1);
        assert_eq!((scaled.width(), scaled.height()), (2, 1));
        assert_eq!(scaled.data(), [255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_upscale_repeats_pixels() {
        let frame = FrameBuffer::new(1, 1, PixelOrder::Bgr, vec![10, 20, 30]).unwrap();
        let scaled = NearestScaler.resize(frame, 3, 2);
        assert_eq!(scaled.order(), PixelOrder::Bgr);
        assert!(scaled.data().chunks(3).all(|px| px == [10, 20, 30]));
        assert_eq!(scaled.data().len(), 3 * 2 * 3);
    }

    #[test]
    fn test_convert_fills_panel() {
        let stream = codec::convert(halves(64, 48), 240, 320, &mut NearestScaler);
        assert_eq!(stream.len(), 240 * 320 * 2);

        let first_row = &stream.as_bytes()[..240 * 2];
        assert_eq!(first_row[..2], [0xF8, 0x00]);
        assert_eq!(first_row[first_row.len() - 2..], [0x00, 0x1F]);
    }
}
