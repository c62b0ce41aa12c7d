//! Video source traits

use core::time::Duration;

use crate::codec::FrameBuffer;
use crate::error::SourceError;

/// How a source behaves at its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceKind {
    /// File, URL or playlist entry; can be rewound
    #[default]
    Finite,
    /// Capture device; its end means the device went away
    Live,
}

/// What the decoder learned when it opened the source
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamInfo {
    /// Decoded frame width
    pub width: u32,
    /// Decoded frame height
    pub height: u32,
    /// Nominal frame rate, if the container declares one
    pub frame_rate: Option<f32>,
    /// End-of-stream behavior
    pub kind: SourceKind,
}

impl StreamInfo {
    /// Nominal frame interval, ignoring nonsense rates
    pub fn frame_interval(&self) -> Option<Duration> {
        self.frame_rate
            .filter(|fps| fps.is_finite() && *fps >= 1.0 && *fps <= 240.0)
            .map(|fps| Duration::from_nanos((1_000_000_000.0 / f64::from(fps)) as u64))
    }
}

/// An open decoder session
pub trait VideoSession {
    /// Stream properties
    fn info(&self) -> StreamInfo;

    /// Pull the next frame
    ///
    /// `Ok(None)` marks the end of the stream. `Err(DecodeFailure)` is a
    /// mid-stream failure; the loop treats it like the end.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, SourceError>;

    /// Restart from the first frame
    fn seek_to_start(&mut self) -> Result<(), SourceError>;
}

/// Opens sessions on a configured source
pub trait VideoDecoder {
    /// Session type
    type Session: VideoSession;

    /// Open the source
    fn open(&mut self) -> Result<Self::Session, SourceError>;
}
