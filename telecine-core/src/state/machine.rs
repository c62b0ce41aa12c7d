//! State machine definition
//!
//! `Idle -> Connecting -> Streaming -> (EndOfStream | SourceError) -> Connecting`

use super::events::Event;

/// Playback phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// No active decoder session
    #[default]
    Idle,
    /// Opening the source, or rewinding the retained session
    Connecting,
    /// Pulling, converting and transmitting frames
    Streaming,
    /// Decoder ran out of frames
    EndOfStream,
    /// Source failed; waiting out the cooldown
    SourceError,
}

impl PlaybackState {
    /// Check if this state may hold an open decoder session
    pub fn holds_session(&self) -> bool {
        matches!(
            self,
            PlaybackState::Connecting | PlaybackState::Streaming | PlaybackState::EndOfStream
        )
    }

    /// Short name for log messages
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Connecting => "connecting",
            PlaybackState::Streaming => "streaming",
            PlaybackState::EndOfStream => "end of stream",
            PlaybackState::SourceError => "source error",
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use PlaybackState::*;

        match (self, event) {
            // Stop is honored everywhere
            (_, Stop) => Idle,

            // Idle transitions
            (Idle, Start) => Connecting,

            // Connecting transitions
            (Connecting, Opened) => Streaming,
            (Connecting, OpenFailed) => SourceError,

            // Streaming transitions
            (Streaming, FrameShown) => Streaming,
            (Streaming, FrameDropped) => Streaming,
            (Streaming, StreamEnded) => EndOfStream,
            (Streaming, DecodeFailed) => EndOfStream,
            (Streaming, SourceLost) => SourceError,

            // EndOfStream transitions
            (EndOfStream, Rewind) => Connecting,
            (EndOfStream, SourceLost) => SourceError,

            // SourceError transitions
            (SourceError, CooldownElapsed) => Connecting,

            // Default: stay in current state
            _ => self,
        }
    }
}
