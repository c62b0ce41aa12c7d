//! Events that trigger playback state transitions

/// Events reported by the playback loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// Playback requested
    Start,
    /// Stop requested (signal)
    Stop,

    // Session events
    /// Source opened or rewound successfully
    Opened,
    /// Source could not be opened or rewound
    OpenFailed,
    /// Source went away mid-stream
    SourceLost,
    /// Cooldown after a source failure has passed
    CooldownElapsed,

    // Frame events
    /// A frame reached the panel
    FrameShown,
    /// A frame was abandoned (bus failure)
    FrameDropped,
    /// Decoder reported the end of the stream
    StreamEnded,
    /// Decoder failed to produce the next frame
    DecodeFailed,

    // End-of-stream policy
    /// Finite source: go back to the first frame
    Rewind,
}
