//! Playback state machine
//!
//! The playback loop owns the hardware and the decoder session; this
//! module only decides which phase comes next. Transitions are explicit,
//! finite and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::PlaybackState;
