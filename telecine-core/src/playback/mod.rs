//! Playback loop and its counters

pub mod runner;
pub mod stats;

pub use runner::{default_frame_interval, Player, PlayerSettings, STOP_POLL_INTERVAL};
pub use stats::PlaybackStats;
