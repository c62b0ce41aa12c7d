//! Board-agnostic streaming logic for the Telecine panel streamer
//!
//! This crate contains everything between the video decoder and the panel
//! driver that does not depend on specific hardware:
//!
//! - Configuration types and validation
//! - Frame codec (24-bit RGB/BGR to big-endian RGB565)
//! - Playback state machine
//! - Playback loop (pacing, end-of-stream looping, reconnect cooldown)
//! - Traits for video sources and frame sinks

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod codec;
pub mod config;
pub mod error;
pub mod playback;
pub mod state;
pub mod traits;

pub use error::{ConfigError, ProtocolError, SourceError};
