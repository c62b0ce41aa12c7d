//! Video sources
//!
//! Frames come from an `ffmpeg` child process decoding to raw `rgb24`.
//! The source is either one locator (looped) or the playlist of a video
//! server (played in order, then again).

pub mod ffmpeg;
pub mod probe;
pub mod server;

use std::io;

use telecine_core::codec::FrameBuffer;
use telecine_core::config::SourceConfig;
use telecine_core::traits::{StreamInfo, VideoDecoder, VideoSession};
use telecine_core::SourceError;
use thiserror::Error;

pub use ffmpeg::{FfmpegDecoder, FfmpegOptions, FfmpegSession};
pub use server::{PlaylistDecoder, PlaylistSession, VideoServer};

/// Decoder errors
///
/// The playback loop only sees [`SourceError`]; these carry the detail
/// that gets logged on the way.
#[derive(Debug, Error)]
pub enum DecoderError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("ffprobe failed: {0}")]
    Probe(String),

    #[error("ffprobe output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no video stream")]
    NoVideoStream,

    #[error("decoder pipe: {0}")]
    Io(#[from] io::Error),

    #[error("video server: {0}")]
    Http(String),

    #[error("video server has no videos")]
    EmptyPlaylist,
}

impl DecoderError {
    /// How the playback loop should treat this error
    pub fn as_source_error(&self) -> SourceError {
        match self {
            DecoderError::Io(_) => SourceError::DecodeFailure,
            _ => SourceError::Unavailable,
        }
    }
}

impl From<ureq::Error> for DecoderError {
    fn from(e: ureq::Error) -> Self {
        DecoderError::Http(e.to_string())
    }
}

/// Decoder for whichever source the config names
pub enum Source {
    Single(FfmpegDecoder),
    Playlist(PlaylistDecoder),
}

impl Source {
    /// Build the decoder; a video server takes precedence over a locator
    pub fn from_config(config: &SourceConfig, options: FfmpegOptions) -> Self {
        // No server means a locator is set
        match config.video_server() {
            Some(url) => Source::Playlist(PlaylistDecoder::new(VideoServer::new(url), options)),
            None => Source::Single(FfmpegDecoder::new(
                config.media_locator().unwrap_or_default(),
                options,
            )),
        }
    }

    /// Short description for the startup log
    pub fn describe(&self) -> String {
        match self {
            Source::Single(decoder) => decoder.locator().to_string(),
            Source::Playlist(decoder) => format!("playlist at {}", decoder.server().base_url()),
        }
    }
}

/// Session of a [`Source`]
pub enum SourceSession {
    Single(FfmpegSession),
    Playlist(PlaylistSession),
}

impl VideoDecoder for Source {
    type Session = SourceSession;

    fn open(&mut self) -> Result<SourceSession, SourceError> {
        match self {
            Source::Single(decoder) => decoder.open().map(SourceSession::Single),
            Source::Playlist(decoder) => decoder.open().map(SourceSession::Playlist),
        }
    }
}

impl VideoSession for SourceSession {
    fn info(&self) -> StreamInfo {
        match self {
            SourceSession::Single(session) => session.info(),
            SourceSession::Playlist(session) => session.info(),
        }
    }

    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, SourceError> {
        match self {
            SourceSession::Single(session) => session.next_frame(),
            SourceSession::Playlist(session) => session.next_frame(),
        }
    }

    fn seek_to_start(&mut self) -> Result<(), SourceError> {
        match self {
            SourceSession::Single(session) => session.seek_to_start(),
            SourceSession::Playlist(session) => session.seek_to_start(),
        }
    }
}
