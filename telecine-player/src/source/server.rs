//! Video server playlist
//!
//! The server lists its videos at `GET /videos` (a JSON array of names)
//! and serves each at `GET /video/{name}`; ffmpeg streams the latter
//! directly. The list is fetched on connect and again each time the
//! playlist wraps, so newly uploaded videos join the next pass.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use telecine_core::codec::FrameBuffer;
use telecine_core::traits::{StreamInfo, VideoDecoder, VideoSession};
use telecine_core::SourceError;
use tracing::{debug, info, warn};

use super::ffmpeg::{FfmpegOptions, FfmpegSession};
use super::DecoderError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Characters escaped in a video name; `/` is kept so names may hold subpaths
const NAME_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Parse the `/videos` response body
pub fn parse_playlist(body: &str) -> Result<Vec<String>, DecoderError> {
    let names: Vec<String> = serde_json::from_str(body)?;
    let names: Vec<String> = names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    if names.is_empty() {
        return Err(DecoderError::EmptyPlaylist);
    }
    Ok(names)
}

/// HTTP client for one video server
#[derive(Clone)]
pub struct VideoServer {
    base: String,
    agent: ureq::Agent,
}

impl VideoServer {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build();
        Self {
            base: base_url.trim().trim_end_matches('/').to_string(),
            agent,
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn playlist_url(&self) -> String {
        format!("{}/videos", self.base)
    }

    pub fn video_url(&self, name: &str) -> String {
        let name = utf8_percent_encode(name.trim_start_matches('/'), NAME_ESCAPES);
        format!("{}/video/{}", self.base, name)
    }

    /// Fetch the list of video names
    pub fn fetch_playlist(&self) -> Result<Vec<String>, DecoderError> {
        let url = self.playlist_url();
        let body = self
            .agent
            .get(&url)
            .call()?
            .into_string()
            .map_err(|e| DecoderError::Http(e.to_string()))?;

        let names = parse_playlist(&body)?;
        info!(url = %url, videos = names.len(), "playlist fetched");
        Ok(names)
    }
}

/// Open the first entry at or after `start` that decodes
fn open_from(
    server: &VideoServer,
    entries: &[String],
    start: usize,
    options: FfmpegOptions,
) -> Result<(usize, FfmpegSession), DecoderError> {
    let mut last = DecoderError::EmptyPlaylist;

    for (index, name) in entries.iter().enumerate().skip(start) {
        match FfmpegSession::open(&server.video_url(name), options) {
            Ok(session) => {
                info!(video = %name, position = index + 1, of = entries.len(), "playing");
                return Ok((index, session));
            }
            Err(e) => {
                warn!(video = %name, error = %e, "skipping video");
                last = e;
            }
        }
    }

    Err(last)
}

/// Plays a video server's list in order, forever
pub struct PlaylistDecoder {
    server: VideoServer,
    options: FfmpegOptions,
}

impl PlaylistDecoder {
    pub fn new(server: VideoServer, options: FfmpegOptions) -> Self {
        Self { server, options }
    }

    pub fn server(&self) -> &VideoServer {
        &self.server
    }

    fn start(&self) -> Result<PlaylistSession, DecoderError> {
        let entries = self.server.fetch_playlist()?;
        let (index, current) = open_from(&self.server, &entries, 0, self.options)?;

        Ok(PlaylistSession {
            server: self.server.clone(),
            options: self.options,
            entries,
            index,
            current,
            entry_frames: 0,
        })
    }
}

impl VideoDecoder for PlaylistDecoder {
    type Session = PlaylistSession;

    fn open(&mut self) -> Result<PlaylistSession, SourceError> {
        self.start().map_err(|e| {
            warn!(server = %self.server.base, error = %e, "video server unavailable");
            SourceError::Unavailable
        })
    }
}

/// Current playlist entry
///
/// Rewinding moves on to the next entry; past the last one the list is
/// fetched again and playback starts over from its first entry.
pub struct PlaylistSession {
    server: VideoServer,
    options: FfmpegOptions,
    entries: Vec<String>,
    index: usize,
    current: FfmpegSession,
    /// Frames read from the current entry
    entry_frames: u32,
}

/// Check if an entry ended or failed before giving a single frame
fn is_dead_entry(result: &Result<Option<FrameBuffer>, SourceError>, entry_frames: u32) -> bool {
    entry_frames == 0 && matches!(result, Ok(None) | Err(SourceError::DecodeFailure))
}

impl PlaylistSession {
    /// Name of the video playing now
    pub fn current_name(&self) -> &str {
        &self.entries[self.index]
    }

    fn advance(&mut self) -> Result<(), DecoderError> {
        let next = self.index + 1;

        if next < self.entries.len() {
            if let Ok((index, session)) = open_from(&self.server, &self.entries, next, self.options) {
                self.index = index;
                self.current = session;
                self.entry_frames = 0;
                return Ok(());
            }
        }

        debug!(last = self.current_name(), "playlist wrapped");
        self.entries = self.server.fetch_playlist()?;
        let (index, session) = open_from(&self.server, &self.entries, 0, self.options)?;
        self.index = index;
        self.current = session;
        self.entry_frames = 0;
        Ok(())
    }
}

impl VideoSession for PlaylistSession {
    fn info(&self) -> StreamInfo {
        self.current.info()
    }

    /// Next frame of the current entry
    ///
    /// Entries that end without a frame are skipped here, so one broken
    /// upload does not send the whole playlist back to its start.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, SourceError> {
        let mut skipped = 0;
        loop {
            let result = self.current.next_frame();
            if !is_dead_entry(&result, self.entry_frames) || skipped >= self.entries.len() {
                if matches!(result, Ok(Some(_))) {
                    self.entry_frames = self.entry_frames.saturating_add(1);
                }
                return result;
            }

            warn!(video = self.current_name(), "skipping video without frames");
            skipped += 1;
            if let Err(e) = self.advance() {
                warn!(server = %self.server.base, error = %e, "playlist advance failed");
                return Err(SourceError::Unavailable);
            }
        }
    }

    fn seek_to_start(&mut self) -> Result<(), SourceError> {
        self.advance().map_err(|e| {
            warn!(server = %self.server.base, error = %e, "playlist advance failed");
            SourceError::Unavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telecine_core::codec::PixelOrder;

    #[test]
    fn test_urls() {
        let server = VideoServer::new("http://media.local:8080/");
        assert_eq!(server.base_url(), "http://media.local:8080");
        assert_eq!(server.playlist_url(), "http://media.local:8080/videos");
        assert_eq!(
            server.video_url("intro.mp4"),
            "http://media.local:8080/video/intro.mp4"
        );
        assert_eq!(
            server.video_url("/intro.mp4"),
            "http://media.local:8080/video/intro.mp4"
        );
    }

    #[test]
    fn test_video_url_escapes_name() {
        let server = VideoServer::new("http://media.local:8080");
        assert_eq!(
            server.video_url("summer trip #2?.mp4"),
            "http://media.local:8080/video/summer%20trip%20%232%3F.mp4"
        );
        assert_eq!(
            server.video_url("100%.mp4"),
            "http://media.local:8080/video/100%25.mp4"
        );
        assert_eq!(
            server.video_url("clips/a.mp4"),
            "http://media.local:8080/video/clips/a.mp4"
        );
    }

    #[test]
    fn test_dead_entry_detection() {
        let frame = || FrameBuffer::new(1, 1, PixelOrder::Rgb, vec![0; 3]).unwrap();

        assert!(is_dead_entry(&Ok(None), 0));
        assert!(is_dead_entry(&Err(SourceError::DecodeFailure), 0));
        assert!(!is_dead_entry(&Ok(Some(frame())), 0));
        assert!(!is_dead_entry(&Err(SourceError::Unavailable), 0));

        // An entry that showed frames ends normally
        assert!(!is_dead_entry(&Ok(None), 12));
        assert!(!is_dead_entry(&Err(SourceError::DecodeFailure), 12));
    }

    #[test]
    fn test_parse_playlist() {
        assert_eq!(
            parse_playlist(r#"["a.mp4", " b.mp4 ", ""]"#).unwrap(),
            ["a.mp4", "b.mp4"]
        );
        assert!(matches!(
            parse_playlist("[]"),
            Err(DecoderError::EmptyPlaylist)
        ));
        assert!(matches!(
            parse_playlist(r#"{"videos": []}"#),
            Err(DecoderError::Json(_))
        ));
    }

    #[test]
    fn test_unreachable_server() {
        // Port 9 (discard) on loopback is closed on any sane test host
        let mut decoder = PlaylistDecoder::new(
            VideoServer::new("http://127.0.0.1:9"),
            FfmpegOptions::default(),
        );
        assert!(matches!(decoder.open(), Err(SourceError::Unavailable)));
    }
}
