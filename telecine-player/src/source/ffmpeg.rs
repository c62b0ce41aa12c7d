//! `ffmpeg` child-process decoder
//!
//! ffmpeg decodes the locator to raw `rgb24` on its stdout; each frame is
//! exactly `width * height * 3` bytes, read with blocking reads. The pipe
//! provides back-pressure, so ffmpeg decodes no faster than frames are
//! shown. Seeking restarts the process.
//!
//! Autorotation is off: frame sizes come from ffprobe's coded width and
//! height, and a rotated stream would otherwise arrive transposed.

use std::io::{self, Read};
use std::process::{Child, ChildStdout, Command, Stdio};

use telecine_core::codec::{FrameBuffer, PixelOrder, SOURCE_BYTES_PER_PIXEL};
use telecine_core::traits::{SourceKind, StreamInfo, VideoDecoder, VideoSession};
use telecine_core::SourceError;
use tracing::{debug, info, warn};

use super::probe::{probe, Probe};
use super::DecoderError;

/// Decoder-side options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FfmpegOptions {
    /// Have ffmpeg scale to this (width, height)
    pub prescale: Option<(u16, u16)>,
}

/// Check if a locator names a V4L2 capture device
pub fn is_capture_device(locator: &str) -> bool {
    locator.starts_with("/dev/video")
}

fn input_format(locator: &str) -> &'static [&'static str] {
    if is_capture_device(locator) {
        &["-f", "v4l2"]
    } else {
        &[]
    }
}

/// ffmpeg arguments for decoding `locator` to raw frames on stdout
pub fn ffmpeg_args(locator: &str, options: &FfmpegOptions) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-nostdin", "-noautorotate"]
        .iter()
        .chain(input_format(locator))
        .map(|s| s.to_string())
        .collect();

    args.push("-i".into());
    args.push(locator.into());
    if let Some((width, height)) = options.prescale {
        args.push("-vf".into());
        args.push(format!("scale={}:{}", width, height));
    }
    args.extend(
        ["-an", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"]
            .iter()
            .map(|s| s.to_string()),
    );
    args
}

/// Fill `buf` with the next frame
///
/// `Ok(false)` when the stream ends cleanly on a frame boundary; a frame
/// cut short is an `UnexpectedEof` error.
pub fn read_frame<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("truncated frame: {} of {} bytes", filled, buf.len()),
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Opens ffmpeg sessions on one locator
pub struct FfmpegDecoder {
    locator: String,
    options: FfmpegOptions,
}

impl FfmpegDecoder {
    pub fn new(locator: impl Into<String>, options: FfmpegOptions) -> Self {
        Self {
            locator: locator.into(),
            options,
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }
}

impl VideoDecoder for FfmpegDecoder {
    type Session = FfmpegSession;

    fn open(&mut self) -> Result<FfmpegSession, SourceError> {
        FfmpegSession::open(&self.locator, self.options).map_err(|e| {
            warn!(locator = %self.locator, error = %e, "failed to open source");
            SourceError::Unavailable
        })
    }
}

/// Running ffmpeg process and its output pipe
pub struct FfmpegSession {
    locator: String,
    options: FfmpegOptions,
    info: StreamInfo,
    frame_len: usize,
    child: Child,
    stdout: ChildStdout,
}

impl FfmpegSession {
    /// Probe `locator` and start decoding it
    pub fn open(locator: &str, options: FfmpegOptions) -> Result<Self, DecoderError> {
        let probed: Probe = probe(locator, input_format(locator))?;

        let (width, height) = match options.prescale {
            Some((w, h)) => (u32::from(w), u32::from(h)),
            None => (probed.width, probed.height),
        };
        let kind = if is_capture_device(locator) {
            SourceKind::Live
        } else {
            SourceKind::Finite
        };
        let info = StreamInfo {
            width,
            height,
            frame_rate: probed.frame_rate,
            kind,
        };
        let frame_len = width as usize * height as usize * SOURCE_BYTES_PER_PIXEL;

        let (child, stdout) = spawn(locator, &options)?;
        info!(
            locator,
            source_width = probed.width,
            source_height = probed.height,
            width,
            height,
            "decoder started"
        );

        Ok(Self {
            locator: locator.into(),
            options,
            info,
            frame_len,
            child,
            stdout,
        })
    }

    fn stop(&mut self) {
        // Already exited is fine
        let _ = self.child.kill();
        match self.child.wait() {
            Ok(status) => debug!(locator = %self.locator, %status, "decoder exited"),
            Err(e) => warn!(locator = %self.locator, error = %e, "failed to reap decoder"),
        }
    }
}

fn spawn(locator: &str, options: &FfmpegOptions) -> Result<(Child, ChildStdout), DecoderError> {
    let mut child = Command::new("ffmpeg")
        .args(ffmpeg_args(locator, options))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| DecoderError::Spawn {
            program: "ffmpeg",
            source,
        })?;

    match child.stdout.take() {
        Some(stdout) => Ok((child, stdout)),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(DecoderError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "ffmpeg stdout not captured",
            )))
        }
    }
}

impl VideoSession for FfmpegSession {
    fn info(&self) -> StreamInfo {
        self.info
    }

    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, SourceError> {
        let mut data = vec![0u8; self.frame_len];

        match read_frame(&mut self.stdout, &mut data) {
            Ok(true) => FrameBuffer::new(self.info.width, self.info.height, PixelOrder::Rgb, data).map(Some),
            Ok(false) => Ok(None),
            Err(e) => {
                let e = DecoderError::from(e);
                warn!(locator = %self.locator, error = %e, "frame read failed");
                Err(e.as_source_error())
            }
        }
    }

    fn seek_to_start(&mut self) -> Result<(), SourceError> {
        self.stop();
        let (child, stdout) = spawn(&self.locator, &self.options).map_err(|e| {
            warn!(locator = %self.locator, error = %e, "failed to restart decoder");
            e.as_source_error()
        })?;
        self.child = child;
        self.stdout = stdout;
        debug!(locator = %self.locator, "decoder restarted");
        Ok(())
    }
}

impl Drop for FfmpegSession {
    fn drop(&mut self) {
        self.stop();
    }
}
