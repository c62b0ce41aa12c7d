//! Playback loop
//!
//! Drives the state machine: opens the source, pulls one frame per step,
//! fits and converts it, hands it to the sink and paces to the frame
//! interval.
//! Finite sources are rewound at their end; source failures are waited out
//! with a fixed cooldown and retried forever.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use telecine_hal::Clock;
use tracing::{debug, info, trace, warn};

use super::stats::PlaybackStats;
use crate::codec;
use crate::config::{PlaybackConfig, DEFAULT_FPS};
use crate::error::SourceError;
use crate::state::{Event, PlaybackState};
use crate::traits::{FrameScaler, FrameSink, SourceKind, StreamInfo, VideoDecoder, VideoSession};

/// Longest uninterrupted sleep while waiting out a cooldown
pub const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Frame interval when neither the config nor the source gives a rate
pub const fn default_frame_interval() -> Duration {
    Duration::from_nanos(1_000_000_000 / DEFAULT_FPS as u64)
}

/// Loop tuning derived from [`PlaybackConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSettings {
    /// Fixed frame interval; `None` follows the source
    pub frame_interval: Option<Duration>,
    /// Wait after a source failure
    pub retry_cooldown: Duration,
    /// Frames between statistics lines (0 disables)
    pub stats_interval: u32,
}

impl PlayerSettings {
    /// Derive loop settings from the playback config
    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            frame_interval: config
                .fps
                .filter(|fps| *fps > 0)
                .map(|fps| Duration::from_nanos(1_000_000_000 / u64::from(fps))),
            retry_cooldown: config.retry_cooldown(),
            stats_interval: config.stats_interval,
        }
    }

    /// Interval to pace a session at
    pub fn interval_for(&self, info: &StreamInfo) -> Duration {
        self.frame_interval
            .or_else(|| info.frame_interval())
            .unwrap_or_else(default_frame_interval)
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}

/// Playback loop over a decoder, a frame sink, a scaler and a clock
pub struct Player<'s, D: VideoDecoder, S, Z, C> {
    decoder: D,
    sink: S,
    scaler: Z,
    clock: C,
    settings: PlayerSettings,
    stop: &'s AtomicBool,
    state: PlaybackState,
    session: Option<D::Session>,
    interval: Duration,
    /// Frames pulled since the session was opened or last rewound
    pass_frames: u32,
    stats: PlaybackStats,
}

impl<'s, D, S, Z, C> Player<'s, D, S, Z, C>
where
    D: VideoDecoder,
    S: FrameSink,
    Z: FrameScaler,
    C: Clock,
{
    /// Create an idle player
    ///
    /// `stop` is polled between frames and during cooldowns.
    pub fn new(
        decoder: D,
        sink: S,
        scaler: Z,
        clock: C,
        settings: PlayerSettings,
        stop: &'s AtomicBool,
    ) -> Self {
        Self {
            decoder,
            sink,
            scaler,
            clock,
            settings,
            stop,
            state: PlaybackState::Idle,
            session: None,
            interval: settings.frame_interval.unwrap_or_else(default_frame_interval),
            pass_frames: 0,
            stats: PlaybackStats::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Counters so far
    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }

    /// Interval the current session is paced at
    pub fn frame_interval(&self) -> Duration {
        self.interval
    }

    /// The decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// The frame sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Run until a stop is requested
    pub fn run(&mut self) -> PlaybackStats {
        info!("playback started");
        while !self.stop_requested() {
            self.step();
        }
        self.apply(Event::Stop);
        info!(stats = %self.stats, "playback stopped");
        self.stats
    }

    /// Do one unit of work for the current state
    ///
    /// Streaming processes exactly one frame; SourceError waits out one
    /// whole cooldown.
    pub fn step(&mut self) -> PlaybackState {
        if self.stop_requested() {
            return self.apply(Event::Stop);
        }

        let event = match self.state {
            PlaybackState::Idle => Event::Start,
            PlaybackState::Connecting => self.connect(),
            PlaybackState::Streaming => self.stream_one(),
            PlaybackState::EndOfStream => self.end_of_stream(),
            PlaybackState::SourceError => self.cool_down(),
        };

        self.apply(event)
    }

    fn apply(&mut self, event: Event) -> PlaybackState {
        let next = self.state.transition(event);

        if next != self.state {
            debug!(from = self.state.as_str(), to = next.as_str(), "playback state change");
            if next == PlaybackState::SourceError {
                self.stats.source_errors += 1;
            }
        }
        if !next.holds_session() {
            self.session = None;
        }

        self.state = next;
        next
    }

    fn connect(&mut self) -> Event {
        if let Some(session) = self.session.as_mut() {
            return match session.seek_to_start() {
                Ok(()) => {
                    let info = session.info();
                    self.interval = self.settings.interval_for(&info);
                    self.pass_frames = 0;
                    self.stats.rewinds += 1;
                    debug!(width = info.width, height = info.height, "source rewound");
                    Event::Opened
                }
                Err(err) => {
                    warn!(error = %err, "rewind failed");
                    Event::OpenFailed
                }
            };
        }

        match self.decoder.open() {
            Ok(session) => {
                let info = session.info();
                let live = info.kind == SourceKind::Live;
                self.interval = self.settings.interval_for(&info);
                info!(
                    width = info.width,
                    height = info.height,
                    fps = ?info.frame_rate,
                    interval_us = self.interval.as_micros() as u64,
                    live,
                    "source opened"
                );
                self.session = Some(session);
                self.pass_frames = 0;
                self.stats.connects += 1;
                Event::Opened
            }
            Err(err) => {
                warn!(error = %err, "could not open source");
                Event::OpenFailed
            }
        }
    }

    fn stream_one(&mut self) -> Event {
        let started = self.clock.now();

        let Some(session) = self.session.as_mut() else {
            return Event::SourceLost;
        };

        let frame = match session.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!(frames = self.pass_frames, "end of stream");
                return Event::StreamEnded;
            }
            Err(SourceError::Unavailable) => {
                warn!("source lost mid-stream");
                return Event::SourceLost;
            }
            Err(err) => {
                warn!(error = %err, "treating decode failure as end of stream");
                return Event::DecodeFailed;
            }
        };

        let (width, height) = self.sink.panel_size();
        let stream = codec::convert(frame, width, height, &mut self.scaler);

        let event = match self.sink.write_frame(&stream) {
            Ok(()) => {
                self.stats.frames_shown += 1;
                Event::FrameShown
            }
            Err(err) => {
                self.stats.frames_dropped += 1;
                warn!(error = %err, "frame dropped");
                Event::FrameDropped
            }
        };
        self.pass_frames = self.pass_frames.saturating_add(1);

        if self.stats.summary_due(self.settings.stats_interval) {
            info!(stats = %self.stats, "playback");
        }

        let elapsed = self.clock.elapsed_since(started);
        trace!(elapsed_us = elapsed.as_micros() as u64, "frame processed");
        if let Some(remaining) = self.interval.checked_sub(elapsed) {
            if !remaining.is_zero() {
                self.clock.sleep(remaining);
            }
        }

        event
    }

    fn end_of_stream(&mut self) -> Event {
        let Some(session) = self.session.as_ref() else {
            return Event::SourceLost;
        };

        if session.info().kind == SourceKind::Live {
            warn!("live source ended");
            return Event::SourceLost;
        }
        if self.pass_frames == 0 {
            // Rewinding an empty source would spin without ever sleeping
            warn!("source ended before its first frame");
            return Event::SourceLost;
        }

        Event::Rewind
    }

    fn cool_down(&mut self) -> Event {
        let cooldown = self.settings.retry_cooldown;
        info!(cooldown_ms = cooldown.as_millis() as u64, "waiting before reconnect");

        let start = self.clock.now();
        loop {
            if self.stop_requested() {
                return Event::Stop;
            }
            let waited = self.clock.elapsed_since(start);
            match cooldown.checked_sub(waited) {
                Some(remaining) if !remaining.is_zero() => {
                    self.clock.sleep(remaining.min(STOP_POLL_INTERVAL));
                }
                _ => break,
            }
        }

        Event::CooldownElapsed
    }
}
