//! Configuration type definitions
//!
//! `PlayerConfig` is the whole runtime configuration. The player binary
//! fills it from TOML, environment and command line, then calls
//! [`PlayerConfig::validate`] once before touching any hardware.

use alloc::string::String;
use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::{BusConfig, PinsConfig};
use super::panel::PanelConfig;
use crate::error::ConfigError;

/// Highest accepted frame rate override
pub const MAX_FPS: u16 = 120;

/// Frame rate used when neither the config nor the source gives one
pub const DEFAULT_FPS: u16 = 30;

/// Playback tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PlaybackConfig {
    /// Fixed frame rate; `None` follows the source's nominal rate
    pub fps: Option<u16>,
    /// Wait after a source failure before reconnecting (ms)
    pub retry_cooldown_ms: u32,
    /// Log a statistics line every this many frames (0 disables)
    pub stats_interval: u32,
    /// RGB565 color the panel is cleared to after init
    pub clear_color: u16,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: None,
            retry_cooldown_ms: 5000,
            stats_interval: 900,
            clear_color: 0x0000,
        }
    }
}

impl PlaybackConfig {
    /// Cooldown as a duration
    pub fn retry_cooldown(&self) -> Duration {
        Duration::from_millis(u64::from(self.retry_cooldown_ms))
    }
}

/// Video server played when no source is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Where frames come from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SourceConfig {
    /// File path, URL or capture device
    pub locator: Option<String>,
    /// Video server base URL; its playlist is played in order
    pub server_url: Option<String>,
    /// Let the decoder scale to the panel size
    pub prescale: bool,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SourceConfig {
    /// Locator to play, ignoring blank values
    pub fn media_locator(&self) -> Option<&str> {
        non_empty(&self.locator)
    }

    /// Video server whose playlist is played
    ///
    /// A configured `server_url` wins over the locator. With neither set,
    /// the server at [`DEFAULT_SERVER_URL`] is used.
    pub fn video_server(&self) -> Option<&str> {
        non_empty(&self.server_url)
            .or_else(|| self.media_locator().is_none().then_some(DEFAULT_SERVER_URL))
    }
}

/// Complete player configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PlayerConfig {
    /// Panel geometry
    pub panel: PanelConfig,
    /// SPI bus
    pub bus: BusConfig,
    /// Control lines
    pub pins: PinsConfig,
    /// Playback tuning
    pub playback: PlaybackConfig,
    /// Video source
    pub source: SourceConfig,
}

impl PlayerConfig {
    /// Validate the configuration
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.panel.validate()?;
        self.pins.validate()?;

        if self.bus.max_chunk_bytes == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.bus.clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        if self.playback.retry_cooldown_ms == 0 {
            return Err(ConfigError::ZeroCooldown);
        }
        if let Some(fps) = self.playback.fps {
            if fps == 0 || fps > MAX_FPS {
                return Err(ConfigError::InvalidFrameRate(fps));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GpioPin, Orientation};

    fn valid() -> PlayerConfig {
        PlayerConfig {
            source: SourceConfig {
                locator: Some(String::from("/srv/video/loop.mp4")),
                ..SourceConfig::default()
            },
            ..PlayerConfig::default()
        }
    }

    #[test]
    fn test_defaults_match_reference_wiring() {
        let config = PlayerConfig::default();
        assert_eq!(config.panel.width, 320);
        assert_eq!(config.panel.height, 240);
        assert_eq!(config.panel.orientation, Orientation::Landscape90);
        assert!(config.panel.color_inversion);
        assert_eq!(config.bus.bus, 0);
        assert_eq!(config.bus.device, 0);
        assert_eq!(config.bus.clock_hz, 40_000_000);
        assert_eq!(config.bus.max_chunk_bytes, 4096);
        assert_eq!(config.pins.reset, GpioPin(27));
        assert_eq!(config.pins.data_command, GpioPin(25));
        assert_eq!(config.pins.backlight, Some(GpioPin(24)));
        assert_eq!(config.playback.retry_cooldown(), Duration::from_secs(5));
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn test_source_selection() {
        // Nothing configured: the local video server
        let mut source = SourceConfig::default();
        assert_eq!(source.video_server(), Some(DEFAULT_SERVER_URL));
        assert_eq!(PlayerConfig::default().validate(), Ok(()));

        source.locator = Some(String::from("   "));
        assert_eq!(source.media_locator(), None);
        assert_eq!(source.video_server(), Some(DEFAULT_SERVER_URL));

        source.locator = Some(String::from(" /srv/a.mp4 "));
        assert_eq!(source.media_locator(), Some("/srv/a.mp4"));
        assert_eq!(source.video_server(), None);

        source.server_url = Some(String::from("http://10.0.0.2:8000"));
        assert_eq!(source.video_server(), Some("http://10.0.0.2:8000"));
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = valid();
        config.bus.max_chunk_bytes = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroChunkSize));

        let mut config = valid();
        config.bus.clock_hz = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroClock));

        let mut config = valid();
        config.playback.retry_cooldown_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCooldown));
    }

    #[test]
    fn test_frame_rate_bounds() {
        let mut config = valid();
        for fps in [1, 30, 60, MAX_FPS] {
            config.playback.fps = Some(fps);
            assert_eq!(config.validate(), Ok(()));
        }
        for fps in [0, MAX_FPS + 1, 1000] {
            config.playback.fps = Some(fps);
            assert_eq!(config.validate(), Err(ConfigError::InvalidFrameRate(fps)));
        }
    }

    #[test]
    fn test_panel_errors_surface_first() {
        let mut config = valid();
        config.panel.height = 0;
        config.bus.max_chunk_bytes = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroDimension));
    }
}
