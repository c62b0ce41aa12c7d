//! Error taxonomy
//!
//! Errors are small `Copy` values. The layer that observes the underlying
//! platform error logs it; only the classification travels upward.

use core::fmt;

/// Stage of panel initialization that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStage {
    /// RST pulse
    HardwareReset,
    /// Software reset, sleep-out, pixel format
    Wake,
    /// Porch, gate, power and gamma tables
    Tuning,
    /// MADCTL write
    Orientation,
    /// INVON/INVOFF
    Inversion,
    /// Normal display on, display on
    DisplayOn,
}

impl InitStage {
    /// Short name for log messages
    pub fn as_str(self) -> &'static str {
        match self {
            InitStage::HardwareReset => "hardware reset",
            InitStage::Wake => "wake",
            InitStage::Tuning => "panel tuning",
            InitStage::Orientation => "orientation",
            InitStage::Inversion => "inversion",
            InitStage::DisplayOn => "display on",
        }
    }
}

/// Panel protocol errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// The bus transport rejected a write
    BusFailure,
    /// A control line (D/C, RST) could not be driven
    ControlLineFailure,
    /// Initialization did not complete; the panel cannot display anything
    InitFailure(InitStage),
    /// Panel configuration rejected before initialization
    InvalidConfig(ConfigError),
    /// Address window outside the panel or with start > end
    InvalidWindow,
    /// Chunk size of zero
    InvalidChunkSize,
    /// Pixel stream length does not match the address window
    StreamSizeMismatch,
    /// Frame write attempted before `initialize`
    NotInitialized,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::BusFailure => f.write_str("bus write failed"),
            ProtocolError::ControlLineFailure => f.write_str("control line could not be driven"),
            ProtocolError::InitFailure(stage) => {
                write!(f, "panel initialization failed during {}", stage.as_str())
            }
            ProtocolError::InvalidConfig(err) => write!(f, "invalid panel configuration: {}", err),
            ProtocolError::InvalidWindow => f.write_str("address window outside panel bounds"),
            ProtocolError::InvalidChunkSize => f.write_str("chunk size must be non-zero"),
            ProtocolError::StreamSizeMismatch => {
                f.write_str("pixel stream size does not match address window")
            }
            ProtocolError::NotInitialized => f.write_str("panel not initialized"),
        }
    }
}

/// Video source errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// The source could not be opened or fetched
    Unavailable,
    /// A frame could not be read mid-stream
    DecodeFailure,
    /// The decoder produced a frame of unexpected shape
    MalformedFrame,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unavailable => f.write_str("video source unavailable"),
            SourceError::DecodeFailure => f.write_str("frame decode failed"),
            SourceError::MalformedFrame => f.write_str("decoder produced a malformed frame"),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Orientation index outside 0..=3
    InvalidOrientation(u8),
    /// Zero width or height
    ZeroDimension,
    /// Panel larger than controller RAM in the configured orientation
    PanelTooLarge {
        /// Configured width
        width: u16,
        /// Configured height
        height: u16,
    },
    /// Pin string could not be parsed
    InvalidPin,
    /// Pin number beyond the GPIO chip
    PinOutOfRange(u8),
    /// The same pin is assigned to two functions
    DuplicatePin(u8),
    /// Chunk size of zero
    ZeroChunkSize,
    /// SPI clock of zero
    ZeroClock,
    /// Retry cooldown of zero
    ZeroCooldown,
    /// Frame rate outside 1..=120
    InvalidFrameRate(u16),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidOrientation(idx) => {
                write!(f, "orientation {} is not one of 0, 1, 2, 3", idx)
            }
            ConfigError::ZeroDimension => f.write_str("panel width and height must be non-zero"),
            ConfigError::PanelTooLarge { width, height } => write!(
                f,
                "panel {}x{} exceeds controller RAM for this orientation",
                width, height
            ),
            ConfigError::InvalidPin => f.write_str("pin must be a number or 'gpioN'"),
            ConfigError::PinOutOfRange(pin) => write!(f, "pin {} is beyond the GPIO chip", pin),
            ConfigError::DuplicatePin(pin) => write!(f, "pin {} is assigned twice", pin),
            ConfigError::ZeroChunkSize => f.write_str("max_chunk_bytes must be non-zero"),
            ConfigError::ZeroClock => f.write_str("SPI clock must be non-zero"),
            ConfigError::ZeroCooldown => f.write_str("retry_cooldown_ms must be non-zero"),
            ConfigError::InvalidFrameRate(fps) => {
                write!(f, "frame rate {} outside 1..=120", fps)
            }
        }
    }
}
