//! Panel geometry
//!
//! The ST7789 has 240x320 pixels of RAM. The orientation decides which
//! way round that RAM is scanned, and therefore which logical sizes fit.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Short side of the controller RAM
pub const RAM_SHORT_SIDE: u16 = 240;

/// Long side of the controller RAM
pub const RAM_LONG_SIDE: u16 = 320;

/// Panel orientation
///
/// Selected once at init through the MADCTL register. The controller does
/// the row/column exchange and mirroring; no software transform is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum Orientation {
    /// 0 degrees
    Portrait0,
    /// 90 degrees
    #[default]
    Landscape90,
    /// 180 degrees
    Portrait180,
    /// 270 degrees
    Landscape270,
}

impl Orientation {
    /// Map a configuration index (0-3) to an orientation
    pub fn from_index(index: u8) -> Result<Self, ConfigError> {
        match index {
            0 => Ok(Orientation::Portrait0),
            1 => Ok(Orientation::Landscape90),
            2 => Ok(Orientation::Portrait180),
            3 => Ok(Orientation::Landscape270),
            other => Err(ConfigError::InvalidOrientation(other)),
        }
    }

    /// Configuration index of this orientation
    pub fn index(self) -> u8 {
        match self {
            Orientation::Portrait0 => 0,
            Orientation::Landscape90 => 1,
            Orientation::Portrait180 => 2,
            Orientation::Landscape270 => 3,
        }
    }

    /// MADCTL register value
    ///
    /// Bit 7 MY (row order), bit 6 MX (column order), bit 5 MV (row/column
    /// exchange). RGB order and refresh direction bits stay clear.
    pub fn madctl(self) -> u8 {
        match self {
            Orientation::Portrait0 => 0x00,
            Orientation::Landscape90 => 0x60,
            Orientation::Portrait180 => 0xC0,
            Orientation::Landscape270 => 0xA0,
        }
    }

    /// Check if rows and columns are exchanged
    pub fn is_landscape(self) -> bool {
        matches!(self, Orientation::Landscape90 | Orientation::Landscape270)
    }

    /// Largest (width, height) the controller RAM holds in this orientation
    pub fn max_size(self) -> (u16, u16) {
        if self.is_landscape() {
            (RAM_LONG_SIDE, RAM_SHORT_SIDE)
        } else {
            (RAM_SHORT_SIDE, RAM_LONG_SIDE)
        }
    }
}

impl TryFrom<u8> for Orientation {
    type Error = ConfigError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Orientation::from_index(index)
    }
}

impl From<Orientation> for u8 {
    fn from(orientation: Orientation) -> Self {
        orientation.index()
    }
}

/// Panel configuration
///
/// Immutable after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PanelConfig {
    /// Visible width in pixels, after orientation
    pub width: u16,
    /// Visible height in pixels, after orientation
    pub height: u16,
    /// Scan orientation
    pub orientation: Orientation,
    /// Send INVON instead of INVOFF (most IPS modules need this)
    pub color_inversion: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            orientation: Orientation::Landscape90,
            color_inversion: true,
        }
    }
}

impl PanelConfig {
    /// Check dimensions against the controller RAM
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        let (max_w, max_h) = self.orientation.max_size();
        if self.width > max_w || self.height > max_h {
            return Err(ConfigError::PanelTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Inclusive pixel rectangle for the next RAM write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressWindow {
    /// First column
    pub x_start: u16,
    /// First row
    pub y_start: u16,
    /// Last column (inclusive)
    pub x_end: u16,
    /// Last row (inclusive)
    pub y_end: u16,
}

impl AddressWindow {
    /// Create a window from inclusive bounds
    pub const fn new(x_start: u16, y_start: u16, x_end: u16, y_end: u16) -> Self {
        Self {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    /// Window of `width` x `height` pixels anchored at the origin
    ///
    /// Returns `None` for an empty size.
    pub fn from_size(width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::new(0, 0, width - 1, height - 1))
    }

    /// Check `start <= end` on both axes and `end` inside the panel
    pub fn fits(&self, panel: &PanelConfig) -> bool {
        self.x_start <= self.x_end
            && self.y_start <= self.y_end
            && self.x_end < panel.width
            && self.y_end < panel.height
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.x_end.saturating_sub(self.x_start).saturating_add(1)
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.y_end.saturating_sub(self.y_start).saturating_add(1)
    }

    /// Number of pixels the controller expects after RAMWR
    pub fn pixel_count(&self) -> usize {
        usize::from(self.width()) * usize::from(self.height())
    }
}
