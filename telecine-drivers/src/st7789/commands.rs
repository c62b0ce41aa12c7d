//! ST7789 command set and init tables
//!
//! Tuning values are the Waveshare 2-inch module settings (porch, gate
//! voltage, VCOM, power and gamma), which also suit the common 240x320 IPS
//! breakouts.

/// ST7789 command bytes
pub mod cmd {
    /// Software reset
    pub const SWRESET: u8 = 0x01;
    /// Enter sleep mode
    pub const SLPIN: u8 = 0x10;
    /// Exit sleep mode
    pub const SLPOUT: u8 = 0x11;
    /// Normal display mode on
    pub const NORON: u8 = 0x13;
    /// Display inversion off
    pub const INVOFF: u8 = 0x20;
    /// Display inversion on
    pub const INVON: u8 = 0x21;
    /// Display off
    pub const DISPOFF: u8 = 0x28;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory data access control
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const COLMOD: u8 = 0x3A;
    /// Porch setting
    pub const PORCTRL: u8 = 0xB2;
    /// Gate control
    pub const GCTRL: u8 = 0xB7;
    /// VCOM setting
    pub const VCOMS: u8 = 0xBB;
    /// LCM control
    pub const LCMCTRL: u8 = 0xC0;
    /// VDV and VRH command enable
    pub const VDVVRHEN: u8 = 0xC2;
    /// VRH set
    pub const VRHS: u8 = 0xC3;
    /// VDV set
    pub const VDVS: u8 = 0xC4;
    /// Frame rate control in normal mode
    pub const FRCTRL2: u8 = 0xC6;
    /// Power control 1
    pub const PWCTRL1: u8 = 0xD0;
    /// Positive voltage gamma control
    pub const PVGAMCTRL: u8 = 0xE0;
    /// Negative voltage gamma control
    pub const NVGAMCTRL: u8 = 0xE1;
}

/// COLMOD parameter: 65k colors, 16 bits per pixel
pub const COLMOD_RGB565: u8 = 0x55;

/// Settle time between RST transitions
pub const RESET_PULSE_MS: u32 = 10;

/// One command with its parameter bytes and mandatory settle delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandStep {
    /// Command byte (sent with D/C low)
    pub command: u8,
    /// Parameter bytes (sent with D/C high)
    pub data: &'static [u8],
    /// Wait after the last parameter byte
    pub delay_ms: u32,
}

impl CommandStep {
    const fn new(command: u8, data: &'static [u8], delay_ms: u32) -> Self {
        Self {
            command,
            data,
            delay_ms,
        }
    }
}

/// Software reset, sleep out, 16-bit pixel format
pub static WAKE_SEQUENCE: [CommandStep; 3] = [
    CommandStep::new(cmd::SWRESET, &[], 150),
    CommandStep::new(cmd::SLPOUT, &[], 150),
    CommandStep::new(cmd::COLMOD, &[COLMOD_RGB565], 0),
];

/// Porch, gate, power and gamma tuning
pub static TUNING_SEQUENCE: [CommandStep; 11] = [
    CommandStep::new(cmd::PORCTRL, &[0x0C, 0x0C, 0x00, 0x33, 0x33], 0),
    CommandStep::new(cmd::GCTRL, &[0x35], 0),
    CommandStep::new(cmd::VCOMS, &[0x19], 0),
    CommandStep::new(cmd::LCMCTRL, &[0x2C], 0),
    CommandStep::new(cmd::VDVVRHEN, &[0x01], 0),
    CommandStep::new(cmd::VRHS, &[0x12], 0),
    CommandStep::new(cmd::VDVS, &[0x20], 0),
    CommandStep::new(cmd::FRCTRL2, &[0x0F], 0),
    CommandStep::new(cmd::PWCTRL1, &[0xA4, 0xA1], 0),
    CommandStep::new(
        cmd::PVGAMCTRL,
        &[
            0xD0, 0x04, 0x0D, 0x11, 0x13, 0x2B, 0x3F, 0x54, 0x4C, 0x18, 0x0D, 0x0B, 0x1F, 0x23,
        ],
        0,
    ),
    CommandStep::new(
        cmd::NVGAMCTRL,
        &[
            0xD0, 0x04, 0x0C, 0x11, 0x13, 0x2C, 0x3F, 0x44, 0x51, 0x2F, 0x1F, 0x1F, 0x20, 0x23,
        ],
        0,
    ),
];

/// Normal display mode, then display on
pub static DISPLAY_ON_SEQUENCE: [CommandStep; 2] = [
    CommandStep::new(cmd::NORON, &[], 50),
    CommandStep::new(cmd::DISPON, &[], 150),
];

/// Display off, then sleep in (5 ms before the next command is accepted)
pub static SLEEP_SEQUENCE: [CommandStep; 2] = [
    CommandStep::new(cmd::DISPOFF, &[], 0),
    CommandStep::new(cmd::SLPIN, &[], 5),
];

/// Inversion command for the configured panel
pub fn inversion_command(color_inversion: bool) -> u8 {
    if color_inversion {
        cmd::INVON
    } else {
        cmd::INVOFF
    }
}
