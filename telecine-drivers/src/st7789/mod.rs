//! ST7789 panel driver (4-wire SPI)
//!
//! The ST7789 multiplexes commands and data on one SPI link. A separate
//! Data/Command line tells them apart:
//!
//! - D/C low: the byte is a command
//! - D/C high: the byte is a command parameter or pixel data
//!
//! # Frame write
//!
//! ```text
//! CASET  xs_hi xs_lo xe_hi xe_lo
//! RASET  ys_hi ys_lo ye_hi ye_lo
//! RAMWR  <width * height * 2 bytes, RGB565 big-endian, chunked>
//! ```
//!
//! The driver owns the bus and both control lines. Dropping it drives D/C
//! and RST low.

pub mod commands;

use telecine_core::codec::PixelStream;
use telecine_core::config::{AddressWindow, PanelConfig};
use telecine_core::error::InitStage;
use telecine_core::traits::FrameSink;
use telecine_core::ProtocolError;
use telecine_hal::{Clock, OutputPin, SpiBus};
use tracing::{debug, info, warn};

use crate::transfer;
use commands::{cmd, CommandStep, RESET_PULSE_MS};

/// ST7789 driver
pub struct St7789<SPI, DC, RST, C>
where
    DC: OutputPin,
    RST: OutputPin,
{
    spi: SPI,
    dc: DC,
    rst: RST,
    clock: C,
    max_chunk_bytes: usize,
    /// Set once initialization has completed
    panel: Option<PanelConfig>,
}

impl<SPI, DC, RST, C> St7789<SPI, DC, RST, C>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin,
    C: Clock,
{
    /// Create a driver; nothing is sent until [`St7789::initialize`]
    pub fn new(spi: SPI, dc: DC, rst: RST, clock: C, max_chunk_bytes: usize) -> Self {
        Self {
            spi,
            dc,
            rst,
            clock,
            max_chunk_bytes,
            panel: None,
        }
    }

    /// Check if initialization has completed
    pub fn is_initialized(&self) -> bool {
        self.panel.is_some()
    }

    /// The clock the driver delays on
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn set_dc(&mut self, high: bool) -> Result<(), ProtocolError> {
        let result = if high { self.dc.set_high() } else { self.dc.set_low() };
        result.map_err(|err| {
            warn!(error = ?err, high, "failed to drive D/C");
            ProtocolError::ControlLineFailure
        })
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), ProtocolError> {
        self.spi.write(&[byte]).map_err(|err| {
            warn!(error = ?err, byte, "SPI write failed");
            ProtocolError::BusFailure
        })
    }

    /// Send one command byte (D/C low)
    pub fn write_command(&mut self, command: u8) -> Result<(), ProtocolError> {
        self.set_dc(false)?;
        self.write_byte(command)
    }

    /// Send one parameter byte (D/C high)
    pub fn write_data(&mut self, byte: u8) -> Result<(), ProtocolError> {
        self.set_dc(true)?;
        self.write_byte(byte)
    }

    fn send_step(&mut self, step: &CommandStep) -> Result<(), ProtocolError> {
        self.write_command(step.command)?;
        for &byte in step.data {
            self.write_data(byte)?;
        }
        if step.delay_ms > 0 {
            self.clock.delay_ms(step.delay_ms);
        }
        Ok(())
    }

    fn run_sequence(&mut self, steps: &[CommandStep], stage: InitStage) -> Result<(), ProtocolError> {
        for step in steps {
            self.send_step(step).map_err(|err| {
                warn!(command = step.command, stage = stage.as_str(), error = %err, "init command failed");
                ProtocolError::InitFailure(stage)
            })?;
        }
        Ok(())
    }

    fn set_rst(&mut self, high: bool) -> Result<(), ProtocolError> {
        let result = if high { self.rst.set_high() } else { self.rst.set_low() };
        result.map_err(|err| {
            warn!(error = ?err, high, "failed to drive RST");
            ProtocolError::ControlLineFailure
        })
    }

    /// Pulse RST high, low, high with a settle delay after each edge
    pub fn hardware_reset(&mut self) -> Result<(), ProtocolError> {
        for high in [true, false, true] {
            self.set_rst(high)?;
            self.clock.delay_ms(RESET_PULSE_MS);
        }
        Ok(())
    }

    /// Reset and configure the panel
    ///
    /// Every step is sent in order with its settle delay. A configuration
    /// that does not fit the controller RAM is rejected before the reset.
    pub fn initialize(&mut self, config: PanelConfig) -> Result<(), ProtocolError> {
        if let Err(err) = config.validate() {
            warn!(error = %err, "panel configuration rejected");
            return Err(ProtocolError::InvalidConfig(err));
        }
        self.panel = None;

        self.hardware_reset()
            .map_err(|_| ProtocolError::InitFailure(InitStage::HardwareReset))?;

        self.run_sequence(&commands::WAKE_SEQUENCE, InitStage::Wake)?;
        self.run_sequence(&commands::TUNING_SEQUENCE, InitStage::Tuning)?;

        let madctl = config.orientation.madctl();
        self.write_command(cmd::MADCTL)
            .and_then(|_| self.write_data(madctl))
            .map_err(|_| ProtocolError::InitFailure(InitStage::Orientation))?;

        self.write_command(commands::inversion_command(config.color_inversion))
            .map_err(|_| ProtocolError::InitFailure(InitStage::Inversion))?;

        self.run_sequence(&commands::DISPLAY_ON_SEQUENCE, InitStage::DisplayOn)?;

        info!(
            width = config.width,
            height = config.height,
            madctl,
            inverted = config.color_inversion,
            "panel initialized"
        );
        self.panel = Some(config);
        Ok(())
    }

    /// Address the rectangle the next RAM write fills
    ///
    /// Sends CASET and RASET with 4 bytes each, then RAMWR. Windows outside
    /// the panel are rejected before any byte goes out.
    pub fn set_address_window(&mut self, window: AddressWindow) -> Result<(), ProtocolError> {
        let panel = self.panel.ok_or(ProtocolError::NotInitialized)?;
        if !window.fits(&panel) {
            return Err(ProtocolError::InvalidWindow);
        }

        let [xs_hi, xs_lo] = window.x_start.to_be_bytes();
        let [xe_hi, xe_lo] = window.x_end.to_be_bytes();
        let [ys_hi, ys_lo] = window.y_start.to_be_bytes();
        let [ye_hi, ye_lo] = window.y_end.to_be_bytes();

        self.write_command(cmd::CASET)?;
        for byte in [xs_hi, xs_lo, xe_hi, xe_lo] {
            self.write_data(byte)?;
        }
        self.write_command(cmd::RASET)?;
        for byte in [ys_hi, ys_lo, ye_hi, ye_lo] {
            self.write_data(byte)?;
        }
        self.write_command(cmd::RAMWR)
    }

    /// Send pixel data for the current window in bus-sized chunks
    pub fn transmit(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        transfer::transmit(&mut self.spi, &mut self.dc, bytes, self.max_chunk_bytes)
    }

    /// Address `window` and fill it with `bytes`
    pub fn draw(&mut self, window: AddressWindow, bytes: &[u8]) -> Result<(), ProtocolError> {
        if bytes.len() != window.pixel_count() * 2 {
            return Err(ProtocolError::StreamSizeMismatch);
        }
        self.set_address_window(window)?;
        self.transmit(bytes)
    }

    /// Turn the display off and put the controller to sleep
    ///
    /// The driver has to be initialized again before the next frame.
    pub fn shutdown(&mut self) -> Result<(), ProtocolError> {
        if self.panel.take().is_none() {
            return Ok(());
        }
        for step in &commands::SLEEP_SEQUENCE {
            self.send_step(step)?;
        }
        debug!("panel asleep");
        Ok(())
    }
}

impl<SPI, DC, RST, C> FrameSink for St7789<SPI, DC, RST, C>
where
    SPI: SpiBus,
    DC: OutputPin,
    RST: OutputPin,
    C: Clock,
{
    fn panel_size(&self) -> (u16, u16) {
        self.panel.map_or((0, 0), |panel| (panel.width, panel.height))
    }

    fn write_frame(&mut self, stream: &PixelStream) -> Result<(), ProtocolError> {
        let window = stream.window().ok_or(ProtocolError::InvalidWindow)?;
        self.draw(window, stream.as_bytes())
    }
}

impl<SPI, DC, RST, C> Drop for St7789<SPI, DC, RST, C>
where
    DC: OutputPin,
    RST: OutputPin,
{
    fn drop(&mut self) {
        if self.dc.set_low().is_err() {
            warn!("failed to drive D/C low on release");
        }
        if self.rst.set_low().is_err() {
            warn!("failed to drive RST low on release");
        }
    }
}
