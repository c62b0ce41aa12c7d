//! Board wiring
//!
//! Opens the SPI device and the control lines named in the config and
//! hands them to the panel driver.

use anyhow::Context;
use telecine_core::config::PlayerConfig;
use telecine_drivers::St7789;
use telecine_hal::{Level, OutputPin, SpiConfig};
use telecine_hal_linux::{GpioAllocator, LinuxPin, LinuxSpi, SystemClock};
use tracing::{info, warn};

/// The panel on Linux peripherals
pub type Panel = St7789<LinuxSpi, LinuxPin, LinuxPin, SystemClock>;

/// Everything attached to the panel connector
pub struct Hardware {
    pub panel: Panel,
    backlight: Option<LinuxPin>,
    _gpio: GpioAllocator,
}

impl Hardware {
    /// Open the bus and request the control lines
    ///
    /// D/C starts low and RST high (not in reset); the backlight stays off
    /// until the panel has been cleared.
    pub fn open(config: &PlayerConfig) -> anyhow::Result<Self> {
        let spi_config = SpiConfig::with_frequency(config.bus.clock_hz);
        let spi = LinuxSpi::open(config.bus.bus, config.bus.device, &spi_config)
            .context("opening SPI device")?;

        let mut gpio = GpioAllocator::open(&config.pins.chip).context("opening GPIO chip")?;
        let dc = gpio
            .output(config.pins.data_command, Level::Low, "telecine-dc")
            .context("requesting D/C line")?;
        let rst = gpio
            .output(config.pins.reset, Level::High, "telecine-rst")
            .context("requesting RST line")?;
        let backlight = config
            .pins
            .backlight
            .map(|pin| gpio.output(pin, Level::Low, "telecine-bl"))
            .transpose()
            .context("requesting backlight line")?;

        info!(
            spi = spi.path(),
            chip = gpio.path(),
            dc = %config.pins.data_command,
            rst = %config.pins.reset,
            backlight = ?config.pins.backlight.map(|p| p.number()),
            "control lines ready"
        );

        let panel = St7789::new(spi, dc, rst, SystemClock::new(), config.bus.max_chunk_bytes);

        Ok(Self {
            panel,
            backlight,
            _gpio: gpio,
        })
    }

    /// Switch the backlight, if there is one
    pub fn set_backlight(&mut self, on: bool) {
        if let Some(pin) = self.backlight.as_mut() {
            if let Err(e) = pin.set_level(Level::from(on)) {
                warn!(error = %e, on, "backlight switch failed");
            }
        }
    }

    /// Put the panel to sleep and turn the backlight off
    ///
    /// Best effort; the driver still releases its lines on drop.
    pub fn shutdown(&mut self) {
        self.set_backlight(false);
        if let Err(e) = self.panel.shutdown() {
            warn!(error = %e, "panel sleep failed");
        }
    }
}
