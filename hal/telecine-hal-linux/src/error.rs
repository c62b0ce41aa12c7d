//! Linux peripheral errors

use thiserror::Error;

/// Errors from the Linux SPI and GPIO backends
#[derive(Debug, Error)]
pub enum LinuxHalError {
    #[error("failed to open {path}: {source}")]
    SpiOpen {
        path: String,
        #[source]
        source: linux_embedded_hal::SPIError,
    },

    #[error("failed to configure SPI: {0}")]
    SpiConfigure(#[source] std::io::Error),

    #[error("SPI write failed: {0}")]
    SpiWrite(String),

    #[error("failed to open GPIO chip {path}: {message}")]
    GpioChip { path: String, message: String },

    #[error("GPIO line {line}: {message}")]
    GpioLine { line: u8, message: String },

    #[error("GPIO line {0} is already in use")]
    PinInUse(u8),

    #[error("GPIO line {0} is beyond the chip")]
    PinOutOfRange(u8),
}
