//! Linux HAL for the panel streamer
//!
//! This crate provides Linux implementations of the shared `telecine-hal`
//! traits on a single-board computer:
//!
//! - SPI through `/dev/spidevB.D`, chunk limit read from the spidev module
//! - Output lines through the GPIO character device, with line allocation
//! - Monotonic clock and blocking sleeps on `std::time`

#![deny(unsafe_code)]

pub mod clock;
pub mod error;
pub mod gpio;
pub mod spi;

pub use clock::SystemClock;
pub use error::LinuxHalError;
pub use gpio::{GpioAllocator, LinuxPin};
pub use spi::LinuxSpi;
