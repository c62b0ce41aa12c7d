//! GPIO lines through the character device
//!
//! Tracks which lines this process has requested so a misconfigured pin
//! map (D/C and RST on the same line) fails at startup instead of fighting
//! over the line at runtime.

use heapless::FnvIndexSet;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;
use telecine_core::config::{GpioPin, MAX_GPIO};
use telecine_hal::{Level, OutputPin};
use tracing::debug;

use crate::error::LinuxHalError;

/// Bookkeeping of requested line offsets
pub struct LineLedger {
    allocated: FnvIndexSet<u8, 64>,
}

impl Default for LineLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LineLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Claim a line
    pub fn claim(&mut self, line: u8) -> Result<(), LinuxHalError> {
        if line >= MAX_GPIO {
            return Err(LinuxHalError::PinOutOfRange(line));
        }
        if self.allocated.contains(&line) {
            return Err(LinuxHalError::PinInUse(line));
        }
        self.allocated
            .insert(line)
            .map_err(|_| LinuxHalError::PinOutOfRange(line))?;
        Ok(())
    }

    /// Release a line
    pub fn release(&mut self, line: u8) {
        self.allocated.remove(&line);
    }

    /// Check if a line is claimed
    pub fn is_allocated(&self, line: u8) -> bool {
        self.allocated.contains(&line)
    }

    /// Number of claimed lines
    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

/// Hands out output lines from one GPIO chip
pub struct GpioAllocator {
    chip: Chip,
    path: String,
    ledger: LineLedger,
}

impl GpioAllocator {
    /// Open a GPIO chip such as `/dev/gpiochip0`
    pub fn open(path: &str) -> Result<Self, LinuxHalError> {
        let chip = Chip::new(path).map_err(|e| LinuxHalError::GpioChip {
            path: path.into(),
            message: e.to_string(),
        })?;
        debug!(path, lines = chip.num_lines(), "GPIO chip opened");

        Ok(Self {
            chip,
            path: path.into(),
            ledger: LineLedger::new(),
        })
    }

    /// Path of the chip lines are requested from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request `pin` as an output driven to `initial`
    ///
    /// `consumer` is the label shown by `gpioinfo`.
    pub fn output(
        &mut self,
        pin: GpioPin,
        initial: Level,
        consumer: &'static str,
    ) -> Result<LinuxPin, LinuxHalError> {
        let line = pin.number();
        self.ledger.claim(line)?;

        match self.request(line, initial, consumer) {
            Ok(pin) => {
                debug!(line, consumer, ?initial, "GPIO line requested");
                Ok(pin)
            }
            Err(e) => {
                self.ledger.release(line);
                Err(e)
            }
        }
    }

    fn request(
        &mut self,
        line: u8,
        initial: Level,
        consumer: &'static str,
    ) -> Result<LinuxPin, LinuxHalError> {
        let to_error = |e: &dyn core::fmt::Display| LinuxHalError::GpioLine {
            line,
            message: e.to_string(),
        };

        let handle = self
            .chip
            .get_line(u32::from(line))
            .map_err(|e| to_error(&e))?
            .request(LineRequestFlags::OUTPUT, u8::from(initial.is_high()), consumer)
            .map_err(|e| to_error(&e))?;
        let pin = CdevPin::new(handle).map_err(|e| to_error(&e))?;

        Ok(LinuxPin { pin, line })
    }
}

/// Output line owned by this process
///
/// The kernel releases the line when the handle is dropped.
pub struct LinuxPin {
    pin: CdevPin,
    line: u8,
}

impl OutputPin for LinuxPin {
    type Error = LinuxHalError;

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        use embedded_hal::digital::OutputPin as _;

        let result = match level {
            Level::High => self.pin.set_high(),
            Level::Low => self.pin.set_low(),
        };
        result.map_err(|e| LinuxHalError::GpioLine {
            line: self.line,
            message: format!("{:?}", e),
        })
    }
}
