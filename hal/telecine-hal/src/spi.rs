//! SPI bus abstractions
//!
//! The panel is a write-only peripheral, so the bus transport only has to
//! push bytes out. Reads are never issued.

/// SPI bus master (write-only)
///
/// One call to [`SpiBus::write`] is one transfer. Transfers longer than
/// [`SpiBus::max_transfer_len`] may be rejected by the platform driver;
/// callers are expected to split their payload.
pub trait SpiBus {
    /// Error type for SPI operations
    type Error: core::fmt::Debug;

    /// Write data, blocking until the transfer completes
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Largest payload a single [`SpiBus::write`] accepts
    fn max_transfer_len(&self) -> usize {
        usize::MAX
    }
}

impl<T: SpiBus + ?Sized> SpiBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(data)
    }

    fn max_transfer_len(&self) -> usize {
        (**self).max_transfer_len()
    }
}

/// SPI configuration
///
/// Fixed at open time; the ST7789 wants mode 0, MSB first, 8-bit words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
    /// Bit order on the wire
    pub bit_order: BitOrder,
    /// Bits per word
    pub bits_per_word: u8,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 40_000_000, // 40 MHz
            mode: Mode::Mode0,
            bit_order: BitOrder::MsbFirst,
            bits_per_word: 8,
        }
    }
}

impl SpiConfig {
    /// Default configuration at a custom clock rate
    pub fn with_frequency(frequency: u32) -> Self {
        Self {
            frequency,
            ..Self::default()
        }
    }
}

/// Bit order of each word on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// SPI mode (clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}
