//! Hardware configuration types
//!
//! These types define the bus and control-line wiring between the host
//! and the panel.

use alloc::string::String;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of GPIO lines on the Raspberry Pi main GPIO chip (BCM numbering)
pub const MAX_GPIO: u8 = 54;

/// Default SPI chunk size, the Linux spidev default `bufsiz`
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 4096;

/// GPIO line number (BCM numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPin(pub u8);

impl GpioPin {
    /// Line number
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gpio{}", self.0)
    }
}

impl core::str::FromStr for GpioPin {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pin_string(s).map(GpioPin)
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio25" -> 25
/// - "GPIO25" -> 25
/// - "25" -> 25
pub fn parse_pin_string(s: &str) -> Result<u8, ConfigError> {
    let s = s.trim();

    let num_str = match s.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("gpio") => &s[4..],
        _ => s,
    };

    if num_str.is_empty() || !num_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::InvalidPin);
    }

    let pin: u16 = num_str.parse().map_err(|_| ConfigError::InvalidPin)?;
    if pin >= u16::from(MAX_GPIO) {
        return Err(ConfigError::PinOutOfRange(pin.min(255) as u8));
    }

    Ok(pin as u8)
}

/// Parse an optional pin; `none` or an empty string leaves the line unused
pub fn parse_optional_pin(s: &str) -> Result<Option<GpioPin>, ConfigError> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    s.parse().map(Some)
}

#[cfg(feature = "serde")]
impl Serialize for GpioPin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for GpioPin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::{self, Visitor};

        struct PinVisitor;

        impl<'de> Visitor<'de> for PinVisitor {
            type Value = GpioPin;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a GPIO number or a string like \"gpio25\"")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<GpioPin, E> {
                let pin = u8::try_from(v).map_err(|_| E::custom(ConfigError::InvalidPin))?;
                if pin >= MAX_GPIO {
                    return Err(E::custom(ConfigError::PinOutOfRange(pin)));
                }
                Ok(GpioPin(pin))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<GpioPin, E> {
                let v = i64::try_from(v).map_err(|_| E::custom(ConfigError::InvalidPin))?;
                self.visit_i64(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<GpioPin, E> {
                parse_pin_string(v).map(GpioPin).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PinVisitor)
    }
}

/// Optional pin field: a pin, `"none"` or `false`
#[cfg(feature = "serde")]
mod optional_pin {
    use core::fmt;

    use serde::de::{self, Visitor};
    use serde::Deserializer;

    use super::{parse_optional_pin, GpioPin, MAX_GPIO};
    use crate::error::ConfigError;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<GpioPin>, D::Error> {
        struct OptionalPinVisitor;

        impl<'de> Visitor<'de> for OptionalPinVisitor {
            type Value = Option<GpioPin>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a GPIO number, a string like \"gpio24\", \"none\" or false")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                if v {
                    return Err(E::invalid_value(de::Unexpected::Bool(v), &self));
                }
                Ok(None)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                let pin = u8::try_from(v).map_err(|_| E::custom(ConfigError::InvalidPin))?;
                if pin >= MAX_GPIO {
                    return Err(E::custom(ConfigError::PinOutOfRange(pin)));
                }
                Ok(Some(GpioPin(pin)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let v = i64::try_from(v).map_err(|_| E::custom(ConfigError::InvalidPin))?;
                self.visit_i64(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                parse_optional_pin(v).map_err(E::custom)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                d.deserialize_any(self)
            }
        }

        deserializer.deserialize_any(OptionalPinVisitor)
    }
}

/// SPI bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BusConfig {
    /// SPI bus number (`/dev/spidev<bus>.<device>`)
    pub bus: u8,
    /// Chip select on that bus
    pub device: u8,
    /// Clock frequency in Hz
    pub clock_hz: u32,
    /// Largest single write; capped again by the driver's own limit
    pub max_chunk_bytes: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            device: 0,
            clock_hz: 40_000_000,
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
        }
    }
}

/// Control-line wiring
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PinsConfig {
    /// GPIO character device
    pub chip: String,
    /// Reset line
    pub reset: GpioPin,
    /// Data/Command select line
    pub data_command: GpioPin,
    /// Backlight enable line (optional)
    #[cfg_attr(feature = "serde", serde(deserialize_with = "optional_pin::deserialize"))]
    pub backlight: Option<GpioPin>,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            chip: String::from("/dev/gpiochip0"),
            reset: GpioPin(27),
            data_command: GpioPin(25),
            backlight: Some(GpioPin(24)),
        }
    }
}

impl PinsConfig {
    /// Check pin ranges and that no line is assigned twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = [Some(self.reset), Some(self.data_command), self.backlight];

        for (i, pin) in pins.iter().enumerate() {
            let Some(pin) = pin else { continue };
            if pin.0 >= MAX_GPIO {
                return Err(ConfigError::PinOutOfRange(pin.0));
            }
            if pins[i + 1..].iter().flatten().any(|other| other == pin) {
                return Err(ConfigError::DuplicatePin(pin.0));
            }
        }

        Ok(())
    }
}
