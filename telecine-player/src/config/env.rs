//! Environment overrides
//!
//! Container deployments configure the player through these variables
//! rather than a mounted file.

use std::str::FromStr;

use telecine_core::config::{parse_optional_pin, GpioPin, Orientation, PlayerConfig};
use tracing::debug;

use super::loader::LoadError;

/// Variables read by [`apply_env`]
pub const VARIABLES: [&str; 10] = [
    "DISPLAY_WIDTH",
    "DISPLAY_HEIGHT",
    "SPI_BUS",
    "SPI_DEVICE",
    "RST_PIN",
    "DC_PIN",
    "BL_PIN",
    "ORIENTATION",
    "VIDEO_SOURCE",
    "VIDEO_SERVER_URL",
];

fn parse<T>(var: &'static str, value: &str) -> Result<T, LoadError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|e: T::Err| LoadError::Env {
        var,
        value: value.into(),
        reason: e.to_string(),
    })
}

/// Overlay environment variables onto `config`
///
/// `lookup` is normally `|k| std::env::var(k).ok()`. Unset variables leave
/// the field alone.
pub fn apply_env<F>(config: &mut PlayerConfig, lookup: F) -> Result<(), LoadError>
where
    F: Fn(&str) -> Option<String>,
{
    for var in VARIABLES {
        let Some(value) = lookup(var) else { continue };
        debug!(var, value = %value, "environment override");

        match var {
            "DISPLAY_WIDTH" => config.panel.width = parse(var, &value)?,
            "DISPLAY_HEIGHT" => config.panel.height = parse(var, &value)?,
            "SPI_BUS" => config.bus.bus = parse(var, &value)?,
            "SPI_DEVICE" => config.bus.device = parse(var, &value)?,
            "RST_PIN" => config.pins.reset = parse::<GpioPin>(var, &value)?,
            "DC_PIN" => config.pins.data_command = parse::<GpioPin>(var, &value)?,
            "BL_PIN" => {
                config.pins.backlight = parse_optional_pin(&value).map_err(|e| LoadError::Env {
                    var,
                    value: value.clone(),
                    reason: e.to_string(),
                })?
            }
            "ORIENTATION" => {
                let index: u8 = parse(var, &value)?;
                config.panel.orientation =
                    Orientation::from_index(index).map_err(|e| LoadError::Env {
                        var,
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
            }
            "VIDEO_SOURCE" => config.source.locator = Some(value),
            "VIDEO_SERVER_URL" => config.source.server_url = Some(value),
            _ => {}
        }
    }

    Ok(())
}
