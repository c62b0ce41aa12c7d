//! TOML configuration file

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use telecine_core::config::PlayerConfig;
use telecine_core::ConfigError;
use thiserror::Error;
use tracing::{debug, info};

/// Where the player looks when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/telecine/telecine.toml";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment variable {var}={value:?}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Invalid(ConfigError),
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

/// Parse a configuration document
pub fn parse_config(text: &str) -> Result<PlayerConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Load the configuration file
///
/// A missing file is only an error when it was asked for explicitly;
/// otherwise the built-in defaults apply.
pub fn load_file(path: &Path, explicit: bool) -> Result<PlayerConfig, LoadError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(PlayerConfig::default());
        }
        Err(source) => {
            return Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = parse_config(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "config file loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use telecine_core::config::{GpioPin, Orientation};

    const SHIPPED: &str = include_str!("../../telecine.toml");

    #[test]
    fn test_shipped_config_parses() {
        let config = parse_config(SHIPPED).unwrap();
        assert_eq!(config.panel.width, 320);
        assert_eq!(config.panel.height, 240);
        assert_eq!(config.panel.orientation, Orientation::Landscape90);
        assert_eq!(config.pins.data_command, GpioPin(25));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), PlayerConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = parse_config(
            r#"
            [panel]
            width = 240
            height = 240
            orientation = 0

            [pins]
            reset = "gpio17"
            backlight = "none"

            [source]
            locator = "/srv/loop.mp4"
            "#,
        )
        .unwrap();

        assert_eq!(config.panel.width, 240);
        assert_eq!(config.panel.orientation, Orientation::Portrait0);
        assert!(config.panel.color_inversion);
        assert_eq!(config.pins.reset, GpioPin(17));
        assert_eq!(config.pins.data_command, GpioPin(25));
        assert_eq!(config.pins.backlight, None);
        assert_eq!(config.bus.max_chunk_bytes, 4096);
        assert_eq!(config.source.locator.as_deref(), Some("/srv/loop.mp4"));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(parse_config("[panel]\norientation = 4\n").is_err());
        assert!(parse_config("[pins]\nreset = \"gpio99\"\n").is_err());
        assert!(parse_config("[pins]\nbacklight = true\n").is_err());
        assert!(parse_config("[panel]\ndepth = 16\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/telecine.toml");
        assert_eq!(load_file(path, false).unwrap(), PlayerConfig::default());
        assert!(matches!(load_file(path, true), Err(LoadError::Read { .. })));
    }
}
