//! SPI through the Linux spidev driver
//!
//! spidev rejects single transfers larger than its `bufsiz` module
//! parameter (4096 bytes unless raised on the kernel command line with
//! `spidev.bufsiz=N`). The limit is read once at open and reported through
//! [`SpiBus::max_transfer_len`] so the chunked transfer stays below it.

use std::fs;
use std::path::Path;

use embedded_hal::spi::SpiDevice;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::SpidevDevice;
use telecine_hal::spi::{BitOrder, Mode};
use telecine_hal::{SpiBus, SpiConfig};
use tracing::{debug, info};

use crate::error::LinuxHalError;

/// spidev `bufsiz` module parameter
pub const BUFSIZ_PATH: &str = "/sys/module/spidev/parameters/bufsiz";

/// spidev default `bufsiz`
pub const DEFAULT_BUFSIZ: usize = 4096;

/// Device node for a bus and chip select
pub fn device_path(bus: u8, device: u8) -> String {
    format!("/dev/spidev{}.{}", bus, device)
}

/// Read the spidev transfer limit from sysfs
pub fn read_bufsiz(path: &Path) -> Option<usize> {
    fs::read_to_string(path)
        .ok()?
        .trim()
        .parse()
        .ok()
        .filter(|len| *len > 0)
}

fn mode_flags(config: &SpiConfig) -> SpiModeFlags {
    let mut flags = match config.mode {
        Mode::Mode0 => SpiModeFlags::SPI_MODE_0,
        Mode::Mode1 => SpiModeFlags::SPI_MODE_1,
        Mode::Mode2 => SpiModeFlags::SPI_MODE_2,
        Mode::Mode3 => SpiModeFlags::SPI_MODE_3,
    };
    if config.bit_order == BitOrder::LsbFirst {
        flags |= SpiModeFlags::SPI_LSB_FIRST;
    }
    flags
}

/// Write-only SPI master on a spidev node
pub struct LinuxSpi {
    device: SpidevDevice,
    path: String,
    max_transfer: usize,
}

impl LinuxSpi {
    /// Open and configure `/dev/spidev<bus>.<device>`
    pub fn open(bus: u8, device: u8, config: &SpiConfig) -> Result<Self, LinuxHalError> {
        let path = device_path(bus, device);
        let mut spi = SpidevDevice::open(&path).map_err(|source| LinuxHalError::SpiOpen {
            path: path.clone(),
            source,
        })?;

        let options = SpidevOptions::new()
            .bits_per_word(config.bits_per_word)
            .max_speed_hz(config.frequency)
            .mode(mode_flags(config))
            .build();
        spi.configure(&options).map_err(LinuxHalError::SpiConfigure)?;

        let max_transfer = read_bufsiz(Path::new(BUFSIZ_PATH)).unwrap_or_else(|| {
            debug!(path = BUFSIZ_PATH, "spidev bufsiz unreadable, assuming default");
            DEFAULT_BUFSIZ
        });

        info!(
            path = %path,
            hz = config.frequency,
            mode = ?config.mode,
            max_transfer,
            "SPI opened"
        );

        Ok(Self {
            device: spi,
            path,
            max_transfer,
        })
    }

    /// Device node this bus writes to
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SpiBus for LinuxSpi {
    type Error = LinuxHalError;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        SpiDevice::write(&mut self.device, data).map_err(|e| LinuxHalError::SpiWrite(format!("{:?}", e)))
    }

    fn max_transfer_len(&self) -> usize {
        self.max_transfer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_device_path() {
        assert_eq!(device_path(0, 0), "/dev/spidev0.0");
        assert_eq!(device_path(1, 2), "/dev/spidev1.2");
    }

    #[test]
    fn test_read_bufsiz() {
        let path = std::env::temp_dir().join(format!("telecine-bufsiz-{}", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "65536").unwrap();
        drop(file);

        assert_eq!(read_bufsiz(&path), Some(65536));

        fs::write(&path, "garbage\n").unwrap();
        assert_eq!(read_bufsiz(&path), None);

        fs::write(&path, "0\n").unwrap();
        assert_eq!(read_bufsiz(&path), None);

        fs::remove_file(&path).unwrap();
        assert_eq!(read_bufsiz(&path), None);
    }

    #[test]
    fn test_open_missing_device() {
        let err = match LinuxSpi::open(250, 250, &SpiConfig::default()) {
            Ok(_) => panic!("/dev/spidev250.250 should not exist"),
            Err(e) => e,
        };

        assert!(matches!(&err, LinuxHalError::SpiOpen { path, .. } if path == "/dev/spidev250.250"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/dev/spidev250.250"));
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(mode_flags(&SpiConfig::default()), SpiModeFlags::SPI_MODE_0);

        let config = SpiConfig {
            mode: Mode::Mode3,
            bit_order: BitOrder::LsbFirst,
            ..SpiConfig::default()
        };
        assert_eq!(
            mode_flags(&config),
            SpiModeFlags::SPI_MODE_3 | SpiModeFlags::SPI_LSB_FIRST
        );
    }
}
