//! GPIO pin abstractions
//!
//! The panel is steered by two output lines: Data/Command select and
//! Reset. An optional third line switches the backlight.

/// Logic level of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Check if this is the high level
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Digital output pin
///
/// Implementations drive the physical line. Setting a level is the only
/// operation the driver needs; there is no read-back.
pub trait OutputPin {
    /// Error type for line operations
    type Error: core::fmt::Debug;

    /// Drive the line to `level`
    fn set_level(&mut self, level: Level) -> Result<(), Self::Error>;

    /// Drive the line high (logic 1)
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_level(Level::High)
    }

    /// Drive the line low (logic 0)
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_level(Level::Low)
    }
}

impl<T: OutputPin + ?Sized> OutputPin for &mut T {
    type Error = T::Error;

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        (**self).set_level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        level: Level,
    }

    impl OutputPin for MockPin {
        type Error = ();

        fn set_level(&mut self, level: Level) -> Result<(), ()> {
            self.level = level;
            Ok(())
        }
    }

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(Level::High.is_high());
        assert!(!Level::Low.is_high());
    }

    #[test]
    fn test_default_methods() {
        let mut pin = MockPin { level: Level::Low };
        pin.set_high().unwrap();
        assert_eq!(pin.level, Level::High);
        pin.set_low().unwrap();
        assert_eq!(pin.level, Level::Low);
    }

    #[test]
    fn test_mut_ref_forwarding() {
        fn raise<P: OutputPin>(mut pin: P) {
            pin.set_high().unwrap();
        }

        let mut pin = MockPin { level: Level::Low };
        raise(&mut pin);
        assert_eq!(pin.level, Level::High);
    }
}
