//! Wall-clock time on `std`

use std::thread;
use std::time::{Duration, Instant};

use telecine_hal::Clock;

/// Monotonic clock backed by [`Instant`], sleeping the calling thread
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at zero
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_advances_now() {
        let mut clock = SystemClock::new();
        let before = clock.now();
        clock.delay_ms(5);
        assert!(clock.elapsed_since(before) >= Duration::from_millis(5));
    }
}
