//! Time abstractions
//!
//! Settle delays during panel initialization and frame pacing both block
//! the (single) playback thread, so a clock is a sleep plus a monotonic
//! reading.

use core::time::Duration;

/// Monotonic clock with blocking sleep
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin
    fn now(&self) -> Duration;

    /// Block the caller for at least `duration`
    fn sleep(&mut self, duration: Duration);

    /// Block the caller for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) {
        self.sleep(Duration::from_millis(u64::from(ms)));
    }

    /// Time elapsed since an earlier [`Clock::now`] reading
    fn elapsed_since(&self, earlier: Duration) -> Duration {
        self.now().saturating_sub(earlier)
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}
