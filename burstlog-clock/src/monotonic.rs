use quanta::Clock as QuantaClock;

use crate::Clock;

/// Nanosecond clock anchored at construction.
pub struct MonotonicClock {
    clock: QuantaClock,
    anchor: u64,
}

impl MonotonicClock {
    pub fn new() -> MonotonicClock {
        // The first `quanta::Clock` calibrates TSC scaling, which can take a
        // moment; callers should construct one clock and keep it.
        let clock = QuantaClock::new();
        let anchor = clock.raw();
        MonotonicClock { clock, anchor }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn elapsed_nanos(&self) -> u64 {
        self.clock.delta_as_nanos(self.anchor, self.clock.raw())
    }
}
