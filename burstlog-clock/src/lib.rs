//! Monotonic time source for `burstlog`.
//!
//! Every rendered record starts with a `seconds.nanos` timestamp taken on
//! the producer thread, so reading the clock sits squarely on the logging
//! hot path. [`MonotonicClock`] reads the TSC through `quanta` and reports
//! nanoseconds elapsed since an anchor taken at construction; the epoch is
//! arbitrary but fixed for the lifetime of the clock.
//!
//! ```rust
//! use burstlog_clock::{Clock, MonotonicClock};
//!
//! let clock = MonotonicClock::new();
//! let earlier = clock.elapsed_nanos();
//! let later = clock.elapsed_nanos();
//! assert!(later >= earlier);
//! ```

pub mod monotonic;

pub use monotonic::MonotonicClock;

/// A source of monotone non-decreasing nanosecond timestamps.
pub trait Clock {
    /// Nanoseconds elapsed since the clock's (arbitrary) epoch.
    fn elapsed_nanos(&self) -> u64;
}
