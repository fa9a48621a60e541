//! Record rendering.
//!
//! One record becomes `<seconds>.<nanos> <tag> <payload>\n`, written into a
//! thread-local arena that is reset — not freed — between records, so a warm
//! producer thread renders without allocating.

use std::cell::RefCell;
use std::fmt::{self, Write};
use std::sync::OnceLock;

use bumpalo::collections::String as BumpString;
use bumpalo::Bump;
use burstlog_clock::{Clock, MonotonicClock};

use crate::level::Level;
use crate::queue::MAX_RECORD_BYTES;

const NANOS_PER_SEC: u64 = 1_000_000_000;
const SCRATCH_CAPACITY: usize = 512;

static CLOCK: OnceLock<MonotonicClock> = OnceLock::new();

thread_local! {
    static SCRATCH: RefCell<Bump> = RefCell::new(Bump::with_capacity(SCRATCH_CAPACITY));
}

/// Nanoseconds since the process-wide clock anchor.
#[inline]
pub(crate) fn timestamp_nanos() -> u64 {
    CLOCK.get_or_init(MonotonicClock::new).elapsed_nanos()
}

/// Renders one record and hands the byte run — capped at
/// [`MAX_RECORD_BYTES`] — to `f` before the scratch arena is reset. Central
/// capping keeps truncation identical whether the run is headed for a batch
/// slot or straight to a sink.
pub(crate) fn with_rendered<R>(
    level: Level,
    args: fmt::Arguments<'_>,
    f: impl FnOnce(&[u8]) -> R,
) -> R {
    SCRATCH.with(|cell| {
        let mut scratch = cell.borrow_mut();
        let result = {
            let mut buf = BumpString::new_in(&scratch);
            let nanos = timestamp_nanos();
            let _ = write!(
                buf,
                "{}.{} {} ",
                nanos / NANOS_PER_SEC,
                nanos % NANOS_PER_SEC,
                level.tag()
            );
            let _ = buf.write_fmt(args);
            buf.push('\n');
            let bytes = buf.as_bytes();
            f(&bytes[..bytes.len().min(MAX_RECORD_BYTES)])
        };
        scratch.reset();
        result
    })
}
