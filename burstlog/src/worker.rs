//! Background consumer thread.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use burstlog_sink::Sink;

use crate::queue::{Consumer, MAX_RECORD_BYTES};
use crate::Shared;

/// How long the worker parks before re-checking the ring.
///
/// The timeout bounds worst-case delivery latency when a wake-up is missed —
/// thread-exit batch flushes have no condvar handle and cannot notify. It is
/// a latency bound, not a throughput mechanism.
pub(crate) const PARK_TIMEOUT: Duration = Duration::from_micros(100);

/// Drains the ring into the sink until shutdown, then drains whatever is
/// left before returning. Sink flushes are driven by the logger, not here.
pub(crate) fn run<S: Sink>(shared: Arc<Shared<S>>, mut consumer: Consumer) {
    let mut record = [0u8; MAX_RECORD_BYTES];

    while shared.running.load(Ordering::Acquire) {
        if !drain(&shared, &mut consumer, &mut record) {
            let parked = shared
                .wake_lock
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let _ = shared.wake.wait_timeout(parked, PARK_TIMEOUT);
        }
    }

    // Final drain: everything published before the shutdown signal is still
    // delivered.
    drain(&shared, &mut consumer, &mut record);
}

/// Empties the ring into the sink; returns whether anything was written.
///
/// Dequeueing under the sink lock is what lets `Logger::flush` treat "ring
/// observed empty, then sink lock acquired" as "every prior record written".
fn drain<S: Sink>(
    shared: &Shared<S>,
    consumer: &mut Consumer,
    record: &mut [u8; MAX_RECORD_BYTES],
) -> bool {
    let mut sink = shared.lock_sink();
    let mut wrote = false;
    while let Some(len) = consumer.try_dequeue(record) {
        sink.write(&record[..len]);
        wrote = true;
    }
    wrote
}
