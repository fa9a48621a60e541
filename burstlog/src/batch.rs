//! Thread-local staging of rendered records.
//!
//! Uncoordinated single-record enqueues all fight over the ring's `tail`;
//! batching lets each producer thread accumulate up to [`BATCH_RECORDS`]
//! records locally and publish them back-to-back, so the reservation traffic
//! arrives in bursts with much better cache behavior.
//!
//! A batch is bound to one ring. The same thread logging through a logger
//! with a different ring rebinds, flushing the old batch first, and a thread
//! that exits with staged records publishes them from the batch's `Drop`.

use std::cell::RefCell;
use std::sync::Arc;

use crate::queue::{enqueue_with_backoff, RingBuffer, MAX_RECORD_BYTES, SLOT_BYTES};

/// Records staged per thread before a bulk publish.
pub(crate) const BATCH_RECORDS: usize = 32;

pub(crate) struct Batch {
    ring: Arc<RingBuffer>,
    slots: Box<[u8]>,
    count: usize,
}

impl Batch {
    fn new(ring: Arc<RingBuffer>) -> Batch {
        Batch {
            ring,
            slots: vec![0u8; BATCH_RECORDS * SLOT_BYTES].into_boxed_slice(),
            count: 0,
        }
    }

    /// Stages one record, truncating it to [`MAX_RECORD_BYTES`] and noting
    /// the truncated length in the slot's trailing two bytes. Returns `false`
    /// iff the batch is already full. Never blocks.
    pub(crate) fn try_add(&mut self, record: &[u8]) -> bool {
        if self.count == BATCH_RECORDS {
            return false;
        }
        let len = record.len().min(MAX_RECORD_BYTES);
        let slot = &mut self.slots[self.count * SLOT_BYTES..(self.count + 1) * SLOT_BYTES];
        slot[..len].copy_from_slice(&record[..len]);
        slot[MAX_RECORD_BYTES..].copy_from_slice(&(len as u16).to_le_bytes());
        self.count += 1;
        true
    }

    /// Publishes every staged record to the ring in index order, waiting out
    /// full-ring pressure, then resets the batch.
    pub(crate) fn flush(&mut self) {
        for i in 0..self.count {
            let slot = &self.slots[i * SLOT_BYTES..(i + 1) * SLOT_BYTES];
            let len =
                u16::from_le_bytes([slot[MAX_RECORD_BYTES], slot[MAX_RECORD_BYTES + 1]]) as usize;
            enqueue_with_backoff(&self.ring, &slot[..len]);
        }
        self.count = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Drop for Batch {
    // A thread that exits with staged records publishes them on the way out;
    // with no condvar handle here, the worker notices via its park timeout.
    fn drop(&mut self) {
        if self.count > 0 {
            self.flush();
        }
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<Batch>> = const { RefCell::new(None) };
}

/// Runs `f` on the calling thread's batch for `ring`, creating or rebinding
/// the batch first. Rebinding flushes staged records into their own ring.
pub(crate) fn with_batch<R>(ring: &Arc<RingBuffer>, f: impl FnOnce(&mut Batch) -> R) -> R {
    ACTIVE.with(|cell| {
        let mut active = cell.borrow_mut();
        let bound = matches!(active.as_ref(), Some(batch) if Arc::ptr_eq(&batch.ring, ring));
        if !bound {
            // Replacing drops the previous batch, which flushes it.
            *active = Some(Batch::new(Arc::clone(ring)));
        }
        f(active.as_mut().expect("batch just installed"))
    })
}

/// Publishes any records the calling thread has staged for `ring`. Batches
/// bound to other rings are left alone.
pub(crate) fn flush_current_thread(ring: &Arc<RingBuffer>) {
    ACTIVE.with(|cell| {
        if let Ok(mut active) = cell.try_borrow_mut() {
            if let Some(batch) = active.as_mut() {
                if Arc::ptr_eq(&batch.ring, ring) && !batch.is_empty() {
                    batch.flush();
                }
            }
        }
    })
}
