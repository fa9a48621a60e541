//! Bounded multi-producer single-consumer ring buffer.
//!
//! Producers race a compare-and-swap on `tail` for distinct slot indices and
//! publish by storing the slot's length trailer; the single consumer walks
//! `head` forward. Both counters only ever increase, so `tail - head` is the
//! fill level and wraparound falls out of the power-of-two index mask.
//!
//! The trailer doubles as a slot-local ready flag: reservation order and
//! publication order can differ when a producer is preempted mid-copy, and
//! the consumer must not read a slot whose bytes are still being written.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_utils::CachePadded;

use crate::utils::{likely, unlikely};
use crate::Error;

/// Size in bytes of one ring slot, including the two-byte length trailer.
pub const SLOT_BYTES: usize = 256;
/// Largest record payload a slot can carry.
pub const MAX_RECORD_BYTES: usize = SLOT_BYTES - 2;
/// Slot count used when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 65_536;

/// Largest slot count accepted after power-of-two rounding.
const MAX_CAPACITY: usize = 1 << 32;

const BACKOFF_YIELD_ROUNDS: u32 = 4;
const BACKOFF_SLEEP: Duration = Duration::from_nanos(100);

/// How many trailer polls between thread yields while waiting out a
/// reserved-but-unpublished slot.
const SPINS_PER_YIELD: u32 = 1024;

/// One slot: a fixed payload area plus a length trailer.
///
/// A nonzero trailer marks the slot published and unconsumed; the consumer
/// zeroes it before releasing the slot for reuse.
#[repr(align(64))]
struct Slot {
    payload: UnsafeCell<[u8; MAX_RECORD_BYTES]>,
    trailer: AtomicU16,
}

impl Slot {
    fn vacant() -> Slot {
        Slot {
            payload: UnsafeCell::new([0; MAX_RECORD_BYTES]),
            trailer: AtomicU16::new(0),
        }
    }
}

/// The shared ring. Producers call [`try_enqueue`](RingBuffer::try_enqueue)
/// through a shared [`Arc`]; the receiving side lives in the unique
/// [`Consumer`] handle returned by [`with_capacity`](RingBuffer::with_capacity).
pub struct RingBuffer {
    slots: Box<[Slot]>,
    mask: u64,
    capacity: usize,
    /// Next index to consume. Written only by the consumer.
    head: CachePadded<AtomicU64>,
    /// Next index to reserve. Written only by producers.
    tail: CachePadded<AtomicU64>,
    rejections: AtomicU64,
    cas_retries: AtomicU64,
}

// SAFETY: `try_enqueue`'s CAS on `tail` hands each producer a distinct slot
// index, and the fullness check proves the slot's previous occupant was
// consumed before the index was handed out. Dequeueing is confined to the
// single non-Clone `Consumer` handle. The trailer's release/acquire pair
// orders every payload access.
unsafe impl Send for RingBuffer {}
unsafe impl Sync for RingBuffer {}

impl RingBuffer {
    /// Creates a ring with at least `capacity` slots, rounded up to a power
    /// of two, and returns the shared producer side plus the unique consumer
    /// handle. The slot array is cache-line aligned by construction.
    pub fn with_capacity(capacity: usize) -> Result<(Arc<RingBuffer>, Consumer), Error> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        let capacity = capacity.next_power_of_two();
        if capacity > MAX_CAPACITY {
            return Err(Error::CapacityTooLarge(capacity));
        }

        let slots: Vec<Slot> = (0..capacity).map(|_| Slot::vacant()).collect();
        let ring = Arc::new(RingBuffer {
            slots: slots.into_boxed_slice(),
            mask: capacity as u64 - 1,
            capacity,
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
            rejections: AtomicU64::new(0),
            cas_retries: AtomicU64::new(0),
        });
        let consumer = Consumer {
            ring: Arc::clone(&ring),
        };
        Ok((ring, consumer))
    }

    /// Copies `record` into the next free slot. Returns `false` iff the ring
    /// is full. Never blocks; safe to call from any number of threads.
    ///
    /// # Panics
    ///
    /// Panics if `record` is empty or longer than [`MAX_RECORD_BYTES`]: an
    /// empty record would be indistinguishable from a vacant slot.
    pub fn try_enqueue(&self, record: &[u8]) -> bool {
        assert!(
            !record.is_empty() && record.len() <= MAX_RECORD_BYTES,
            "record length {} outside 1..={}",
            record.len(),
            MAX_RECORD_BYTES
        );

        let mut tail = self.tail.load(Ordering::Acquire);
        loop {
            // Re-read `head` on every attempt so a CAS loser sees any
            // capacity the consumer freed in the meantime.
            let head = self.head.load(Ordering::Acquire);
            if unlikely(tail.wrapping_sub(head) >= self.capacity as u64) {
                self.rejections.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.tail.compare_exchange_weak(
                tail,
                tail.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => {
                    self.cas_retries.fetch_add(1, Ordering::Relaxed);
                    tail = observed;
                    std::hint::spin_loop();
                }
            }
        }

        let slot = &self.slots[(tail & self.mask) as usize];
        // SAFETY: the CAS made index `tail` ours alone; no other producer
        // holds it and the consumer will not touch it until the trailer is
        // nonzero.
        unsafe {
            (&mut *slot.payload.get())[..record.len()].copy_from_slice(record);
        }
        // Publication point: the consumer treats a nonzero trailer as "slot
        // complete".
        slot.trailer.store(record.len() as u16, Ordering::Release);
        true
    }

    /// Records currently held. Momentarily imprecise under contention,
    /// exact at quiescence.
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (tail.saturating_sub(head) as usize).min(self.capacity)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of enqueue attempts that found the ring full.
    pub fn rejections(&self) -> u64 {
        self.rejections.load(Ordering::Relaxed)
    }

    /// Number of reservation CAS retries (contention metric).
    pub fn cas_retries(&self) -> u64 {
        self.cas_retries.load(Ordering::Relaxed)
    }
}

/// Receiving side of a ring.
///
/// There is exactly one per ring and it is not `Clone`, so slot reads never
/// race: holding `&mut Consumer` is holding the consumer role.
pub struct Consumer {
    ring: Arc<RingBuffer>,
}

impl Consumer {
    /// Copies the oldest published record into `out` and returns its length,
    /// or `None` if the ring is empty.
    ///
    /// If the oldest reserved slot is not yet published, waits for the
    /// publishing store: a producer that holds a reservation is one trailer
    /// write away from completing it.
    pub fn try_dequeue(&mut self, out: &mut [u8; MAX_RECORD_BYTES]) -> Option<usize> {
        let ring = &*self.ring;
        let head = ring.head.load(Ordering::Relaxed);
        if head == ring.tail.load(Ordering::Acquire) {
            return None;
        }

        let slot = &ring.slots[(head & ring.mask) as usize];
        let mut spins: u32 = 0;
        let len = loop {
            let len = slot.trailer.load(Ordering::Acquire);
            if likely(len != 0) {
                break len as usize;
            }
            spins = spins.wrapping_add(1);
            if spins % SPINS_PER_YIELD == 0 {
                thread::yield_now();
            } else {
                std::hint::spin_loop();
            }
        };

        // SAFETY: the nonzero trailer (acquire) orders this read after the
        // producer's payload writes, and only this handle advances `head`.
        unsafe {
            out[..len].copy_from_slice(&(&*slot.payload.get())[..len]);
        }
        slot.trailer.store(0, Ordering::Release);
        ring.head.store(head.wrapping_add(1), Ordering::Release);
        Some(len)
    }

    /// The ring this consumer drains.
    pub fn ring(&self) -> &Arc<RingBuffer> {
        &self.ring
    }
}

/// Enqueues `record`, waiting out full-ring pressure: `2^k` CPU yields for
/// the first [`BACKOFF_YIELD_ROUNDS`] rounds, then short fixed sleeps.
/// Returns once the record is accepted; backoff never drops records.
pub(crate) fn enqueue_with_backoff(ring: &RingBuffer, record: &[u8]) {
    let mut round = 0;
    while !ring.try_enqueue(record) {
        if round < BACKOFF_YIELD_ROUNDS {
            for _ in 0..(1u32 << round) {
                thread::yield_now();
            }
            round += 1;
        } else {
            thread::sleep(BACKOFF_SLEEP);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn dequeue_string(consumer: &mut Consumer) -> Option<String> {
        let mut out = [0u8; MAX_RECORD_BYTES];
        consumer
            .try_dequeue(&mut out)
            .map(|len| String::from_utf8(out[..len].to_vec()).unwrap())
    }

    #[test]
    fn slot_layout() {
        assert_eq!(std::mem::size_of::<Slot>(), SLOT_BYTES);
        assert_eq!(std::mem::align_of::<Slot>(), 64);
    }

    #[test]
    fn fifo_single_thread() {
        let (ring, mut consumer) = RingBuffer::with_capacity(8).unwrap();

        assert!(ring.try_enqueue(b"first"));
        assert!(ring.try_enqueue(b"second"));
        assert_eq!(ring.len(), 2);

        assert_eq!(dequeue_string(&mut consumer).as_deref(), Some("first"));
        assert_eq!(dequeue_string(&mut consumer).as_deref(), Some("second"));
        assert!(dequeue_string(&mut consumer).is_none());
        assert!(ring.is_empty());
    }

    #[test]
    fn rejects_when_full_and_counts() {
        let (ring, mut consumer) = RingBuffer::with_capacity(4).unwrap();

        for i in 0..4 {
            assert!(ring.try_enqueue(format!("msg{}", i).as_bytes()));
        }
        assert!(ring.is_full());
        assert!(!ring.try_enqueue(b"overflow"));
        assert_eq!(ring.rejections(), 1);

        // Draining one slot makes room again.
        assert_eq!(dequeue_string(&mut consumer).as_deref(), Some("msg0"));
        assert!(ring.try_enqueue(b"refill"));
    }

    #[test]
    fn wraparound_reuses_slots() {
        let (ring, mut consumer) = RingBuffer::with_capacity(4).unwrap();

        for lap in 0..3 {
            for i in 0..4 {
                assert!(ring.try_enqueue(format!("lap{} msg{}", lap, i).as_bytes()));
            }
            for i in 0..4 {
                assert_eq!(
                    dequeue_string(&mut consumer),
                    Some(format!("lap{} msg{}", lap, i))
                );
            }
        }
    }

    #[test]
    fn trailers_zero_at_quiescence() {
        let (ring, mut consumer) = RingBuffer::with_capacity(4).unwrap();

        for _ in 0..4 {
            assert!(ring.try_enqueue(b"transient"));
        }
        while dequeue_string(&mut consumer).is_some() {}

        for slot in ring.slots.iter() {
            assert_eq!(slot.trailer.load(Ordering::Acquire), 0);
        }
    }

    #[test]
    fn fill_level_never_exceeds_capacity() {
        let (ring, mut consumer) = RingBuffer::with_capacity(4).unwrap();

        for i in 0..32 {
            let _ = ring.try_enqueue(format!("m{}", i).as_bytes());
            assert!(ring.len() <= ring.capacity());
            if i % 3 == 0 {
                let _ = dequeue_string(&mut consumer);
            }
        }
    }

    #[test]
    fn capacity_is_rounded_up() {
        let (ring, _consumer) = RingBuffer::with_capacity(10).unwrap();
        assert_eq!(ring.capacity(), 16);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            RingBuffer::with_capacity(0),
            Err(Error::ZeroCapacity)
        ));
    }

    #[test]
    #[should_panic]
    fn empty_records_are_rejected() {
        let (ring, _consumer) = RingBuffer::with_capacity(4).unwrap();
        ring.try_enqueue(b"");
    }

    #[test]
    fn concurrent_producers_lose_nothing() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 250;

        let (ring, mut consumer) = RingBuffer::with_capacity(64).unwrap();

        thread::scope(|scope| {
            for t in 0..PRODUCERS {
                let ring = &ring;
                scope.spawn(move || {
                    for i in 0..PER_PRODUCER {
                        enqueue_with_backoff(ring, format!("t{} m{}", t, i).as_bytes());
                    }
                });
            }

            let mut seen = HashSet::new();
            while seen.len() < PRODUCERS * PER_PRODUCER {
                if let Some(record) = dequeue_string(&mut consumer) {
                    assert!(seen.insert(record), "duplicate delivery");
                } else {
                    std::hint::spin_loop();
                }
            }
        });

        assert!(ring.is_empty());
    }
}
