//! A low-latency multi-producer single-consumer asynchronous logger.
//!
//! # Overview
//!
//! `burstlog` keeps the cost of logging off the hot path by splitting every
//! record's life in two. The producer side — any number of threads — renders
//! the record eagerly into a thread-local scratch arena, stages it in a
//! per-thread batch of 32 slots, and publishes full batches to a bounded
//! lock-free ring in one burst. The consumer side is a single background
//! worker that drains the ring and writes each record to a [`Sink`]. A
//! logging call never takes a lock and never allocates once its thread is
//! warm.
//!
//! ## Record format
//!
//! One record per line on the sink:
//!
//! ```text
//! <seconds>.<nanos> <level-tag> <payload>\n
//! ```
//!
//! Timestamps come from a monotonic clock with an arbitrary epoch; the level
//! tag is one of `T D I W E C`. Records longer than 254 bytes are truncated,
//! not split.
//!
//! # Usage
//!
//! ```
//! use burstlog::{info, Logger, StdoutSink};
//!
//! let logger = Logger::new(StdoutSink::new()).unwrap();
//! info!(logger, "hello {}", "world");
//! logger.flush();
//! ```
//!
//! Synchronous mode skips the worker and the ring entirely and writes on the
//! calling thread, which is handy in tests and short-lived tools:
//!
//! ```
//! use burstlog::{warn, config, LevelFilter, Logger, NullSink};
//!
//! let logger = Logger::with_config(
//!     NullSink,
//!     config().synchronous(true).filter(LevelFilter::Warn),
//! )
//! .unwrap();
//! warn!(logger, "disk {}% full", 93);
//! ```
//!
//! # Ordering and delivery
//!
//! Records from one thread reach the sink in the order they were logged.
//! Across threads only the ring's reservation order holds, which need not
//! match wall-clock order — the embedded timestamps carry that. Dropping the
//! logger signals the worker, waits for it to drain the ring, and flushes
//! the sink; quiesce producer threads first, since records still in flight
//! after the final drain begins are not delivered.

/// Contains logging levels and filters.
pub mod level;
/// Leveled logging macros over a [`Logger`] handle.
pub mod macros;
/// The bounded MPSC ring buffer underneath every asynchronous logger.
pub mod queue;

mod batch;
mod format;
mod utils;
mod worker;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use thiserror::Error;

pub use burstlog_clock::{Clock, MonotonicClock};
pub use burstlog_sink::fanout_sink::FanoutSink;
pub use burstlog_sink::file_sink::FileSink;
pub use burstlog_sink::null_sink::NullSink;
pub use burstlog_sink::stderr_sink::StderrSink;
pub use burstlog_sink::stdout_sink::StdoutSink;
pub use burstlog_sink::Sink;
pub use level::{Level, LevelFilter};

use crate::utils::likely;
use queue::{RingBuffer, DEFAULT_CAPACITY};

/// Construction failures. Logging itself has no visible failure mode: a full
/// ring is waited out and oversized records are truncated.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ring capacity must be non-zero")]
    ZeroCapacity,
    #[error("ring capacity {0} exceeds the supported maximum")]
    CapacityTooLarge(usize),
    #[error("failed to spawn the worker thread")]
    Spawn(#[source] std::io::Error),
}

/// Returns a [`Config`] with the defaults: asynchronous mode, a 65 536-slot
/// ring, and a `Trace` filter.
pub fn config() -> Config {
    Config::default()
}

/// Logger construction options.
#[derive(Debug, Clone)]
pub struct Config {
    capacity: usize,
    synchronous: bool,
    filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            capacity: DEFAULT_CAPACITY,
            synchronous: false,
            filter: LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Number of ring slots; rounded up to a power of two.
    pub fn capacity(mut self, capacity: usize) -> Config {
        self.capacity = capacity;
        self
    }

    /// Synchronous mode writes records to the sink on the calling thread
    /// instead of spawning the worker.
    pub fn synchronous(mut self, synchronous: bool) -> Config {
        self.synchronous = synchronous;
        self
    }

    /// Records below `filter` are discarded before any formatting work.
    pub fn filter(mut self, filter: LevelFilter) -> Config {
        self.filter = filter;
        self
    }
}

/// State shared between the logger handle and the worker thread.
pub(crate) struct Shared<S> {
    pub(crate) ring: Option<Arc<RingBuffer>>,
    pub(crate) sink: Mutex<S>,
    pub(crate) running: AtomicBool,
    /// Paired with `wake` for worker parking only; never held while touching
    /// the ring.
    pub(crate) wake_lock: Mutex<()>,
    pub(crate) wake: Condvar,
}

impl<S> Shared<S> {
    /// Locks the sink, recovering it if a previous writer panicked.
    pub(crate) fn lock_sink(&self) -> MutexGuard<'_, S> {
        self.sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn notify_worker(&self) {
        let _guard = self
            .wake_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.wake.notify_one();
    }
}

/// A leveled logger writing to a sink of type `S`.
///
/// The logger owns the ring, the worker, and the sink. Keeping the sink as a
/// generic parameter keeps dynamic dispatch off the per-record path; route
/// heterogeneous outputs through a [`FanoutSink`] instead.
///
/// Lifecycle: construction spawns the worker (asynchronous mode); dropping
/// the logger flushes the calling thread's batch, signals shutdown, joins
/// the worker after its final drain, and flushes the sink.
pub struct Logger<S: Sink> {
    shared: Arc<Shared<S>>,
    worker: Option<JoinHandle<()>>,
    filter: LevelFilter,
}

impl<S: Sink + Send + 'static> Logger<S> {
    /// Creates an asynchronous logger with default options, taking ownership
    /// of `sink`.
    pub fn new(sink: S) -> Result<Logger<S>, Error> {
        Logger::with_config(sink, Config::default())
    }

    /// Creates a logger from `config`, taking ownership of `sink`.
    pub fn with_config(sink: S, config: Config) -> Result<Logger<S>, Error> {
        if config.synchronous {
            let shared = Arc::new(Shared {
                ring: None,
                sink: Mutex::new(sink),
                running: AtomicBool::new(false),
                wake_lock: Mutex::new(()),
                wake: Condvar::new(),
            });
            return Ok(Logger {
                shared,
                worker: None,
                filter: config.filter,
            });
        }

        let (ring, consumer) = RingBuffer::with_capacity(config.capacity)?;
        let shared = Arc::new(Shared {
            ring: Some(ring),
            sink: Mutex::new(sink),
            running: AtomicBool::new(true),
            wake_lock: Mutex::new(()),
            wake: Condvar::new(),
        });
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("burstlog-worker".into())
            .spawn(move || worker::run(worker_shared, consumer))
            .map_err(Error::Spawn)?;

        Ok(Logger {
            shared,
            worker: Some(worker),
            filter: config.filter,
        })
    }
}

impl<S: Sink> Logger<S> {
    /// Renders and emits one record if `level` passes the filter.
    #[inline]
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.filter.admits(level) {
            return;
        }
        format::with_rendered(level, args, |record| self.append(record));
    }

    /// Emits a `Trace` record.
    #[inline]
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, args)
    }

    /// Emits a `Debug` record.
    #[inline]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args)
    }

    /// Emits an `Info` record.
    #[inline]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args)
    }

    /// Emits a `Warn` record.
    #[inline]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args)
    }

    /// Emits an `Error` record.
    #[inline]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args)
    }

    /// Emits a `Critical` record.
    #[inline]
    pub fn critical(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Critical, args)
    }

    fn append(&self, record: &[u8]) {
        match &self.shared.ring {
            Some(ring) => {
                let flushed = batch::with_batch(ring, |batch| {
                    if likely(batch.try_add(record)) {
                        return false;
                    }
                    batch.flush();
                    let staged = batch.try_add(record);
                    debug_assert!(staged, "empty batch rejected a record");
                    true
                });
                if flushed {
                    self.shared.notify_worker();
                }
            }
            None => self.shared.lock_sink().write(record),
        }
    }

    /// Publishes the calling thread's staged records, waits until every
    /// record in the ring has been written to the sink, then flushes the
    /// sink. Batches staged by other threads are not touched.
    pub fn flush(&self) {
        if let Some(ring) = &self.shared.ring {
            batch::flush_current_thread(ring);
            self.shared.notify_worker();
            while !ring.is_empty() {
                thread::yield_now();
            }
        }
        // The worker dequeues under the sink lock, so acquiring it here means
        // any record dequeued before the ring looked empty has been written.
        self.shared.lock_sink().flush();
    }

    /// The logger's ring, if running asynchronously. Exposes fill level and
    /// rejection counters for monitoring and tests.
    pub fn ring(&self) -> Option<&RingBuffer> {
        self.shared.ring.as_deref()
    }

    /// The configured admission floor.
    pub fn filter(&self) -> LevelFilter {
        self.filter
    }
}

impl<S: Sink> Drop for Logger<S> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            // Publish what this thread still has staged before the worker's
            // final drain; other producers must have quiesced by now.
            if let Some(ring) = &self.shared.ring {
                batch::flush_current_thread(ring);
            }
            self.shared.running.store(false, Ordering::Release);
            self.shared.notify_worker();
            let _ = worker.join();
        }
        self.shared.lock_sink().flush();
    }
}
