// Helpers shared by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use burstlog::Sink;

/// Capturing sink: clones of one handle share the captured records, so a
/// test can keep a handle while the logger owns the sink.
#[derive(Clone, Default)]
pub(crate) struct VecSink {
    records: Arc<Mutex<Vec<Vec<u8>>>>,
    flushes: Arc<AtomicUsize>,
}

impl VecSink {
    pub(crate) fn new() -> VecSink {
        VecSink::default()
    }

    pub(crate) fn records(&self) -> Vec<Vec<u8>> {
        self.records.lock().unwrap().clone()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|record| String::from_utf8(record).unwrap())
            .collect()
    }

    pub(crate) fn flushes(&self) -> usize {
        self.flushes.load(Ordering::Relaxed)
    }
}

impl Sink for VecSink {
    fn write(&mut self, bytes: &[u8]) {
        self.records.lock().unwrap().push(bytes.to_vec());
    }

    fn flush(&mut self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }
}

/// Sink that dawdles on every write, to force ring overflow in tests.
pub(crate) struct SlowSink {
    pub(crate) inner: VecSink,
    pub(crate) delay: Duration,
}

impl Sink for SlowSink {
    fn write(&mut self, bytes: &[u8]) {
        thread::sleep(self.delay);
        self.inner.write(bytes);
    }

    fn flush(&mut self) {
        self.inner.flush();
    }
}

/// Splits a rendered line into (timestamp nanos, level tag, payload).
pub(crate) fn parse_line(line: &str) -> (u64, char, String) {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let mut parts = line.splitn(3, ' ');
    let stamp = parts.next().unwrap();
    let tag = parts.next().unwrap();
    let payload = parts.next().unwrap_or("").to_string();
    let (secs, nanos) = stamp.split_once('.').unwrap();
    let total = secs.parse::<u64>().unwrap() * 1_000_000_000 + nanos.parse::<u64>().unwrap();
    assert_eq!(tag.len(), 1, "malformed level tag in {:?}", line);
    (total, tag.chars().next().unwrap(), payload)
}

pub(crate) fn payloads(lines: &[String]) -> Vec<String> {
    lines.iter().map(|line| parse_line(line).2).collect()
}
