use crate::Sink;

/// Discards every byte run. Useful for benchmarking the transport.
pub struct NullSink;

impl Sink for NullSink {
    fn write(&mut self, _bytes: &[u8]) {}

    fn flush(&mut self) {}
}
