use crate::Sink;

/// Routes every byte run to a list of dynamic sinks.
///
/// A logger stays generic over one concrete sink type; when output must go
/// to several heterogeneous destinations, hang them off a single `FanoutSink`
/// instead of making the logger itself dynamic.
pub struct FanoutSink {
    sinks: Vec<Box<dyn Sink + Send>>,
}

impl FanoutSink {
    pub fn new() -> FanoutSink {
        FanoutSink { sinks: Vec::new() }
    }

    /// Adds a destination. Records are written to destinations in insertion
    /// order.
    pub fn push(&mut self, sink: Box<dyn Sink + Send>) {
        self.sinks.push(sink);
    }

    /// Builder-style variant of [`push`](FanoutSink::push).
    pub fn with(mut self, sink: Box<dyn Sink + Send>) -> FanoutSink {
        self.push(sink);
        self
    }
}

impl Default for FanoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for FanoutSink {
    fn write(&mut self, bytes: &[u8]) {
        for sink in &mut self.sinks {
            sink.write(bytes);
        }
    }

    fn flush(&mut self) {
        for sink in &mut self.sinks {
            sink.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct CaptureSink {
        bytes: Arc<Mutex<Vec<u8>>>,
        flushed: Arc<Mutex<bool>>,
    }

    impl Sink for CaptureSink {
        fn write(&mut self, bytes: &[u8]) {
            self.bytes.lock().unwrap().extend_from_slice(bytes);
        }

        fn flush(&mut self) {
            *self.flushed.lock().unwrap() = true;
        }
    }

    #[test]
    fn fans_out_to_every_destination() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));
        let first_flushed = Arc::new(Mutex::new(false));
        let second_flushed = Arc::new(Mutex::new(false));

        let mut fanout = FanoutSink::new()
            .with(Box::new(CaptureSink {
                bytes: Arc::clone(&first),
                flushed: Arc::clone(&first_flushed),
            }))
            .with(Box::new(CaptureSink {
                bytes: Arc::clone(&second),
                flushed: Arc::clone(&second_flushed),
            }));

        fanout.write(b"0.1 I hello\n");
        fanout.flush();

        assert_eq!(first.lock().unwrap().as_slice(), b"0.1 I hello\n");
        assert_eq!(second.lock().unwrap().as_slice(), b"0.1 I hello\n");
        assert!(*first_flushed.lock().unwrap());
        assert!(*second_flushed.lock().unwrap());
    }

    #[test]
    fn empty_fanout_is_a_null_sink() {
        let mut fanout = FanoutSink::new();
        fanout.write(b"dropped");
        fanout.flush();
    }
}
