use std::io::Write;

use crate::Sink;

/// Writes byte runs to standard error.
pub struct StderrSink {
    stderr: std::io::Stderr,
}

impl StderrSink {
    pub fn new() -> StderrSink {
        StderrSink {
            stderr: std::io::stderr(),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StderrSink {
    fn write(&mut self, bytes: &[u8]) {
        let _ = self.stderr.write_all(bytes);
    }

    fn flush(&mut self) {
        let _ = self.stderr.flush();
    }
}
