use std::io::Write;

use crate::Sink;

/// Writes byte runs to standard output.
pub struct StdoutSink {
    stdout: std::io::Stdout,
}

impl StdoutSink {
    pub fn new() -> StdoutSink {
        StdoutSink {
            stdout: std::io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for StdoutSink {
    fn write(&mut self, bytes: &[u8]) {
        let _ = self.stdout.write_all(bytes);
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}
