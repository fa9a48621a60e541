use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;

use crate::Sink;

/// Appends byte runs to a file.
pub struct FileSink {
    writer: LineWriter<File>,
}

impl FileSink {
    /// Opens `path` for appending, creating the file if it does not exist.
    /// The parent directory must already exist.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<FileSink> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(FileSink {
            writer: LineWriter::new(file),
        })
    }
}

impl Sink for FileSink {
    fn write(&mut self, bytes: &[u8]) {
        let _ = self.writer.write_all(bytes);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}
