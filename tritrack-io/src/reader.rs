//! Replay of recorded boundary-crossing notifications.
//!
//! The input is JSON lines: one [`CrossingNotification`] object per line, in
//! the order the transport engine emitted them. Blank lines and lines
//! starting with `#` are skipped.

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tritrack_core::CrossingNotification;

/// Iterator over the notifications of a JSON-lines stream.
pub struct NotificationReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl NotificationReader<BufReader<File>> {
    /// Opens a notification file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> NotificationReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for NotificationReader<R> {
    type Item = Result<CrossingNotification>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(Error::Io(e))),
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let line = self.line;
            return Some(
                serde_json::from_str(text)
                    .map_err(|source| Error::InvalidNotification { line, source }),
            );
        }
    }
}
