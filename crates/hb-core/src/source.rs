//! Re-scannable input.
//!
//! The pipeline reads its input up to three times. Files are rewound
//! between passes; anything that cannot seek (stdin, pipes) is buffered
//! into memory once.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek};
use std::path::Path;

trait SeekRead: BufRead + Seek {}

impl<T: BufRead + Seek> SeekRead for T {}

/// Line source that can be scanned from the start any number of times.
pub struct Source {
    inner: Box<dyn SeekRead>,
}

impl Source {
    /// Open a file for repeated scanning.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            inner: Box::new(BufReader::new(file)),
        })
    }

    /// Buffer a non-seekable reader into memory.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_bytes(data))
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            inner: Box::new(Cursor::new(data)),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    /// Rewind and iterate lines with `\n` / `\r\n` stripped.
    pub fn scan(&mut self) -> io::Result<Lines<'_>> {
        self.inner.rewind()?;
        Ok(Lines {
            reader: &mut *self.inner,
            buf: Vec::new(),
        })
    }
}

/// Lines of one scan.
pub struct Lines<'a> {
    reader: &'a mut (dyn SeekRead + 'static),
    buf: Vec<u8>,
}

impl Iterator for Lines<'_> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
