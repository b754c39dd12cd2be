//! Line reading over raw bytes
//!
//! Lines are split on `\n` before they are decoded, so a single line that is
//! not valid UTF-8 comes back as its own item and the read goes on.

use std::io::{self, BufRead};
use std::string::FromUtf8Error;

/// One line: decoded text, or the undecodable bytes.
pub type RawLine = std::result::Result<String, FromUtf8Error>;

/// Iterator over the lines of a reader, without `\n` or `\r\n` terminators.
pub struct RawLines<R> {
    reader: R,
    buf: Vec<u8>,
}

/// Iterate the lines of `reader`.
pub const fn raw_lines<R: BufRead>(reader: R) -> RawLines<R> {
    RawLines {
        reader,
        buf: Vec::new(),
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = io::Result<RawLine>;

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
                Some(Ok(String::from_utf8(std::mem::take(&mut self.buf))))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
