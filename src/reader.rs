//! Byte input with one byte of pushback.

use crate::Result;
use std::io::{self, BufRead, ErrorKind, Read};

/// Buffered byte reader tracking the current line for diagnostics.
///
/// Every lexical rule needs at most one byte of lookahead, so pushback is a
/// single slot rather than a general rewind buffer.
pub struct ByteReader<R> {
    inner: R,
    pushback: Option<u8>,
    line: usize,
}

impl<R: BufRead> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        ByteReader {
            inner,
            pushback: None,
            line: 1,
        }
    }

    /// Current 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the next byte, or `None` at end of input.
    pub fn read(&mut self) -> Result<Option<u8>> {
        let byte = match self.pushback.take() {
            Some(byte) => Some(byte),
            None => self.next_raw()?,
        };
        if byte == Some(b'\n') {
            self.line += 1;
        }
        Ok(byte)
    }

    /// Pushes back the byte returned by the last [`read`](Self::read).
    pub fn unread(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "only one byte of pushback");
        if byte == b'\n' {
            self.line -= 1;
        }
        self.pushback = Some(byte);
    }

    /// Fills `buf` as far as the input allows without counting lines.
    ///
    /// Returns how many bytes were read; fewer than `buf.len()` means the
    /// input ended.
    pub fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        if let (Some(byte), Some(first)) = (self.pushback, buf.first_mut()) {
            *first = byte;
            self.pushback = None;
            filled = 1;
        }
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    fn next_raw(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => {
                    let byte = buf[0];
                    self.inner.consume(1);
                    return Ok(Some(byte));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_tracking_with_pushback() {
        let mut reader = ByteReader::new(&b"a\nb"[..]);
        assert_eq!(reader.read().unwrap(), Some(b'a'));
        assert_eq!(reader.line(), 1);
        assert_eq!(reader.read().unwrap(), Some(b'\n'));
        assert_eq!(reader.line(), 2);
        reader.unread(b'\n');
        assert_eq!(reader.line(), 1);
        assert_eq!(reader.read().unwrap(), Some(b'\n'));
        assert_eq!(reader.read().unwrap(), Some(b'b'));
        assert_eq!(reader.read().unwrap(), None);
        assert_eq!(reader.line(), 2);
    }

    #[test]
    fn test_read_raw_drains_pushback_first() {
        let mut reader = ByteReader::new(&b"xyz"[..]);
        let first = reader.read().unwrap().unwrap();
        reader.unread(first);
        let mut buf = [0u8; 5];
        assert_eq!(reader.read_raw(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"xyz");
        assert_eq!(reader.read().unwrap(), None);
    }
}
