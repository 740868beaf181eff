//! Bounds-checked cursor over the input document bytes.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// A read index into an immutable byte slice. Every advance is checked
/// against the slice length; the cursor never moves past the end.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The byte just consumed. Only meaningful after at least one advance.
    #[inline]
    pub fn prev_byte(&self) -> u8 {
        self.buf[self.pos - 1]
    }

    /// Takes `n` bytes, with `context` naming the value being read in the
    /// truncation error.
    #[inline]
    pub fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8]> {
        match self.buf.get(self.pos..self.pos + n) {
            Some(bytes) => {
                self.pos += n;
                Ok(bytes)
            }
            None => Err(Error::TruncatedValue { context }),
        }
    }

    #[inline]
    pub fn skip(&mut self, n: usize, context: &'static str) -> Result<()> {
        self.take(n, context).map(drop)
    }

    #[inline]
    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        let bytes = self.take(1, context)?;
        Ok(bytes[0])
    }

    #[inline]
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32> {
        let bytes = self.take(4, context)?;
        Ok(LittleEndian::read_i32(bytes))
    }

    #[inline]
    pub fn read_i64(&mut self, context: &'static str) -> Result<i64> {
        let bytes = self.take(8, context)?;
        Ok(LittleEndian::read_i64(bytes))
    }

    #[inline]
    pub fn read_f64(&mut self, context: &'static str) -> Result<f64> {
        let bytes = self.take(8, context)?;
        Ok(LittleEndian::read_f64(bytes))
    }

    /// Reads up to (but not including) the next NUL, consuming the NUL.
    pub fn read_cstr(&mut self) -> Result<&'a [u8]> {
        let rest = &self.buf[self.pos..];
        match rest.iter().position(|&b| b == 0) {
            Some(n) => {
                self.pos += n + 1;
                Ok(&rest[..n])
            }
            None => Err(Error::TruncatedKey),
        }
    }
}
