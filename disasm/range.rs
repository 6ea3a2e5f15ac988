use std::fmt;

use crate::Error;

/// Byte offsets into the input.
///
/// An `end` of zero means "up to the end of the input" and is replaced with
/// the input length by [`ByteRange::resolve`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns `true` if the end is left to the input length.
    pub fn is_open(&self) -> bool {
        self.end == 0
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the range against an input of `len` bytes and fill in an open end.
    pub fn resolve(&self, len: usize) -> Result<ByteRange, Error> {
        if self.start > len || self.end > len {
            return Err(Error::OutOfRange { range: *self, len });
        }
        let end = if self.is_open() { len } else { self.end };
        Ok(ByteRange::new(self.start, end))
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.is_open() {
            write!(fmt, "{:#x}..", self.start)
        } else {
            write!(fmt, "{:#x}..{:#x}", self.start, self.end)
        }
    }
}
