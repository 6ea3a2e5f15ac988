use std::{fmt, io};

use crate::ByteRange;

#[derive(Debug)]
pub enum Error {
    /// The requested range does not fit in the source.
    OutOfRange { range: ByteRange, len: usize },
    /// Failed to write the listing.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OutOfRange { range, len } => write!(
                fmt,
                "range {range} is out of bounds of the input ({len:#x} bytes)"
            ),
            Self::Io(err) => write!(fmt, "failed to write output: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
