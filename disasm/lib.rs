//! Disassembler for the ARM (fixed 32-bit) and Thumb (16/32-bit) encodings.
//!
//! ```
//! use armdis::{ByteRange, Decoder, Mode, Options, Revision, Walker};
//!
//! let walker = Walker::new(Decoder::new(), Options::new(Mode::Arm, Revision::V5TE));
//! let mut out = Vec::new();
//! let outcome = walker
//!     .walk(&[0x00, 0x00, 0xa0, 0xe3], ByteRange::default(), &mut out)
//!     .unwrap();
//! assert_eq!(outcome.lines, 1);
//! assert_eq!(String::from_utf8(out).unwrap(), "00000000: E3A00000 mov\tr0, #0\n");
//! ```

#[macro_use]
extern crate log;

pub mod error;
pub mod stats;

mod range;
mod walker;

pub use armdis_arm::Decoder;
pub use armdis_core::{ArchDecoder, Insn, Mode, Options, Revision, Width};

pub use crate::{
    error::Error,
    range::ByteRange,
    stats::Statistics,
    walker::{Line, Lines, Raw, WalkOutcome, Walker},
};
