#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bytes;
pub mod insn;
pub mod utils;

use core::fmt;

pub use crate::insn::{Insn, Width};

/// Instruction set state the input is decoded in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Fixed-width 32-bit encoding.
    Arm,
    /// Variable-width 16/32-bit encoding.
    #[default]
    Thumb,
}

/// Architecture revision, controls which encodings are recognized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Revision {
    V4T,
    #[default]
    V5TE,
}

impl Revision {
    /// Returns `true` if ARMv5TE encodings are available.
    pub fn has_v5te(&self) -> bool {
        *self >= Revision::V5TE
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Arm => fmt.write_str("arm"),
            Mode::Thumb => fmt.write_str("thumb"),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Revision::V4T => fmt.write_str("armv4t"),
            Revision::V5TE => fmt.write_str("armv5te"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub mode: Mode,
    pub revision: Revision,
}

impl Options {
    pub fn new(mode: Mode, revision: Revision) -> Self {
        Self { mode, revision }
    }
}

/// Maps raw instruction bits to text.
pub trait ArchDecoder {
    /// Decode one fixed-width 32-bit word. The result is always [`Width::Wide`].
    fn decode_fixed(&self, word: u32, revision: Revision) -> Insn;

    /// Decode a 4-byte prefetch in the variable-width encoding.
    ///
    /// Only the low halfword is guaranteed to belong to the instruction, the
    /// returned width tells how many bytes were actually used.
    fn decode_variable(&self, prefetch: u32, revision: Revision) -> Insn;

    /// Decode `raw` according to `opts.mode`.
    fn decode(&self, raw: u32, opts: &Options) -> Insn {
        match opts.mode {
            Mode::Arm => self.decode_fixed(raw, opts.revision),
            Mode::Thumb => self.decode_variable(raw, opts.revision),
        }
    }
}

impl<T: ArchDecoder + ?Sized> ArchDecoder for &T {
    fn decode_fixed(&self, word: u32, revision: Revision) -> Insn {
        (**self).decode_fixed(word, revision)
    }

    fn decode_variable(&self, prefetch: u32, revision: Revision) -> Insn {
        (**self).decode_variable(prefetch, revision)
    }
}
