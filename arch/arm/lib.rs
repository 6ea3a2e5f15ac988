//! ARM and Thumb decoder for ARMv4T and ARMv5TE.
//!
//! Output uses the pre-UAL assembler syntax: the condition code precedes the
//! `s` and size suffixes (`addeqs`, `ldrneb`) and branch targets are printed
//! relative to the branch (`.+0x10`).

mod arm;
mod consts;
mod thumb;

use armdis_core::{ArchDecoder, Insn, Revision, Width};

#[derive(Copy, Clone, Debug, Default)]
pub struct Decoder;

impl Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl ArchDecoder for Decoder {
    fn decode_fixed(&self, word: u32, revision: Revision) -> Insn {
        match arm::decode(word, revision) {
            Some(text) => Insn::new(Width::Wide, text),
            None => Insn::unknown(Width::Wide),
        }
    }

    fn decode_variable(&self, prefetch: u32, revision: Revision) -> Insn {
        thumb::decode(prefetch, revision)
    }
}
