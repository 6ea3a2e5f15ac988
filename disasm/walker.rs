use std::{
    fmt,
    io::{self, Write},
};

use armdis_core::{bytes::Bytes, ArchDecoder, Insn, Mode, Options, Width};

use crate::{ByteRange, Error};

struct FormatterFn<F>(F)
where
    F: Fn(&mut fmt::Formatter) -> fmt::Result;

impl<F> fmt::Display for FormatterFn<F>
where
    F: Fn(&mut fmt::Formatter) -> fmt::Result,
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        self.0(fmt)
    }
}

/// Instruction bytes as they are printed in a listing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Raw {
    Half(u16),
    Word(u32),
}

impl Raw {
    /// Take the bytes of `raw` consumed by an instruction of `width`.
    pub fn new(raw: u32, width: Width) -> Self {
        match width {
            Width::Narrow => Raw::Half(raw as u16),
            Width::Wide => Raw::Word(raw),
        }
    }

    pub fn width(&self) -> Width {
        match self {
            Raw::Half(_) => Width::Narrow,
            Raw::Word(_) => Width::Wide,
        }
    }
}

impl fmt::Display for Raw {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            // padded to the width of a word
            Raw::Half(raw) => write!(fmt, "{raw:04X}    "),
            Raw::Word(raw) => write!(fmt, "{raw:08X}"),
        }
    }
}

/// One decoded instruction of a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub address: usize,
    pub raw: Raw,
    pub insn: Insn,
}

impl Line {
    pub fn width(&self) -> Width {
        self.raw.width()
    }

    /// Display the line without the address column.
    pub fn code(&self) -> impl fmt::Display + '_ {
        FormatterFn(move |fmt| write!(fmt, "{} {}", self.raw, self.insn))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{:08X}: {}", self.address, self.code())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Number of emitted lines.
    pub lines: usize,
    /// Number of instructions the decoder did not recognize.
    pub unknown: usize,
}

impl WalkOutcome {
    fn record(&mut self, line: &Line) {
        self.lines += 1;
        if !line.insn.is_known() {
            self.unknown += 1;
        }
    }
}

/// Iterator over the instructions of a resolved range.
///
/// The cursor only moves by the width of the decoded instruction, so a narrow
/// instruction gives back the upper half of its 4-byte prefetch.
pub struct Lines<'a, D> {
    decoder: &'a D,
    opts: Options,
    bytes: Bytes<'a>,
    end: usize,
}

impl<'a, D: ArchDecoder> Lines<'a, D> {
    /// Offset of the next instruction.
    pub fn offset(&self) -> usize {
        self.bytes.offset()
    }
}

impl<'a, D: ArchDecoder> Iterator for Lines<'a, D> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let address = self.bytes.offset();
        if address >= self.end {
            return None;
        }

        let remaining = self.end - address;
        if self.opts.mode == Mode::Arm && remaining < Width::Wide.bytes() {
            debug!("drop {remaining} trailing bytes at {address:#x}");
            self.end = address;
            return None;
        }

        let raw = self.bytes.peek_u32();
        let insn = self.decoder.decode(raw, &self.opts);
        let width = insn.width();
        if width.bytes() > remaining {
            debug!("drop partial instruction at {address:#x}");
            self.end = address;
            return None;
        }

        self.bytes.advance(width.bytes());
        Some(Line {
            address,
            raw: Raw::new(raw, width),
            insn,
        })
    }
}

pub struct Walker<D> {
    decoder: D,
    opts: Options,
}

impl<D: ArchDecoder> Walker<D> {
    pub fn new(decoder: D, opts: Options) -> Self {
        Self { decoder, opts }
    }

    /// Decode a single code word, the address of the returned line is zero.
    pub fn decode_one(&self, code: u32) -> Line {
        let insn = self.decoder.decode(code, &self.opts);
        Line {
            address: 0,
            raw: Raw::new(code, insn.width()),
            insn,
        }
    }

    /// Iterate over the instructions in `range` of `source`.
    pub fn lines<'a>(&'a self, source: &'a [u8], range: ByteRange) -> Result<Lines<'a, D>, Error> {
        let range = range.resolve(source.len())?;
        Ok(Lines {
            decoder: &self.decoder,
            opts: self.opts,
            bytes: Bytes::at(source, range.start),
            end: range.end,
        })
    }

    /// Write one line per instruction in `range` of `source`.
    ///
    /// Nothing is written if the range does not fit in the source.
    pub fn walk<W: Write>(
        &self,
        source: &[u8],
        range: ByteRange,
        out: &mut W,
    ) -> Result<WalkOutcome, Error> {
        let mut outcome = WalkOutcome::default();
        for line in self.lines(source, range)? {
            writeln!(out, "{line}")?;
            outcome.record(&line);
        }
        debug!(
            "walked {range}: {} lines, {} unknown",
            outcome.lines, outcome.unknown
        );
        Ok(outcome)
    }

    /// Like [`Walker::walk`] with a size header and an unknown count trailer.
    pub fn listing<W: Write>(
        &self,
        source: &[u8],
        range: ByteRange,
        out: &mut W,
    ) -> Result<WalkOutcome, Error> {
        let size = range.resolve(source.len())?.len();
        writeln!(out, "Disassembly of {size} ({size:#X}) bytes:\n")?;
        let outcome = self.walk(source, range, out)?;
        writeln!(out, "\n{} unknown instructions.", outcome.unknown)?;
        out.flush()?;
        Ok(outcome)
    }

    /// Write the instruction of a single code word without an address.
    pub fn print_one<W: Write>(&self, code: u32, out: &mut W) -> io::Result<WalkOutcome> {
        let line = self.decode_one(code);
        writeln!(out, "{}", line.code())?;
        let mut outcome = WalkOutcome::default();
        outcome.record(&line);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use armdis_core::{Revision, Width};

    use super::*;
    use crate::Decoder;

    /// Narrow unless the low halfword starts with `0xf`, unknown if it is zero.
    struct Stub;

    impl ArchDecoder for Stub {
        fn decode_fixed(&self, word: u32, _: Revision) -> Insn {
            match word {
                0 => Insn::unknown(Width::Wide),
                _ => Insn::new(Width::Wide, format!("w{word:x}")),
            }
        }

        fn decode_variable(&self, prefetch: u32, _: Revision) -> Insn {
            let width = if prefetch & 0xf000 == 0xf000 {
                Width::Wide
            } else {
                Width::Narrow
            };
            match prefetch & 0xffff {
                0 => Insn::unknown(width),
                half => Insn::new(width, format!("h{half:x}")),
            }
        }
    }

    fn stub(mode: Mode) -> Walker<Stub> {
        Walker::new(Stub, Options::new(mode, Revision::V5TE))
    }

    fn halves(data: &[u16]) -> Vec<u8> {
        data.iter().flat_map(|i| i.to_le_bytes()).collect()
    }

    fn walk_to_string<D: ArchDecoder>(
        walker: &Walker<D>,
        source: &[u8],
        range: ByteRange,
    ) -> (WalkOutcome, String) {
        let mut out = Vec::new();
        let outcome = walker.walk(source, range, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn fixed_single_word() {
        let walker = Walker::new(Decoder::new(), Options::new(Mode::Arm, Revision::V5TE));
        let source = [0x00, 0x00, 0xa0, 0xe3];
        let lines: Vec<_> = walker
            .lines(&source, ByteRange::new(0, 4))
            .unwrap()
            .collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].address, 0);
        assert_eq!(lines[0].raw, Raw::Word(0xe3a00000));
        assert_eq!(lines[0].to_string(), "00000000: E3A00000 mov\tr0, #0");
    }

    #[test]
    fn fixed_drops_trailing_bytes() {
        let source = [1, 0, 0, 0, 2, 0, 0, 0, 3, 0];
        let (outcome, out) = walk_to_string(&stub(Mode::Arm), &source, ByteRange::default());
        assert_eq!(outcome, WalkOutcome { lines: 2, unknown: 0 });
        assert_eq!(out, "00000000: 00000001 w1\n00000004: 00000002 w2\n");
    }

    #[test]
    fn variable_narrow_pair() {
        let walker = Walker::new(Decoder::new(), Options::new(Mode::Thumb, Revision::V5TE));
        let source = halves(&[0x2001, 0x2802]);
        let lines: Vec<_> = walker
            .lines(&source, ByteRange::new(0, 4))
            .unwrap()
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].address, 0);
        assert_eq!(lines[1].address, 2);
        assert!(lines.iter().all(|i| i.width() == Width::Narrow));
        assert_eq!(lines[0].to_string(), "00000000: 2001     mov\tr0, #1");
        assert_eq!(lines[1].to_string(), "00000002: 2802     cmp\tr0, #2");
    }

    #[test]
    fn variable_gives_back_prefetch() {
        let source = halves(&[0x0001, 0xf002, 0x0003, 0x0004]);
        let (outcome, out) = walk_to_string(&stub(Mode::Thumb), &source, ByteRange::default());
        assert_eq!(outcome, WalkOutcome { lines: 3, unknown: 0 });
        armdis_test::check(
            "variable_gives_back_prefetch",
            0,
            "\
00000000: 0001     h1
00000002: 0003F002 hf002
00000006: 0004     h4
",
            &out,
        )
        .unwrap();
    }

    #[test]
    fn addresses_follow_widths() {
        let source = halves(&[0xf001, 0x1111, 0x2222, 0xf333, 0x4444, 0x5555, 0xf666]);
        let walker = stub(Mode::Thumb);
        let mut lines = walker.lines(&source, ByteRange::default()).unwrap();
        let mut consumed = 0;
        let mut prev: Option<Line> = None;
        for line in lines.by_ref() {
            if let Some(prev) = &prev {
                assert_eq!(line.address, prev.address + prev.width().bytes());
            }
            consumed += line.width().bytes();
            prev = Some(line);
        }
        // the last prefetch is wide but only 2 bytes remain
        assert_eq!(consumed, 12);
        assert!(consumed <= source.len());
        assert_eq!(lines.offset(), 12);
    }

    #[test]
    fn prefetch_reads_past_range_end() {
        let source = halves(&[0x0001, 0xf002, 0x0003]);
        let walker = stub(Mode::Thumb);
        let lines: Vec<_> = walker
            .lines(&source, ByteRange::new(0, 4))
            .unwrap()
            .collect();
        // the wide instruction at 2 would end past the range
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].raw, Raw::Half(0x0001));
    }

    #[test]
    fn unknown_counted_in_both_modes() {
        let source = [0, 0, 0, 0, 1, 0, 0, 0];
        let (outcome, out) = walk_to_string(&stub(Mode::Arm), &source, ByteRange::default());
        assert_eq!(outcome, WalkOutcome { lines: 2, unknown: 1 });
        assert!(out.starts_with("00000000: 00000000 <unknown>\n"));

        let (outcome, _) = walk_to_string(&stub(Mode::Thumb), &source, ByteRange::default());
        assert_eq!(outcome, WalkOutcome { lines: 4, unknown: 3 });
    }

    #[test]
    fn start_past_end_is_rejected() {
        let walker = stub(Mode::Thumb);
        let mut out = Vec::new();
        let result = walker.walk(&[0; 4], ByteRange::new(8, 0), &mut out);
        assert!(matches!(result, Err(Error::OutOfRange { len: 4, .. })));
        assert!(out.is_empty());

        let result = walker.listing(&[0; 4], ByteRange::new(0, 6), &mut out);
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn variable_from_offset() {
        let source = halves(&[0x0000, 0x2001, 0xf000, 0xf800, 0x2802, 0x4770]);
        let walker = Walker::new(Decoder::new(), Options::new(Mode::Thumb, Revision::V5TE));
        let mut lines = walker.lines(&source, ByteRange::new(2, 10)).unwrap();
        let list: Vec<_> = lines.by_ref().collect();
        let addresses: Vec<_> = list.iter().map(|i| i.address).collect();
        assert_eq!(addresses, [2, 4, 8]);
        for pair in list.windows(2) {
            assert_eq!(pair[1].address, pair[0].address + pair[0].width().bytes());
        }
        assert_eq!(lines.offset(), 10);

        let (_, out) = walk_to_string(&walker, &source, ByteRange::new(2, 10));
        armdis_test::check(
            "variable_from_offset",
            0,
            "\
00000002: 2001     mov\tr0, #1
00000004: F800F000 bl\t.+0x4
00000008: 2802     cmp\tr0, #2
",
            &out,
        )
        .unwrap();
    }

    #[test]
    fn fixed_from_offset() {
        let source = [
            0xff, 0xff, 0x00, 0x00, 0xa0, 0xe3, 0x01, 0x10, 0x41, 0xe2, 0xff, 0xff,
        ];
        let walker = Walker::new(Decoder::new(), Options::new(Mode::Arm, Revision::V5TE));
        let mut lines = walker.lines(&source, ByteRange::new(2, 10)).unwrap();
        let list: Vec<_> = lines.by_ref().collect();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].to_string(), "00000002: E3A00000 mov\tr0, #0");
        assert_eq!(list[1].to_string(), "00000006: E2411001 sub\tr1, r1, #1");
        assert_eq!(lines.offset(), 10);
    }

    #[test]
    fn walk_is_idempotent() {
        let source: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(37)).collect();
        let walker = Walker::new(Decoder::new(), Options::default());
        let range = ByteRange::new(2, 0);
        let first = walk_to_string(&walker, &source, range);
        let second = walk_to_string(&walker, &source, range);
        assert_eq!(first, second);
    }

    #[test]
    fn listing_frame() {
        let walker = Walker::new(Decoder::new(), Options::new(Mode::Arm, Revision::V4T));
        let source = [0x00, 0x00, 0xa0, 0xe3, 0x11, 0x0f, 0x6f, 0xe1];
        let mut out = Vec::new();
        let outcome = walker
            .listing(&source, ByteRange::default(), &mut out)
            .unwrap();
        assert_eq!(outcome, WalkOutcome { lines: 2, unknown: 1 });
        armdis_test::check(
            "listing_frame",
            0,
            "\
Disassembly of 8 (0x8) bytes:

00000000: E3A00000 mov\tr0, #0
00000004: E16F0F11 <unknown>

1 unknown instructions.
",
            &String::from_utf8(out).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn single_code() {
        let walker = Walker::new(Decoder::new(), Options::default());
        let mut out = Vec::new();
        walker.print_one(0x4770, &mut out).unwrap();
        walker.print_one(0xf800f000, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "4770     bx\tlr\nF800F000 bl\t.+0x4\n"
        );
    }
}
