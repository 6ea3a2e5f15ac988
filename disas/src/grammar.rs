//! Textual grammars of the positional arguments.

use armdis::{ByteRange, Mode, Revision};

/// Longest accepted range argument, longer input is truncated.
pub const RANGE_LENGTH: usize = 32;
/// Paths must be shorter than this.
pub const PATH_LENGTH: usize = 260;

/// Prefixes of a range without a start offset.
const NO_START: [&str; 3] = ["--", "-:", ":-"];

const MODES: &[(&str, Mode, Revision)] = &[
    ("a", Mode::Arm, Revision::V5TE),
    ("a5", Mode::Arm, Revision::V5TE),
    ("a4", Mode::Arm, Revision::V4T),
    ("t4", Mode::Thumb, Revision::V4T),
    ("4", Mode::Thumb, Revision::V4T),
    ("t", Mode::Thumb, Revision::V5TE),
    ("t5", Mode::Thumb, Revision::V5TE),
    ("5", Mode::Thumb, Revision::V5TE),
];

/// Parse the longest prefix of hex digits, an empty prefix is zero.
///
/// Saturates instead of overflowing.
fn hex_prefix(s: &str) -> usize {
    s.chars()
        .map_while(|c| c.to_digit(16))
        .fold(0usize, |acc, d| acc.saturating_mul(16).saturating_add(d as usize))
}

/// Parse a byte range.
///
/// Accepted forms (hex, no prefix):
///
/// * `A-B` from `A` to `B`
/// * `A-` or `A--` from `A` to the end of the input
/// * `--B`, `-:B` or `:-B` from zero to `B`
/// * `A:S` `S` bytes from `A`
pub fn parse_range(text: &str) -> Result<ByteRange, &'static str> {
    if text.is_empty() || text.starts_with('/') {
        return Err("not a range");
    }

    let text = match text.char_indices().nth(RANGE_LENGTH - 1) {
        Some((pos, _)) => &text[..pos],
        None => text,
    };

    let range = if let Some(rest) = NO_START.iter().find_map(|p| text.strip_prefix(p)) {
        ByteRange::new(0, hex_prefix(rest))
    } else {
        let pos = text
            .find(|c: char| c == '-' || c == ':')
            .ok_or("range separator not found")?;
        let start = hex_prefix(text);
        let value = hex_prefix(&text[pos + 1..]);
        let end = if text[pos..].starts_with(':') {
            start.checked_add(value).ok_or("range size overflow")?
        } else {
            value
        };
        ByteRange::new(start, end)
    };

    if range.end != 0 && range.end < range.start {
        warn!(
            "range end {:#x} is less than start {:#x}, the whole input will be disassembled",
            range.end, range.start
        );
        return Err("range end is less than start");
    }

    Ok(range)
}

/// Parse a mode flag such as `/a4`.
pub fn parse_mode(text: &str) -> Result<(Mode, Revision), &'static str> {
    if !(2..=3).contains(&text.len()) {
        return Err("invalid mode length");
    }
    let name = text.strip_prefix('/').ok_or("mode must start with '/'")?;
    MODES
        .iter()
        .find(|(s, ..)| *s == name)
        .map(|&(_, mode, revision)| (mode, revision))
        .ok_or("unknown mode")
}

/// Structural path check, the file system is not consulted.
///
/// A path is non-empty, shorter than [`PATH_LENGTH`] and has a `.` after the
/// first character.
pub fn is_valid_path(text: &str) -> bool {
    !text.is_empty() && text.len() < PATH_LENGTH && text.chars().skip(1).any(|c| c == '.')
}

/// Parse a code word of 1 to 8 hex digits.
pub fn parse_code(text: &str) -> Result<u32, &'static str> {
    if text.is_empty() || text.len() > 8 {
        return Err("code must have 1 to 8 hex digits");
    }
    if !text.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err("code must be hexadecimal");
    }
    u32::from_str_radix(text, 16).map_err(|_| "invalid code")
}
