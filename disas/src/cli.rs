use armdis::{ByteRange, Options};
use bpaf::*;

use crate::grammar::{is_valid_path, parse_code, parse_mode, parse_range};

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Invalid,
    SingleCode {
        code: u32,
        options: Options,
    },
    ToStream {
        input: String,
        range: ByteRange,
        options: Options,
    },
    ToFile {
        input: String,
        output: String,
        range: ByteRange,
        options: Options,
    },
}

/// Collect the raw arguments, the program name is the first token.
pub fn parse_cli() -> Vec<String> {
    // ranges like `--10` must not be taken as flags
    let raw = any::<String, _, _>("ARG", |s: String| {
        (!matches!(s.as_str(), "-h" | "--help" | "-V" | "--version")).then_some(s)
    })
    .help("CODE [/MODE] | INPUT [OUTPUT] [RANGE] [/MODE]")
    .many();

    let args = raw
        .to_options()
        .version(env!("CARGO_PKG_VERSION"))
        .descr("Disassembler for ARM and Thumb code")
        .footer(
            "\
RANGE is hexadecimal: START-END, START-, --END or START:SIZE.
MODE is one of /a, /a5, /a4 (ARM) or /t, /t5, /5, /t4, /4 (Thumb).",
        )
        .run();

    let name = std::env::args().next().unwrap_or_else(|| "armdis".to_owned());
    let mut tokens = Vec::with_capacity(args.len() + 1);
    tokens.push(name);
    tokens.extend(args);
    tokens
}

fn set_range(text: Option<&str>, range: &mut ByteRange) -> bool {
    let Some(text) = text else {
        return false;
    };
    match parse_range(text) {
        Ok(value) => {
            *range = value;
            true
        }
        Err(err) => {
            debug!("{text:?} is not a range: {err}");
            false
        }
    }
}

fn set_mode(text: Option<&str>, options: &mut Options) -> bool {
    let Some(text) = text else {
        return false;
    };
    match parse_mode(text) {
        Ok((mode, revision)) => {
            *options = Options::new(mode, revision);
            true
        }
        Err(err) => {
            debug!("{text:?} is not a mode: {err}");
            false
        }
    }
}

/// Range and mode in either order, the second token is only tried if the
/// first one was accepted.
fn set_optional(
    first: Option<&str>,
    second: Option<&str>,
    range: &mut ByteRange,
    options: &mut Options,
) {
    if set_range(first, range) {
        set_mode(second, options);
    } else if set_mode(first, options) {
        set_range(second, range);
    }
}

/// Classify the command line tokens, `tokens[0]` is the program name.
pub fn resolve<T: AsRef<str>>(tokens: &[T]) -> Invocation {
    if !(2..=5).contains(&tokens.len()) {
        debug!("invalid number of arguments {}", tokens.len());
        return Invocation::Invalid;
    }

    let token = |i: usize| tokens.get(i).map(|s| s.as_ref());
    let mut range = ByteRange::default();
    let mut options = Options::default();

    let first = tokens[1].as_ref();
    if is_valid_path(first) {
        let input = first.to_owned();
        match token(2).filter(|s| is_valid_path(s)) {
            Some(output) => {
                set_optional(token(3), token(4), &mut range, &mut options);
                Invocation::ToFile {
                    input,
                    output: output.to_owned(),
                    range,
                    options,
                }
            }
            None => {
                set_optional(token(2), token(3), &mut range, &mut options);
                Invocation::ToStream {
                    input,
                    range,
                    options,
                }
            }
        }
    } else {
        match parse_code(first) {
            Ok(code) => {
                set_mode(token(2), &mut options);
                Invocation::SingleCode { code, options }
            }
            Err(err) => {
                debug!("{first:?} is neither a path nor a code: {err}");
                Invocation::Invalid
            }
        }
    }
}
