use core::fmt;

use alloc::string::String;

/// Text printed in place of a mnemonic for undecodable bit patterns.
pub const UNKNOWN: &str = "<unknown>";

/// Number of bytes consumed by one decoded instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Width {
    /// 2 bytes.
    Narrow,
    /// 4 bytes.
    Wide,
}

impl Width {
    pub const fn bytes(&self) -> usize {
        match self {
            Width::Narrow => 2,
            Width::Wide => 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insn {
    width: Width,
    text: Option<String>,
}

impl Insn {
    pub fn new(width: Width, text: impl Into<String>) -> Self {
        Self {
            width,
            text: Some(text.into()),
        }
    }

    pub fn unknown(width: Width) -> Self {
        Self { width, text: None }
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn is_known(&self) -> bool {
        self.text.is_some()
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.text())
    }
}
