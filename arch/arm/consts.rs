use std::fmt::Write;

#[rustfmt::skip]
pub const REG_NAME: [&str; 16] = [
    "r0", "r1", "r2",  "r3",  "r4",  "r5", "r6", "r7",
    "r8", "r9", "r10", "r11", "r12", "sp", "lr", "pc",
];

/// Condition suffixes, `al` is implied and `nv` has no suffix.
#[rustfmt::skip]
pub const COND: [&str; 16] = [
    "eq", "ne", "cs", "cc", "mi", "pl", "vs", "vc",
    "hi", "ls", "ge", "lt", "gt", "le", "",   "",
];

pub const SHIFT: [&str; 4] = ["lsl", "lsr", "asr", "ror"];

pub const REG_LR: u32 = 14;
pub const REG_PC: u32 = 15;

pub fn reg(index: u32) -> &'static str {
    REG_NAME[index as usize & 15]
}

/// Immediate operand, small values are printed in decimal.
pub fn imm(value: u32) -> String {
    if value < 10 {
        format!("#{value}")
    } else {
        format!("#0x{value:x}")
    }
}

/// Shift amount, always decimal.
pub fn shift_amount(amount: u32) -> String {
    format!("#{amount}")
}

/// Immediate offset with the sign taken from the U bit.
pub fn offset_imm(up: bool, value: u32) -> String {
    let sign = if up { "" } else { "-" };
    if value < 10 {
        format!("#{sign}{value}")
    } else {
        format!("#{sign}0x{value:x}")
    }
}

/// Branch target relative to the address of the branch itself.
pub fn rel(offset: i32) -> String {
    if offset < 0 {
        format!(".-0x{:x}", offset.unsigned_abs())
    } else {
        format!(".+0x{offset:x}")
    }
}

pub fn reg_list(mask: u32) -> String {
    let mut out = String::from("{");
    for i in (0..16).filter(|i| mask & (1 << i) != 0) {
        if out.len() > 1 {
            out.push_str(", ");
        }
        out.push_str(reg(i));
    }
    out.push('}');
    out
}

/// Memory operand: `[rn, offset]{!}` or `[rn], offset`.
///
/// An empty `offset` is only valid for pre-indexed forms.
pub fn address(rn: &str, pre: bool, writeback: bool, offset: &str) -> String {
    let mut out = String::new();
    if pre {
        if offset.is_empty() {
            write!(out, "[{rn}]").ok();
        } else {
            write!(out, "[{rn}, {offset}]").ok();
        }
        if writeback {
            out.push('!');
        }
    } else {
        write!(out, "[{rn}], {offset}").ok();
    }
    out
}
