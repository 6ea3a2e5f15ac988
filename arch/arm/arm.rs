//! 32-bit ARM state decoder (ARMv4T and ARMv5TE).

use armdis_core::{
    utils::{bit, sextract, zextract},
    Revision,
};

use crate::consts::*;

#[rustfmt::skip]
const DATA_PROCESSING: [&str; 16] = [
    "and", "eor", "sub", "rsb", "add", "adc", "sbc", "rsc",
    "tst", "teq", "cmp", "cmn", "orr", "mov", "bic", "mvn",
];

const BLOCK_MODE: [&str; 4] = ["da", "ia", "db", "ib"];

#[inline(always)]
fn bits(word: u32, pos: u32, len: u32) -> u32 {
    zextract(word, pos, len)
}

#[inline(always)]
fn r(word: u32, pos: u32) -> &'static str {
    reg(bits(word, pos, 4))
}

fn s_suffix(word: u32) -> &'static str {
    if bit(word, 20) {
        "s"
    } else {
        ""
    }
}

fn psr(word: u32) -> &'static str {
    if bit(word, 22) {
        "spsr"
    } else {
        "cpsr"
    }
}

/// Status register with the field mask of `msr`.
fn psr_fields(word: u32) -> String {
    let mut out = String::from(psr(word));
    let mask = bits(word, 16, 4);
    if mask != 0 {
        out.push('_');
        for (i, c) in [(3, 'f'), (2, 's'), (1, 'x'), (0, 'c')] {
            if mask & (1 << i) != 0 {
                out.push(c);
            }
        }
    }
    out
}

/// Register form of the shifter operand, bit 4 selects a register shift.
fn shifter(word: u32) -> String {
    let rm = r(word, 0);
    let ty = bits(word, 5, 2);
    if bit(word, 4) {
        return format!("{rm}, {} {}", SHIFT[ty as usize], r(word, 8));
    }
    match (ty, bits(word, 7, 5)) {
        (0, 0) => rm.to_owned(),
        (3, 0) => format!("{rm}, rrx"),
        (1 | 2, 0) => format!("{rm}, {} {}", SHIFT[ty as usize], shift_amount(32)),
        (_, amount) => format!("{rm}, {} {}", SHIFT[ty as usize], shift_amount(amount)),
    }
}

fn rotated_imm(word: u32) -> u32 {
    bits(word, 0, 8).rotate_right(bits(word, 8, 4) * 2)
}

pub fn decode(word: u32, revision: Revision) -> Option<String> {
    let cond = bits(word, 28, 4);
    if cond == 0b1111 {
        return if revision.has_v5te() {
            decode_unconditional(word)
        } else {
            None
        };
    }

    let c = COND[cond as usize];
    match bits(word, 25, 3) {
        0b000 => decode_000(word, c, revision),
        0b001 => decode_001(word, c),
        0b010 => Some(decode_load_store(word, c)),
        0b011 if bit(word, 4) => None,
        0b011 => Some(decode_load_store(word, c)),
        0b100 => Some(decode_block(word, c)),
        0b101 => Some(decode_branch(word, c)),
        0b110 => decode_coproc_transfer(word, c, false, revision),
        _ => Some(decode_111(word, c)),
    }
}

fn decode_000(word: u32, c: &str, revision: Revision) -> Option<String> {
    if bit(word, 7) && bit(word, 4) {
        if bits(word, 5, 2) != 0 {
            decode_extra_load_store(word, c, revision)
        } else if bits(word, 24, 4) == 0 {
            decode_multiply(word, c)
        } else if bits(word, 23, 5) == 0b00010 && bits(word, 20, 2) == 0 {
            let b = if bit(word, 22) { "b" } else { "" };
            Some(format!(
                "swp{c}{b}\t{}, {}, [{}]",
                r(word, 12),
                r(word, 0),
                r(word, 16)
            ))
        } else {
            None
        }
    } else if bits(word, 23, 2) == 0b10 && !bit(word, 20) {
        decode_misc(word, c, revision)
    } else {
        Some(decode_data_processing(word, c, shifter(word)))
    }
}

fn decode_001(word: u32, c: &str) -> Option<String> {
    if bits(word, 23, 2) == 0b10 && !bit(word, 20) {
        if !bit(word, 21) {
            return None;
        }
        let value = imm(rotated_imm(word));
        return Some(format!("msr{c}\t{}, {value}", psr_fields(word)));
    }
    Some(decode_data_processing(word, c, imm(rotated_imm(word))))
}

fn decode_data_processing(word: u32, c: &str, op2: String) -> String {
    let op = bits(word, 21, 4);
    let name = DATA_PROCESSING[op as usize];
    let rd = r(word, 12);
    let rn = r(word, 16);
    match op {
        // S is always set here, the clear form is decoded as miscellaneous
        0b1000..=0b1011 => format!("{name}{c}\t{rn}, {op2}"),
        0b1101 | 0b1111 => format!("{name}{c}{}\t{rd}, {op2}", s_suffix(word)),
        _ => format!("{name}{c}{}\t{rd}, {rn}, {op2}", s_suffix(word)),
    }
}

fn decode_multiply(word: u32, c: &str) -> Option<String> {
    let s = s_suffix(word);
    let rm = r(word, 0);
    let rs = r(word, 8);
    if !bit(word, 23) {
        let rd = r(word, 16);
        return match bits(word, 21, 2) {
            0b00 => Some(format!("mul{c}{s}\t{rd}, {rm}, {rs}")),
            0b01 => Some(format!("mla{c}{s}\t{rd}, {rm}, {rs}, {}", r(word, 12))),
            _ => None,
        };
    }
    let name = match bits(word, 21, 2) {
        0b00 => "umull",
        0b01 => "umlal",
        0b10 => "smull",
        _ => "smlal",
    };
    Some(format!(
        "{name}{c}{s}\t{}, {}, {rm}, {rs}",
        r(word, 12),
        r(word, 16)
    ))
}

fn decode_extra_load_store(word: u32, c: &str, revision: Revision) -> Option<String> {
    let load = bit(word, 20);
    let (name, suffix) = match (load, bits(word, 5, 2)) {
        (true, 0b01) => ("ldr", "h"),
        (true, 0b10) => ("ldr", "sb"),
        (true, _) => ("ldr", "sh"),
        (false, 0b01) => ("str", "h"),
        (false, 0b10) if revision.has_v5te() => ("ldr", "d"),
        (false, 0b11) if revision.has_v5te() => ("str", "d"),
        _ => return None,
    };

    let pre = bit(word, 24);
    let up = bit(word, 23);
    let writeback = bit(word, 21);
    if !pre && writeback {
        return None;
    }

    let offset = if bit(word, 22) {
        let value = bits(word, 8, 4) << 4 | bits(word, 0, 4);
        if pre && value == 0 {
            String::new()
        } else {
            offset_imm(up, value)
        }
    } else {
        let sign = if up { "" } else { "-" };
        format!("{sign}{}", r(word, 0))
    };

    let addr = address(r(word, 16), pre, writeback, &offset);
    Some(format!("{name}{c}{suffix}\t{}, {addr}", r(word, 12)))
}

fn decode_misc(word: u32, c: &str, revision: Revision) -> Option<String> {
    let v5 = revision.has_v5te();
    let op = bits(word, 21, 2);
    let rd = r(word, 12);
    let rm = r(word, 0);
    let rn = r(word, 16);
    let insn = match bits(word, 4, 4) {
        0b0000 if op & 1 == 0 => format!("mrs{c}\t{rd}, {}", psr(word)),
        0b0000 => format!("msr{c}\t{}, {rm}", psr_fields(word)),
        0b0001 if op == 0b01 => format!("bx{c}\t{rm}"),
        0b0001 if op == 0b11 && v5 => format!("clz{c}\t{rd}, {rm}"),
        0b0011 if op == 0b01 && v5 => format!("blx{c}\t{rm}"),
        0b0101 if v5 => {
            let name = ["qadd", "qsub", "qdadd", "qdsub"][op as usize];
            format!("{name}{c}\t{rd}, {rm}, {rn}")
        }
        0b0111 if op == 0b01 && v5 => {
            let value = bits(word, 8, 12) << 4 | bits(word, 0, 4);
            format!("bkpt\t0x{value:04x}")
        }
        x if x & 0b1001 == 0b1000 && v5 => {
            let xy = |pos| if bit(word, pos) { "t" } else { "b" };
            let rs = r(word, 8);
            match op {
                0b00 => format!("smla{}{}{c}\t{rn}, {rm}, {rs}, {rd}", xy(5), xy(6)),
                0b01 if !bit(word, 5) => format!("smlaw{}{c}\t{rn}, {rm}, {rs}, {rd}", xy(6)),
                0b01 => format!("smulw{}{c}\t{rn}, {rm}, {rs}", xy(6)),
                0b10 => format!("smlal{}{}{c}\t{rd}, {rn}, {rm}, {rs}", xy(5), xy(6)),
                _ => format!("smul{}{}{c}\t{rn}, {rm}, {rs}", xy(5), xy(6)),
            }
        }
        _ => return None,
    };
    Some(insn)
}

fn decode_load_store(word: u32, c: &str) -> String {
    let pre = bit(word, 24);
    let up = bit(word, 23);
    let writeback = bit(word, 21);
    let name = if bit(word, 20) { "ldr" } else { "str" };
    let b = if bit(word, 22) { "b" } else { "" };
    let t = if !pre && writeback { "t" } else { "" };

    let offset = if bit(word, 25) {
        let sign = if up { "" } else { "-" };
        format!("{sign}{}", shifter(word))
    } else {
        let value = bits(word, 0, 12);
        if pre && value == 0 {
            String::new()
        } else {
            offset_imm(up, value)
        }
    };

    let addr = address(r(word, 16), pre, pre && writeback, &offset);
    format!("{name}{c}{b}{t}\t{}, {addr}", r(word, 12))
}

fn decode_block(word: u32, c: &str) -> String {
    let name = if bit(word, 20) { "ldm" } else { "stm" };
    let mode = BLOCK_MODE[bits(word, 23, 2) as usize];
    let wb = if bit(word, 21) { "!" } else { "" };
    let user = if bit(word, 22) { "^" } else { "" };
    let list = reg_list(bits(word, 0, 16));
    format!("{name}{c}{mode}\t{}{wb}, {list}{user}", r(word, 16))
}

fn decode_branch(word: u32, c: &str) -> String {
    let l = if bit(word, 24) { "l" } else { "" };
    let offset = (sextract::<i32, _>(word, 0, 24) << 2) + 8;
    format!("b{l}{c}\t{}", rel(offset))
}

fn decode_111(word: u32, c: &str) -> String {
    if bit(word, 24) {
        format!("swi{c}\t0x{:x}", bits(word, 0, 24))
    } else {
        decode_coproc(word, c, false)
    }
}

fn decode_coproc(word: u32, c: &str, two: bool) -> String {
    let two = if two { "2" } else { "" };
    let cp = bits(word, 8, 4);
    let crn = bits(word, 16, 4);
    let crm = bits(word, 0, 4);
    let op2 = bits(word, 5, 3);
    if bit(word, 4) {
        let name = if bit(word, 20) { "mrc" } else { "mcr" };
        let op1 = bits(word, 21, 3);
        let rd = r(word, 12);
        format!("{name}{two}{c}\tp{cp}, {op1}, {rd}, c{crn}, c{crm}, {op2}")
    } else {
        let op1 = bits(word, 20, 4);
        let crd = bits(word, 12, 4);
        format!("cdp{two}{c}\tp{cp}, {op1}, c{crd}, c{crn}, c{crm}, {op2}")
    }
}

fn decode_coproc_transfer(word: u32, c: &str, two: bool, revision: Revision) -> Option<String> {
    let load = bit(word, 20);
    let pre = bit(word, 24);
    let up = bit(word, 23);
    let writeback = bit(word, 21);
    let cp = bits(word, 8, 4);

    if !pre && !up && !writeback {
        if two || !bit(word, 22) || !revision.has_v5te() {
            return None;
        }
        let name = if load { "mrrc" } else { "mcrr" };
        return Some(format!(
            "{name}{c}\tp{cp}, {}, {}, {}, c{}",
            bits(word, 4, 4),
            r(word, 12),
            r(word, 16),
            bits(word, 0, 4)
        ));
    }

    let name = if load { "ldc" } else { "stc" };
    let two = if two { "2" } else { "" };
    let l = if bit(word, 22) { "l" } else { "" };
    let rn = r(word, 16);
    let value = bits(word, 0, 8);
    let addr = if !pre && !writeback {
        format!("[{rn}], {{{value}}}")
    } else if pre && value == 0 {
        address(rn, pre, writeback, "")
    } else {
        address(rn, pre, writeback, &offset_imm(up, value * 4))
    };
    Some(format!(
        "{name}{two}{c}{l}\tp{cp}, c{}, {addr}",
        bits(word, 12, 4)
    ))
}

/// Encodings with the condition field set to `0b1111`.
fn decode_unconditional(word: u32) -> Option<String> {
    if word & 0xfd70_f000 == 0xf550_f000 {
        let up = bit(word, 23);
        let rn = r(word, 16);
        let offset = if bit(word, 25) {
            if bit(word, 4) {
                return None;
            }
            let sign = if up { "" } else { "-" };
            format!("{sign}{}", shifter(word))
        } else {
            match bits(word, 0, 12) {
                0 => String::new(),
                value => offset_imm(up, value),
            }
        };
        return Some(format!("pld\t{}", address(rn, true, false, &offset)));
    }

    match bits(word, 25, 3) {
        0b101 => {
            let h = (bits(word, 24, 1) << 1) as i32;
            let offset = (sextract::<i32, _>(word, 0, 24) << 2) + h + 8;
            Some(format!("blx\t{}", rel(offset)))
        }
        0b110 => decode_coproc_transfer(word, "", true, Revision::V5TE),
        0b111 if !bit(word, 24) => Some(decode_coproc(word, "", true)),
        _ => None,
    }
}
