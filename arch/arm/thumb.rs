//! Thumb state decoder (ARMv4T and ARMv5TE).

use armdis_core::{
    utils::{bit, sextract, zextract},
    Insn, Revision, Width,
};

use crate::consts::*;

const SHIFT_IMM: [&str; 3] = ["lsl", "lsr", "asr"];
const IMM8_OP: [&str; 4] = ["mov", "cmp", "add", "sub"];
const HI_REG_OP: [&str; 3] = ["add", "cmp", "mov"];

#[rustfmt::skip]
const ALU_OP: [&str; 16] = [
    "and", "eor", "lsl", "lsr", "asr", "adc", "sbc", "ror",
    "tst", "neg", "cmp", "cmn", "orr", "mul", "bic", "mvn",
];

#[rustfmt::skip]
const REG_OFFSET_OP: [&str; 8] = [
    "str", "strh", "strb", "ldrsb", "ldr", "ldrh", "ldrb", "ldrsh",
];

const BL_PREFIX: u32 = 0b11110;
const BL_SUFFIX: u32 = 0b11111;
const BLX_SUFFIX: u32 = 0b11101;

#[inline(always)]
fn bits(hw: u32, pos: u32, len: u32) -> u32 {
    zextract(hw, pos, len)
}

#[inline(always)]
fn lo(hw: u32, pos: u32) -> &'static str {
    reg(bits(hw, pos, 3))
}

/// Decode the prefetched word, only a `bl`/`blx` pair is wide.
pub fn decode(prefetch: u32, revision: Revision) -> Insn {
    let first = prefetch & 0xffff;
    let second = prefetch >> 16;

    if first >> 11 == BL_PREFIX {
        let name = match second >> 11 {
            BL_SUFFIX => "bl",
            BLX_SUFFIX if revision.has_v5te() => {
                if second & 1 != 0 {
                    return Insn::unknown(Width::Wide);
                }
                "blx"
            }
            _ => return Insn::unknown(Width::Narrow),
        };
        let high = sextract::<i32, _>(first, 0, 11) << 12;
        let low = (bits(second, 0, 11) << 1) as i32;
        return Insn::new(Width::Wide, format!("{name}\t{}", rel(high + low + 4)));
    }

    match decode16(first, revision) {
        Some(text) => Insn::new(Width::Narrow, text),
        None => Insn::unknown(Width::Narrow),
    }
}

fn decode16(hw: u32, revision: Revision) -> Option<String> {
    let insn = match hw >> 13 {
        0b000 if bits(hw, 11, 2) == 0b11 => {
            let name = if bit(hw, 9) { "sub" } else { "add" };
            let operand = if bit(hw, 10) {
                imm(bits(hw, 6, 3))
            } else {
                lo(hw, 6).to_owned()
            };
            format!("{name}\t{}, {}, {operand}", lo(hw, 0), lo(hw, 3))
        }
        0b000 => {
            let op = bits(hw, 11, 2);
            let amount = match bits(hw, 6, 5) {
                0 if op != 0 => 32,
                n => n,
            };
            let name = SHIFT_IMM[op as usize];
            format!("{name}\t{}, {}, {}", lo(hw, 0), lo(hw, 3), shift_amount(amount))
        }
        0b001 => {
            let name = IMM8_OP[bits(hw, 11, 2) as usize];
            format!("{name}\t{}, {}", lo(hw, 8), imm(bits(hw, 0, 8)))
        }
        0b010 => return decode_010(hw, revision),
        0b011 => {
            let byte = bit(hw, 12);
            let name = match (byte, bit(hw, 11)) {
                (false, false) => "str",
                (false, true) => "ldr",
                (true, false) => "strb",
                (true, true) => "ldrb",
            };
            let scale = if byte { 1 } else { 4 };
            let offset = imm(bits(hw, 6, 5) * scale);
            format!("{name}\t{}, [{}, {offset}]", lo(hw, 0), lo(hw, 3))
        }
        0b100 => {
            let name = if bit(hw, 11) { "ldr" } else { "str" };
            if bit(hw, 12) {
                let offset = imm(bits(hw, 0, 8) * 4);
                format!("{name}\t{}, [sp, {offset}]", lo(hw, 8))
            } else {
                let offset = imm(bits(hw, 6, 5) * 2);
                format!("{name}h\t{}, [{}, {offset}]", lo(hw, 0), lo(hw, 3))
            }
        }
        0b101 if bit(hw, 12) => return decode_misc(hw, revision),
        0b101 => {
            let base = if bit(hw, 11) { "sp" } else { "pc" };
            let offset = imm(bits(hw, 0, 8) * 4);
            format!("add\t{}, {base}, {offset}", lo(hw, 8))
        }
        0b110 if bit(hw, 12) => {
            let offset = imm(bits(hw, 0, 8));
            match bits(hw, 8, 4) {
                0b1110 => return None,
                0b1111 => format!("swi\t{}", offset.trim_start_matches('#')),
                cond => {
                    let offset = (sextract::<i32, _>(hw, 0, 8) << 1) + 4;
                    format!("b{}\t{}", COND[cond as usize], rel(offset))
                }
            }
        }
        0b110 => {
            let name = if bit(hw, 11) { "ldmia" } else { "stmia" };
            format!("{name}\t{}!, {}", lo(hw, 8), reg_list(bits(hw, 0, 8)))
        }
        _ if bits(hw, 11, 2) == 0 => {
            let offset = (sextract::<i32, _>(hw, 0, 11) << 1) + 4;
            format!("b\t{}", rel(offset))
        }
        // half of a bl/blx pair on its own
        _ => return None,
    };
    Some(insn)
}

fn decode_010(hw: u32, revision: Revision) -> Option<String> {
    let insn = match bits(hw, 10, 3) {
        0b000 => {
            let name = ALU_OP[bits(hw, 6, 4) as usize];
            format!("{name}\t{}, {}", lo(hw, 0), lo(hw, 3))
        }
        0b001 => {
            let rd = bits(hw, 0, 3) | bits(hw, 7, 1) << 3;
            let rm = reg(bits(hw, 3, 4));
            match bits(hw, 8, 2) {
                0b11 if !bit(hw, 7) => format!("bx\t{rm}"),
                0b11 if revision.has_v5te() => format!("blx\t{rm}"),
                0b11 => return None,
                op => format!("{}\t{}, {rm}", HI_REG_OP[op as usize], reg(rd)),
            }
        }
        0b010 | 0b011 => {
            let offset = imm(bits(hw, 0, 8) * 4);
            format!("ldr\t{}, [pc, {offset}]", lo(hw, 8))
        }
        _ => {
            let name = REG_OFFSET_OP[bits(hw, 9, 3) as usize];
            format!("{name}\t{}, [{}, {}]", lo(hw, 0), lo(hw, 3), lo(hw, 6))
        }
    };
    Some(insn)
}

/// Encodings starting with `1011`.
fn decode_misc(hw: u32, revision: Revision) -> Option<String> {
    let insn = match bits(hw, 8, 4) {
        0b0000 => {
            let name = if bit(hw, 7) { "sub" } else { "add" };
            format!("{name}\tsp, {}", imm(bits(hw, 0, 7) * 4))
        }
        0b0100 | 0b0101 => {
            let extra = if bit(hw, 8) { 1 << REG_LR } else { 0 };
            format!("push\t{}", reg_list(bits(hw, 0, 8) | extra))
        }
        0b1100 | 0b1101 => {
            let extra = if bit(hw, 8) { 1 << REG_PC } else { 0 };
            format!("pop\t{}", reg_list(bits(hw, 0, 8) | extra))
        }
        0b1110 if revision.has_v5te() => format!("bkpt\t0x{:02x}", bits(hw, 0, 8)),
        _ => return None,
    };
    Some(insn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrow(hw: u32) -> String {
        let insn = decode(hw, Revision::V5TE);
        assert_eq!(insn.width(), Width::Narrow);
        assert!(insn.is_known(), "failed to decode {hw:#06x}");
        insn.text().to_owned()
    }

    #[test]
    fn formats() {
        assert_eq!(narrow(0x2001), "mov\tr0, #1");
        assert_eq!(narrow(0x1888), "add\tr0, r1, r2");
        assert_eq!(narrow(0x0848), "lsr\tr0, r1, #1");
        assert_eq!(narrow(0x0808), "lsr\tr0, r1, #32");
        assert_eq!(narrow(0x0408), "lsl\tr0, r1, #16");
        assert_eq!(narrow(0x17c8), "asr\tr0, r1, #31");
        assert_eq!(narrow(0x4348), "mul\tr0, r1");
        assert_eq!(narrow(0x4770), "bx\tlr");
        assert_eq!(narrow(0x4801), "ldr\tr0, [pc, #4]");
        assert_eq!(narrow(0xb510), "push\t{r4, lr}");
        assert_eq!(narrow(0xbd10), "pop\t{r4, pc}");
        assert_eq!(narrow(0xd0fe), "beq\t.+0x0");
        assert_eq!(narrow(0xe7fe), "b\t.+0x0");
        assert_eq!(narrow(0xdf01), "swi\t1");
    }

    #[test]
    fn bl_pair() {
        let insn = decode(0xf800_f000, Revision::V4T);
        assert_eq!(insn.width(), Width::Wide);
        assert_eq!(insn.text(), "bl\t.+0x4");

        let insn = decode(0xe800_f000, Revision::V5TE);
        assert_eq!(insn.width(), Width::Wide);
        assert_eq!(insn.text(), "blx\t.+0x4");

        let insn = decode(0xe800_f000, Revision::V4T);
        assert_eq!(insn.width(), Width::Narrow);
        assert!(!insn.is_known());
    }

    #[test]
    fn lone_halves() {
        let insn = decode(0x2001_f000, Revision::V5TE);
        assert_eq!(insn, Insn::unknown(Width::Narrow));
        let insn = decode(0xf800, Revision::V5TE);
        assert_eq!(insn, Insn::unknown(Width::Narrow));
    }
}
