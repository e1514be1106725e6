//! ALU decoder and evaluation.

use crate::control::AluClass;
use crate::decoder::DecodedInstruction;
use crate::encoding::Opcode;
use crate::fault::DecodeError;

/// Concrete arithmetic/logic operation after funct3 refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AluOp {
    /// `a + b` (wrapping).
    Add,
    /// `a - b` (wrapping); a zero result drives the branch predicate.
    Sub,
    /// `a | b`.
    Or,
    /// `a ^ b`.
    Xor,
    /// Arithmetic right shift by the low 5 bits of `b`.
    Sra,
    /// Pass operand 2 through unchanged (load-upper-immediate).
    PassOperand,
    /// No operation; the result is 0 (jump-and-link).
    Nop,
}

impl AluOp {
    /// Refines the coarse class plus funct3 into a concrete operation.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnsupportedFunct`] for a funct3 value with no
    /// assigned operation in the Compute class. The other classes carry a
    /// fixed operation and cannot fail.
    pub const fn resolve(
        class: AluClass,
        instr: &DecodedInstruction,
        pc: u32,
    ) -> Result<Self, DecodeError> {
        match class {
            AluClass::Compute => {
                // LUI bypasses the funct3 refinement entirely.
                if matches!(instr.opcode, Opcode::Lui) {
                    return Ok(Self::PassOperand);
                }
                match instr.funct3 {
                    0x0 => Ok(Self::Add),
                    0x4 => Ok(Self::Xor),
                    0x5 => Ok(Self::Sra),
                    0x6 => Ok(Self::Or),
                    funct3 => Err(DecodeError::UnsupportedFunct {
                        funct3,
                        word: instr.raw,
                        pc,
                    }),
                }
            }
            AluClass::Address => Ok(Self::Add),
            AluClass::Compare => Ok(Self::Sub),
            AluClass::Jump => Ok(Self::Nop),
        }
    }

    /// Evaluates the operation over two signed 32-bit operands.
    ///
    /// Shift amounts are masked to 5 bits; additions and subtractions wrap,
    /// matching the fixed-width datapath.
    #[must_use]
    pub const fn eval(self, a: i32, b: i32) -> i32 {
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Or => a | b,
            Self::Xor => a ^ b,
            Self::Sra => a >> (b & 0x1F),
            Self::PassOperand => b,
            Self::Nop => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AluOp;
    use crate::control::AluClass;
    use crate::decoder::{DecodedInstruction, Decoder};
    use crate::encoding::Opcode;
    use crate::fault::DecodeError;

    fn compute_instr(opcode: Opcode, funct3: u8) -> DecodedInstruction {
        let template = DecodedInstruction {
            opcode,
            rd: 1,
            rs1: 2,
            rs2: 3,
            funct3,
            funct7: 0,
            imm: 0,
            raw: 0,
        };
        Decoder::decode(template.encode(), 0).expect("template must decode")
    }

    #[test]
    fn compute_class_refines_by_funct3() {
        let cases = [
            (0x0, AluOp::Add),
            (0x4, AluOp::Xor),
            (0x5, AluOp::Sra),
            (0x6, AluOp::Or),
        ];
        for (funct3, expected) in cases {
            let instr = compute_instr(Opcode::RType, funct3);
            let op = AluOp::resolve(AluClass::Compute, &instr, 0).expect("assigned funct3");
            assert_eq!(op, expected);
        }
    }

    #[test]
    fn unassigned_compute_funct3_is_a_decode_error() {
        for funct3 in [0x1, 0x2, 0x3, 0x7] {
            let instr = compute_instr(Opcode::RType, funct3);
            let err = AluOp::resolve(AluClass::Compute, &instr, 16).expect_err("must fault");
            assert_eq!(
                err,
                DecodeError::UnsupportedFunct {
                    funct3,
                    word: instr.raw,
                    pc: 16,
                }
            );
        }
    }

    #[test]
    fn lui_overrides_funct3_refinement() {
        let instr = compute_instr(Opcode::Lui, 0x7);
        let op = AluOp::resolve(AluClass::Compute, &instr, 0).expect("LUI always resolves");
        assert_eq!(op, AluOp::PassOperand);
        assert_eq!(op.eval(123, 0x5000), 0x5000);
    }

    #[test]
    fn fixed_classes_resolve_without_funct3() {
        let instr = compute_instr(Opcode::Load, 0x2);
        assert_eq!(
            AluOp::resolve(AluClass::Address, &instr, 0),
            Ok(AluOp::Add)
        );
        assert_eq!(
            AluOp::resolve(AluClass::Compare, &instr, 0),
            Ok(AluOp::Sub)
        );
        assert_eq!(AluOp::resolve(AluClass::Jump, &instr, 0), Ok(AluOp::Nop));
    }

    #[test]
    fn eval_matches_operation_semantics() {
        assert_eq!(AluOp::Add.eval(40, 2), 42);
        assert_eq!(AluOp::Add.eval(i32::MAX, 1), i32::MIN);
        assert_eq!(AluOp::Sub.eval(7, 7), 0);
        assert_eq!(AluOp::Or.eval(0b1010, 0b0101), 0b1111);
        assert_eq!(AluOp::Xor.eval(0b1100, 0b1010), 0b0110);
        assert_eq!(AluOp::Nop.eval(99, -7), 0);
    }

    #[test]
    fn sra_is_arithmetic_and_masks_the_amount() {
        assert_eq!(AluOp::Sra.eval(-8, 1), -4);
        assert_eq!(AluOp::Sra.eval(16, 2), 4);
        // Amount 33 masks to 1.
        assert_eq!(AluOp::Sra.eval(16, 33), 8);
        // Negative amount masks into range instead of being undefined.
        assert_eq!(AluOp::Sra.eval(16, -31), 8);
    }
}
