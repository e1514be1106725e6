//! Instruction decoder: field extraction and per-format immediate assembly.
//!
//! All fields come out of explicit shift/mask arithmetic on the composed
//! 32-bit word. Immediates are sign-extended from their natural width with a
//! shift pair rather than per-bit concatenation.

use crate::encoding::{opcode_field, Opcode};
use crate::fault::DecodeError;

/// A fully decoded instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodedInstruction {
    /// Instruction-class opcode.
    pub opcode: Opcode,
    /// Destination register index (bits 11:7).
    pub rd: u8,
    /// First source register index (bits 19:15).
    pub rs1: u8,
    /// Second source register index (bits 24:20).
    pub rs2: u8,
    /// funct3 field (bits 14:12).
    pub funct3: u8,
    /// funct7 field (bits 31:25).
    pub funct7: u8,
    /// Sign-extended immediate for the opcode's format (0 for R-type).
    pub imm: i32,
    /// The raw composed instruction word.
    pub raw: u32,
}

/// Sign-extends the low `bits` bits of `value`.
const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Assembles the format-specific immediate for an already classified word.
const fn immediate_for(opcode: Opcode, word: u32) -> i32 {
    match opcode {
        Opcode::RType => 0,
        // I and L formats share bits 31:20.
        Opcode::IType | Opcode::Load => (word as i32) >> 20,
        Opcode::Lui => (word & 0xFFFF_F000) as i32,
        Opcode::Store => {
            let value = ((word >> 25) << 5) | ((word >> 7) & 0x1F);
            sign_extend(value, 12)
        }
        Opcode::Beq => {
            let value = (((word >> 31) & 0x1) << 12)
                | (((word >> 7) & 0x1) << 11)
                | (((word >> 25) & 0x3F) << 5)
                | (((word >> 8) & 0xF) << 1);
            sign_extend(value, 13)
        }
        Opcode::Jal => {
            let value = (((word >> 31) & 0x1) << 20)
                | (((word >> 12) & 0xFF) << 12)
                | (((word >> 20) & 0x1) << 11)
                | (((word >> 21) & 0x3FF) << 1);
            sign_extend(value, 21)
        }
    }
}

/// Instruction decoder for the supported RV32 subset.
pub struct Decoder;

impl Decoder {
    /// Decodes a composed 32-bit instruction word fetched at `pc`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownOpcode`] when the low 7 bits match no
    /// assigned opcode. There is no silent-default path: every word either
    /// decodes fully or faults.
    pub fn decode(word: u32, pc: u32) -> Result<DecodedInstruction, DecodeError> {
        let bits = opcode_field(word);
        let Some(opcode) = Opcode::from_bits(bits) else {
            return Err(DecodeError::UnknownOpcode {
                opcode: bits,
                word,
                pc,
            });
        };

        Ok(DecodedInstruction {
            opcode,
            rd: ((word >> 7) & 0x1F) as u8,
            rs1: ((word >> 15) & 0x1F) as u8,
            rs2: ((word >> 20) & 0x1F) as u8,
            funct3: ((word >> 12) & 0x7) as u8,
            funct7: ((word >> 25) & 0x7F) as u8,
            imm: immediate_for(opcode, word),
            raw: word,
        })
    }
}

impl DecodedInstruction {
    /// Re-encodes this instruction back to a raw 32-bit word.
    ///
    /// Inverse of [`Decoder::decode`] for every supported format; used by
    /// tests and the fuzz harness to build instruction images without an
    /// external assembler.
    #[must_use]
    pub const fn encode(self) -> u32 {
        let opcode = self.opcode.bits() as u32;
        let rd = (self.rd as u32) << 7;
        let rs1 = (self.rs1 as u32) << 15;
        let rs2 = (self.rs2 as u32) << 20;
        let funct3 = (self.funct3 as u32) << 12;
        let funct7 = (self.funct7 as u32) << 25;
        let imm = self.imm as u32;

        match self.opcode {
            Opcode::RType => funct7 | rs2 | rs1 | funct3 | rd | opcode,
            Opcode::IType | Opcode::Load => ((imm & 0xFFF) << 20) | rs1 | funct3 | rd | opcode,
            Opcode::Lui => (imm & 0xFFFF_F000) | rd | opcode,
            Opcode::Store => {
                (((imm >> 5) & 0x7F) << 25) | rs2 | rs1 | funct3 | ((imm & 0x1F) << 7) | opcode
            }
            Opcode::Beq => {
                (((imm >> 12) & 0x1) << 31)
                    | (((imm >> 5) & 0x3F) << 25)
                    | rs2
                    | rs1
                    | funct3
                    | (((imm >> 1) & 0xF) << 8)
                    | (((imm >> 11) & 0x1) << 7)
                    | opcode
            }
            Opcode::Jal => {
                (((imm >> 20) & 0x1) << 31)
                    | (((imm >> 1) & 0x3FF) << 21)
                    | (((imm >> 11) & 0x1) << 20)
                    | (((imm >> 12) & 0xFF) << 12)
                    | rd
                    | opcode
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodedInstruction, Decoder};
    use crate::encoding::Opcode;
    use crate::fault::DecodeError;
    use rstest::rstest;

    fn instr(opcode: Opcode, rd: u8, rs1: u8, rs2: u8, funct3: u8, imm: i32) -> DecodedInstruction {
        DecodedInstruction {
            opcode,
            rd,
            rs1,
            rs2,
            funct3,
            funct7: 0,
            imm,
            raw: 0,
        }
    }

    #[test]
    fn decode_addi_x1_x0_42() {
        // addi x1, x0, 42
        let decoded = Decoder::decode(0x02A0_0093, 0).expect("valid I-type word");
        assert_eq!(decoded.opcode, Opcode::IType);
        assert_eq!(decoded.rd, 1);
        assert_eq!(decoded.rs1, 0);
        assert_eq!(decoded.funct3, 0);
        assert_eq!(decoded.imm, 42);
    }

    #[test]
    fn unknown_opcode_faults_with_context() {
        let err = Decoder::decode(0x0000_007F, 12).expect_err("0x7f is unassigned");
        assert_eq!(
            err,
            DecodeError::UnknownOpcode {
                opcode: 0x7F,
                word: 0x0000_007F,
                pc: 12,
            }
        );
    }

    #[test]
    fn r_type_roundtrip_recovers_fields() {
        let original = instr(Opcode::RType, 5, 1, 2, 0, 0);
        let decoded = Decoder::decode(original.encode(), 0).expect("encoded word must decode");
        assert_eq!(decoded.opcode, Opcode::RType);
        assert_eq!(decoded.rd, 5);
        assert_eq!(decoded.rs1, 1);
        assert_eq!(decoded.rs2, 2);
        assert_eq!(decoded.funct3, 0);
        assert_eq!(decoded.imm, 0);
    }

    #[rstest]
    #[case::i_positive(Opcode::IType, 0x6, 100)]
    #[case::i_negative(Opcode::IType, 0x0, -1)]
    #[case::i_min(Opcode::IType, 0x0, -2048)]
    #[case::load_word(Opcode::Load, 0x2, 8)]
    #[case::store_negative(Opcode::Store, 0x2, -4)]
    #[case::branch_forward(Opcode::Beq, 0x0, 8)]
    #[case::branch_backward(Opcode::Beq, 0x0, -16)]
    #[case::jump_forward(Opcode::Jal, 0x0, 2048)]
    #[case::jump_backward(Opcode::Jal, 0x0, -8)]
    fn immediate_roundtrips_per_format(
        #[case] opcode: Opcode,
        #[case] funct3: u8,
        #[case] imm: i32,
    ) {
        let original = instr(opcode, 3, 4, 5, funct3, imm);
        let decoded = Decoder::decode(original.encode(), 0).expect("encoded word must decode");
        assert_eq!(decoded.opcode, opcode);
        assert_eq!(decoded.imm, imm, "{opcode:?} immediate must survive encode");
    }

    #[test]
    fn lui_immediate_is_upper_twenty_bits() {
        let original = instr(Opcode::Lui, 7, 0, 0, 0, 0x12345 << 12);
        let decoded = Decoder::decode(original.encode(), 0).expect("encoded word must decode");
        assert_eq!(decoded.imm, 0x12345 << 12);
        assert_eq!(decoded.rd, 7);
    }

    #[test]
    fn branch_immediate_has_zero_low_bit() {
        // beq x0, x0, +8 encodes imm[0] implicitly as zero.
        let word = instr(Opcode::Beq, 0, 0, 0, 0, 8).encode();
        let decoded = Decoder::decode(word, 0).expect("valid B-type word");
        assert_eq!(decoded.imm % 2, 0);
        assert_eq!(decoded.imm, 8);
    }
}
