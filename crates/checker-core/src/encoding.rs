//! Closed opcode enumeration and the assigned 7-bit encoding table.

/// Supported instruction-class opcodes, keyed by the low 7 bits of the word.
///
/// Any 7-bit value not present in [`OPCODE_TABLE`] is illegal by definition
/// and decodes to a fault rather than a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Opcode {
    /// Register-register arithmetic (`0b011_0011`).
    RType,
    /// Register-immediate arithmetic (`0b001_0011`).
    IType,
    /// Load upper immediate (`0b011_0111`).
    Lui,
    /// Byte/word load (`0b000_0011`).
    Load,
    /// Byte/word store (`0b010_0011`).
    Store,
    /// Unconditional jump-and-link (`0b110_1111`).
    Jal,
    /// Equality branch (`0b110_0011`).
    Beq,
}

/// Single source-of-truth assigned opcode table.
///
/// Every decode decision about the low 7 bits goes through this table.
pub const OPCODE_TABLE: &[(u8, Opcode)] = &[
    (0b011_0011, Opcode::RType),
    (0b001_0011, Opcode::IType),
    (0b011_0111, Opcode::Lui),
    (0b000_0011, Opcode::Load),
    (0b010_0011, Opcode::Store),
    (0b110_1111, Opcode::Jal),
    (0b110_0011, Opcode::Beq),
];

impl Opcode {
    /// Classifies a 7-bit opcode field value.
    ///
    /// `None` means the encoding is unassigned and must fault.
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        OPCODE_TABLE
            .iter()
            .find_map(|(value, opcode)| (*value == bits).then_some(*opcode))
    }

    /// Returns the canonical 7-bit field value for this opcode.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::RType => 0b011_0011,
            Self::IType => 0b001_0011,
            Self::Lui => 0b011_0111,
            Self::Load => 0b000_0011,
            Self::Store => 0b010_0011,
            Self::Jal => 0b110_1111,
            Self::Beq => 0b110_0011,
        }
    }
}

/// Extracts the 7-bit opcode field from a raw instruction word.
#[must_use]
pub const fn opcode_field(word: u32) -> u8 {
    (word & 0x7F) as u8
}

/// Returns true when a memory access encoding is word-sized (`funct3 == 2`).
///
/// Anything else in the Load/Store class is treated as a byte access.
#[must_use]
pub const fn is_word_access(funct3: u8) -> bool {
    funct3 == 0x2
}
