use thiserror::Error;

/// Decode failures. These are fatal for the run that hit them: a path whose
/// instruction word matches no assigned encoding cannot be explored further,
/// and the whole search aborts with [`CheckError::Decode`] rather than a
/// verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodeError {
    /// The low 7 bits match no assigned opcode.
    #[error("unknown opcode {opcode:#04x} in word {word:#010x} at pc {pc:#x}")]
    UnknownOpcode {
        /// Raw 7-bit opcode field.
        opcode: u8,
        /// Full fetched instruction word.
        word: u32,
        /// Program counter of the fetch.
        pc: u32,
    },
    /// The opcode is assigned but the funct3 refinement is not.
    #[error("unsupported funct3 {funct3:#x} for word {word:#010x} at pc {pc:#x}")]
    UnsupportedFunct {
        /// Raw funct3 field.
        funct3: u8,
        /// Full fetched instruction word.
        word: u32,
        /// Program counter of the fetch.
        pc: u32,
    },
}

/// Safety-violation kinds used for diagnostics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SafetyKind {
    /// Memory access outside the data segment.
    OutOfBounds,
    /// Word-sized access to a non-4-aligned address.
    Misaligned,
    /// An always-true architectural invariant failed to hold.
    InvariantBroken,
}

/// Safety property violations. Any of these halts the whole search and is
/// reported with the offending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SafetyViolation {
    /// Memory access with an address outside `[0, capacity)`.
    #[error("memory access out of bounds at pc {pc:#x}: address {address}")]
    OutOfBounds {
        /// Computed byte address.
        address: i32,
        /// Program counter of the offending instruction.
        pc: u32,
    },
    /// Word-sized access whose address is not a multiple of 4.
    #[error("misaligned word access at pc {pc:#x}: address {address}")]
    Misaligned {
        /// Computed byte address.
        address: i32,
        /// Program counter of the offending instruction.
        pc: u32,
    },
    /// The hard-wired zero register held a non-zero value.
    #[error("register x0 corruption at pc {pc:#x}: value {value}")]
    RegisterZeroCorrupted {
        /// Observed x0 value.
        value: i32,
        /// Program counter of the state in which the corruption was seen.
        pc: u32,
    },
}

impl SafetyViolation {
    /// Returns the diagnostics kind for this violation.
    #[must_use]
    pub const fn kind(self) -> SafetyKind {
        match self {
            Self::OutOfBounds { .. } => SafetyKind::OutOfBounds,
            Self::Misaligned { .. } => SafetyKind::Misaligned,
            Self::RegisterZeroCorrupted { .. } => SafetyKind::InvariantBroken,
        }
    }

    /// Program counter of the state that produced the violation.
    #[must_use]
    pub const fn pc(self) -> u32 {
        match self {
            Self::OutOfBounds { pc, .. }
            | Self::Misaligned { pc, .. }
            | Self::RegisterZeroCorrupted { pc, .. } => pc,
        }
    }
}

/// Errors that abort a search without producing a verdict.
///
/// Safety and liveness failures are *verdicts*, not errors; only conditions
/// that make the search itself meaningless land here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CheckError {
    /// A reachable state fetched an undecodable instruction word.
    #[error("decode failed during exploration: {0}")]
    Decode(#[from] DecodeError),
}
