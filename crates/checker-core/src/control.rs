//! Control unit: the per-opcode datapath signal table.

use crate::encoding::Opcode;

/// Coarse ALU operation class forwarded to the ALU decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AluClass {
    /// R-type / I-type / U-type arithmetic, refined by funct3.
    Compute,
    /// Load/store address computation (always add).
    Address,
    /// Branch comparison (subtract; zero flag is the predicate).
    Compare,
    /// Jump: the ALU result is unused.
    Jump,
}

/// Decoded per-instruction-class datapath control signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ControlSignals {
    /// Destination register write enable.
    pub reg_write: bool,
    /// Selects the immediate (true) or rs2 (false) as ALU operand 2.
    pub alu_src: bool,
    /// Enables the branch next-pc mux.
    pub branch: bool,
    /// Data memory read enable.
    pub mem_read: bool,
    /// Data memory write enable.
    pub mem_write: bool,
    /// Selects loaded data (true) or the ALU result (false) for writeback.
    pub mem_to_reg: bool,
    /// Coarse ALU operation class.
    pub alu_class: AluClass,
}

impl ControlSignals {
    /// Looks up the fixed control-signal tuple for an opcode.
    ///
    /// The table is total over [`Opcode`]: unassigned encodings are rejected
    /// earlier, at classification, so there is no default row.
    #[must_use]
    pub const fn for_opcode(opcode: Opcode) -> Self {
        match opcode {
            Opcode::RType => Self {
                reg_write: true,
                alu_src: false,
                branch: false,
                mem_read: false,
                mem_write: false,
                mem_to_reg: false,
                alu_class: AluClass::Compute,
            },
            Opcode::IType | Opcode::Lui => Self {
                reg_write: true,
                alu_src: true,
                branch: false,
                mem_read: false,
                mem_write: false,
                mem_to_reg: false,
                alu_class: AluClass::Compute,
            },
            Opcode::Load => Self {
                reg_write: true,
                alu_src: true,
                branch: false,
                mem_read: true,
                mem_write: false,
                mem_to_reg: true,
                alu_class: AluClass::Address,
            },
            Opcode::Store => Self {
                reg_write: false,
                alu_src: true,
                branch: false,
                mem_read: false,
                mem_write: true,
                mem_to_reg: false,
                alu_class: AluClass::Address,
            },
            Opcode::Jal => Self {
                reg_write: true,
                alu_src: false,
                branch: true,
                mem_read: false,
                mem_write: false,
                mem_to_reg: false,
                alu_class: AluClass::Jump,
            },
            Opcode::Beq => Self {
                reg_write: false,
                alu_src: false,
                branch: true,
                mem_read: false,
                mem_write: false,
                mem_to_reg: false,
                alu_class: AluClass::Compare,
            },
        }
    }

    /// Returns true when this instruction touches data memory.
    #[must_use]
    pub const fn accesses_memory(self) -> bool {
        self.mem_read || self.mem_write
    }
}
