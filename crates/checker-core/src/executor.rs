//! The deterministic single-step transition function.
//!
//! Execution is split into two pure phases, so the property checker can run
//! between them: [`resolve_step`] fetches, decodes, and evaluates the ALU
//! without touching the state, and [`commit_step`] builds the successor
//! snapshot for the normal (non-forking) case. Neither phase mutates its
//! input.

use crate::alu::AluOp;
use crate::control::ControlSignals;
use crate::decoder::{DecodedInstruction, Decoder};
use crate::encoding::{is_word_access, Opcode};
use crate::fault::DecodeError;
use crate::image::InstructionImage;
use crate::state::{ArchitecturalState, DATA_MEMORY_BYTES};

/// Everything known about an instruction before any side effect happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStep {
    /// The decoded instruction at the state's pc.
    pub instr: DecodedInstruction,
    /// Control signals for the instruction's class.
    pub signals: ControlSignals,
    /// Refined ALU operation.
    pub alu_op: AluOp,
    /// Operand 1: `registers[rs1]`.
    pub operand_a: i32,
    /// The unmodified `registers[rs2]` value, captured before the ALU-source
    /// mux; stores write this value.
    pub store_value: i32,
    /// Operand 2 after the ALU-source mux (immediate or rs2).
    pub operand_b: i32,
    /// ALU result; doubles as the effective address for memory access.
    pub alu_result: i32,
}

/// Fetches and decodes the instruction at the state's pc and evaluates the
/// ALU over the state's operands.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the fetched word matches no assigned
/// opcode or carries an unassigned funct3 refinement.
pub fn resolve_step(
    state: &ArchitecturalState,
    image: &InstructionImage,
) -> Result<ResolvedStep, DecodeError> {
    let pc = state.pc();
    let word = image.fetch_word(pc);
    let instr = Decoder::decode(word, pc)?;
    let signals = ControlSignals::for_opcode(instr.opcode);
    let alu_op = AluOp::resolve(signals.alu_class, &instr, pc)?;

    let operand_a = state.register(instr.rs1);
    let store_value = state.register(instr.rs2);
    let operand_b = if signals.alu_src {
        instr.imm
    } else {
        store_value
    };

    Ok(ResolvedStep {
        instr,
        signals,
        alu_op,
        operand_a,
        store_value,
        operand_b,
        alu_result: alu_op.eval(operand_a, operand_b),
    })
}

/// Builds the deterministic successor snapshot for a resolved step.
///
/// Memory is only touched when the effective address lies inside the data
/// segment; the property checker has already rejected anything else before
/// successors are materialized. Byte stores deposit the low 8 bits of the
/// source register into the addressed word cell; byte loads mask the cell to
/// 8 bits. Jump-and-link writes the return address and takes the target
/// unconditionally through the branch mux (its ALU result is always zero).
#[must_use]
pub fn commit_step(state: &ArchitecturalState, step: &ResolvedStep) -> ArchitecturalState {
    let pc = state.pc();
    let mut next = state.clone();
    let word_sized = is_word_access(step.instr.funct3);

    let mut loaded = 0_i32;
    if step.signals.accesses_memory() {
        let address = step.alu_result;
        if address >= 0 && address < DATA_MEMORY_BYTES {
            let word_index = (address / 4) as usize;
            if step.signals.mem_write {
                let value = if word_sized {
                    step.store_value
                } else {
                    step.store_value & 0xFF
                };
                next.set_memory_word(word_index, value);
            } else {
                let cell = next.memory_word(word_index);
                loaded = if word_sized { cell } else { cell & 0xFF };
            }
        }
    }

    if step.signals.reg_write {
        let value = match step.instr.opcode {
            Opcode::Jal => pc.wrapping_add(4) as i32,
            _ if step.signals.mem_to_reg => loaded,
            _ => step.alu_result,
        };
        next.set_register(step.instr.rd, value);
    }

    let next_pc = if step.signals.branch && step.alu_result == 0 {
        pc.wrapping_add(step.instr.imm as u32)
    } else {
        pc.wrapping_add(4)
    };
    next.set_pc(next_pc);

    next
}
