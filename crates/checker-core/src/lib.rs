//! Core crate for Statewalk: a single-cycle RV32-subset emulator and an
//! explicit-state model checker over it.
//!
//! The emulator half is the deterministic transition function (fetch,
//! decode, control, ALU, commit); the checker half drives that function
//! non-deterministically, deduplicates visited states, and evaluates safety
//! and liveness over the whole reachable state graph.

/// Closed opcode enumeration and the assigned encoding table.
pub mod encoding;
pub use encoding::{is_word_access, opcode_field, Opcode, OPCODE_TABLE};

/// Instruction decode with per-format immediate assembly.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder};

/// Per-opcode datapath control signals.
pub mod control;
pub use control::{AluClass, ControlSignals};

/// ALU operation refinement and evaluation.
pub mod alu;
pub use alu::AluOp;

/// Architectural machine state: the unit of search identity.
pub mod state;
pub use state::{ArchitecturalState, DATA_MEMORY_BYTES, DATA_MEMORY_WORDS, REGISTER_COUNT};

/// Fixed-capacity instruction image and trace-file parsing.
pub mod image;
pub use image::{InstructionImage, IMAGE_CAPACITY_BYTES};

/// The deterministic single-step transition function.
pub mod executor;
pub use executor::{commit_step, resolve_step, ResolvedStep};

/// Safety-property evaluation.
pub mod props;
pub use props::PropertyChecker;

/// Non-deterministic successor enumeration.
pub mod transition;
pub use transition::TransitionSystem;

/// Breadth-first search engine and verdicts.
pub mod explore;
pub use explore::{Explorer, Verdict};

/// Checker configuration: reserved-environment knobs and search budget.
pub mod config;
pub use config::{
    CheckerConfig, DEFAULT_EPC_REGISTER, DEFAULT_HANDLER_ADDRESS, DEFAULT_INPUT_ADDRESS,
    DEFAULT_STATUS_REGISTER,
};

/// Error and violation taxonomy.
pub mod fault;
pub use fault::{CheckError, DecodeError, SafetyKind, SafetyViolation};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
