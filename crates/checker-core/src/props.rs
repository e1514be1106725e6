//! Safety-property evaluation over a state about to be expanded.

use crate::config::CheckerConfig;
use crate::encoding::is_word_access;
use crate::executor::ResolvedStep;
use crate::fault::SafetyViolation;
use crate::state::{ArchitecturalState, DATA_MEMORY_BYTES};

/// Evaluates the safety invariants on a state/instruction/ALU-result triple.
///
/// Runs before successors are computed, so a violation aborts exploration
/// without ever materializing a bad successor state.
pub struct PropertyChecker;

impl PropertyChecker {
    /// Checks, in order: memory-access bounds and word alignment (with the
    /// reserved environment-input address always permitted), then the
    /// hard-wired-zero register invariant.
    ///
    /// # Errors
    ///
    /// Returns the first [`SafetyViolation`] encountered.
    pub fn check(
        state: &ArchitecturalState,
        step: &ResolvedStep,
        config: &CheckerConfig,
    ) -> Result<(), SafetyViolation> {
        let pc = state.pc();

        if step.signals.accesses_memory() {
            let address = step.alu_result;
            if address != config.input_address {
                if address < 0 || address >= DATA_MEMORY_BYTES {
                    return Err(SafetyViolation::OutOfBounds { address, pc });
                }
                if is_word_access(step.instr.funct3) && address % 4 != 0 {
                    return Err(SafetyViolation::Misaligned { address, pc });
                }
            }
        }

        let x0 = state.register(0);
        if x0 != 0 {
            return Err(SafetyViolation::RegisterZeroCorrupted { value: x0, pc });
        }

        Ok(())
    }
}
