//! Non-deterministic successor enumeration.
//!
//! For almost every state the successor set is the single deterministic
//! result of [`commit_step`]. Two configured conditions enlarge it: a load
//! from the reserved environment-input address forks once per interesting
//! input value, and an enabled interrupt appends one extra successor that
//! vectors to the handler. Both are finite under-approximations of an
//! unbounded environment, driven entirely by [`CheckerConfig`].

use crate::config::CheckerConfig;
use crate::executor::{commit_step, ResolvedStep};
use crate::state::ArchitecturalState;

/// Enumerates successor states for one resolved, safety-checked step.
pub struct TransitionSystem;

impl TransitionSystem {
    /// Produces the successor set for `state`.
    ///
    /// Non-empty for every state this is called on: the deterministic path
    /// always contributes at least one successor, and forks only add more.
    #[must_use]
    pub fn successors(
        state: &ArchitecturalState,
        step: &ResolvedStep,
        config: &CheckerConfig,
    ) -> Vec<ArchitecturalState> {
        let pc = state.pc();
        let mut successors = Vec::with_capacity(1);

        let is_input_read = step.signals.mem_read && step.alu_result == config.input_address;
        if is_input_read {
            // One successor per modeled input value; only the destination
            // register differs between them.
            for &input in &config.interesting_inputs {
                let mut fork = state.clone();
                if step.signals.reg_write {
                    fork.set_register(step.instr.rd, input);
                }
                fork.set_pc(pc.wrapping_add(4));
                successors.push(fork);
            }
        } else {
            successors.push(commit_step(state, step));
        }

        let status = state.register(config.status_register);
        if status & 1 != 0 {
            let mut interrupted = state.clone();
            interrupted.set_register(config.epc_register, pc as i32);
            interrupted.set_register(config.status_register, status & !1);
            interrupted.set_pc(config.handler_address);
            successors.push(interrupted);
        }

        successors
    }
}
