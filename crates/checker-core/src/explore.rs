//! Breadth-first explicit-state search with liveness tracking.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, info};

use crate::config::CheckerConfig;
use crate::executor::resolve_step;
use crate::fault::{CheckError, SafetyViolation};
use crate::image::InstructionImage;
use crate::props::PropertyChecker;
use crate::state::ArchitecturalState;
use crate::transition::TransitionSystem;

/// Terminal outcome of a search over the full reachable state space.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Verdict {
    /// Every reachable state is safe and at least one path terminates.
    Verified {
        /// Number of distinct states dequeued.
        states_explored: usize,
    },
    /// A reachable state violated a safety property.
    SafetyFailed {
        /// The violated property.
        violation: SafetyViolation,
        /// Shortest-first path from the initial state to the offending
        /// state (the final element).
        trace: Vec<ArchitecturalState>,
        /// Number of distinct states dequeued before the violation.
        states_explored: usize,
    },
    /// The frontier emptied without any terminating path: every execution
    /// cycles forever inside the finite reachable state space.
    LivenessFailed {
        /// Number of distinct states dequeued.
        states_explored: usize,
    },
    /// The configured state budget ran out before the search finished.
    BudgetExceeded {
        /// Number of distinct states dequeued.
        states_explored: usize,
    },
}

impl Verdict {
    /// Number of distinct states dequeued during the run.
    #[must_use]
    pub const fn states_explored(&self) -> usize {
        match self {
            Self::Verified { states_explored }
            | Self::SafetyFailed {
                states_explored, ..
            }
            | Self::LivenessFailed { states_explored }
            | Self::BudgetExceeded { states_explored } => *states_explored,
        }
    }

    /// Returns true for the fully verified outcome.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// A frontier entry: one state awaiting expansion plus its search identity.
///
/// Created when a successor is first enqueued and discarded once expanded;
/// the state's image lives on in the visited map for deduplication and
/// trace reconstruction.
struct SearchNode {
    id: usize,
    state: ArchitecturalState,
}

/// Breadth-first search engine over the reachable architectural states.
///
/// The frontier is a FIFO queue, so the first counterexample reported is a
/// shortest one. The visited map exclusively owns every state it has seen;
/// successors are fresh snapshots and are never mutated after insertion,
/// which keeps per-state expansion independent of the rest of the search.
pub struct Explorer<'a> {
    image: &'a InstructionImage,
    config: CheckerConfig,
}

impl<'a> Explorer<'a> {
    /// Creates an explorer over an instruction image.
    #[must_use]
    pub const fn new(image: &'a InstructionImage, config: CheckerConfig) -> Self {
        Self { image, config }
    }

    /// Runs the exhaustive search from the all-zero initial state.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Decode`] when any reachable state fetches an
    /// undecodable word; this aborts the search without a verdict.
    pub fn run(&self) -> Result<Verdict, CheckError> {
        let boundary = self.image.boundary();
        info!(
            instructions = self.image.instruction_count(),
            boundary, "starting exhaustive search"
        );

        let initial = ArchitecturalState::default();
        let mut visited: HashMap<ArchitecturalState, usize> = HashMap::new();
        let mut parents: Vec<Option<usize>> = Vec::new();
        let mut frontier: VecDeque<SearchNode> = VecDeque::new();

        visited.insert(initial.clone(), 0);
        parents.push(None);
        frontier.push_back(SearchNode {
            id: 0,
            state: initial,
        });

        let mut states_explored = 0_usize;
        let mut termination_found = false;

        while let Some(SearchNode { id, state }) = frontier.pop_front() {
            if self.config.budget_exhausted(states_explored) {
                info!(states_explored, "state budget exhausted");
                return Ok(Verdict::BudgetExceeded { states_explored });
            }
            states_explored += 1;

            // A pc at or past the last whole instruction is a terminating
            // leaf, not a dead end.
            if state.pc() >= boundary {
                termination_found = true;
                continue;
            }

            let step = resolve_step(&state, self.image)?;

            if let Err(violation) = PropertyChecker::check(&state, &step, &self.config) {
                info!(pc = state.pc(), %violation, "safety violation");
                let trace = reconstruct_trace(&visited, &parents, id);
                return Ok(Verdict::SafetyFailed {
                    violation,
                    trace,
                    states_explored,
                });
            }

            for successor in TransitionSystem::successors(&state, &step, &self.config) {
                if !visited.contains_key(&successor) {
                    let successor_id = parents.len();
                    parents.push(Some(id));
                    visited.insert(successor.clone(), successor_id);
                    frontier.push_back(SearchNode {
                        id: successor_id,
                        state: successor,
                    });
                }
            }

            if states_explored % 4096 == 0 {
                debug!(
                    states_explored,
                    frontier = frontier.len(),
                    "search progress"
                );
            }
        }

        let verdict = if termination_found {
            Verdict::Verified { states_explored }
        } else {
            Verdict::LivenessFailed { states_explored }
        };
        info!(states_explored, verified = verdict.is_verified(), "search complete");
        Ok(verdict)
    }
}

/// Rebuilds the initial-to-failing path from the visited map's parent links.
///
/// Inverting the map costs one pass over the visited set and only runs on a
/// safety failure.
fn reconstruct_trace(
    visited: &HashMap<ArchitecturalState, usize>,
    parents: &[Option<usize>],
    failing: usize,
) -> Vec<ArchitecturalState> {
    let mut by_id: HashMap<usize, &ArchitecturalState> = HashMap::with_capacity(visited.len());
    for (state, id) in visited {
        by_id.insert(*id, state);
    }

    let mut path = Vec::new();
    let mut cursor = Some(failing);
    while let Some(id) = cursor {
        if let Some(state) = by_id.get(&id) {
            path.push((*state).clone());
        }
        cursor = parents.get(id).copied().flatten();
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::{Explorer, Verdict};
    use crate::config::CheckerConfig;
    use crate::decoder::DecodedInstruction;
    use crate::encoding::Opcode;
    use crate::fault::{CheckError, DecodeError, SafetyViolation};
    use crate::image::InstructionImage;

    fn program(instrs: &[DecodedInstruction]) -> InstructionImage {
        let mut bytes = Vec::new();
        for instr in instrs {
            bytes.extend_from_slice(&instr.encode().to_le_bytes());
        }
        InstructionImage::from_bytes(&bytes)
    }

    fn addi(rd: u8, rs1: u8, imm: i32) -> DecodedInstruction {
        DecodedInstruction {
            opcode: Opcode::IType,
            rd,
            rs1,
            rs2: 0,
            funct3: 0,
            funct7: 0,
            imm,
            raw: 0,
        }
    }

    fn beq(rs1: u8, rs2: u8, imm: i32) -> DecodedInstruction {
        DecodedInstruction {
            opcode: Opcode::Beq,
            rd: 0,
            rs1,
            rs2,
            funct3: 0,
            funct7: 0,
            imm,
            raw: 0,
        }
    }

    #[test]
    fn straight_line_program_verifies() {
        let image = program(&[addi(1, 0, 42)]);
        let verdict = Explorer::new(&image, CheckerConfig::default())
            .run()
            .expect("no decode errors");
        assert_eq!(verdict, Verdict::Verified { states_explored: 2 });
    }

    #[test]
    fn self_loop_fails_liveness() {
        // beq x0, x0, 0 branches to itself forever.
        let image = program(&[beq(0, 0, 0)]);
        let verdict = Explorer::new(&image, CheckerConfig::default())
            .run()
            .expect("no decode errors");
        assert_eq!(verdict, Verdict::LivenessFailed { states_explored: 1 });
    }

    #[test]
    fn misaligned_word_load_fails_safety_with_a_trace() {
        let lw = DecodedInstruction {
            opcode: Opcode::Load,
            rd: 1,
            rs1: 0,
            rs2: 0,
            funct3: 0x2,
            funct7: 0,
            imm: 6,
            raw: 0,
        };
        let image = program(&[lw]);
        let verdict = Explorer::new(&image, CheckerConfig::default())
            .run()
            .expect("no decode errors");

        let Verdict::SafetyFailed {
            violation,
            trace,
            states_explored,
        } = verdict
        else {
            panic!("expected SafetyFailed, got {verdict:?}");
        };
        assert_eq!(violation, SafetyViolation::Misaligned { address: 6, pc: 0 });
        assert_eq!(states_explored, 1);
        // The offending state is the initial state itself.
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].pc(), 0);
    }

    #[test]
    fn undecodable_word_aborts_without_a_verdict() {
        let image = InstructionImage::from_bytes(&[0, 0, 0, 0]);
        let err = Explorer::new(&image, CheckerConfig::default())
            .run()
            .expect_err("all-zero word has no assigned opcode");
        assert!(matches!(
            err,
            CheckError::Decode(DecodeError::UnknownOpcode { opcode: 0, .. })
        ));
    }

    #[test]
    fn budget_cuts_a_long_search_short() {
        let image = program(&[addi(1, 0, 1), addi(2, 0, 2)]);
        let config = CheckerConfig {
            max_states: 2,
            ..CheckerConfig::default()
        };
        let verdict = Explorer::new(&image, config).run().expect("no decode errors");
        assert_eq!(verdict, Verdict::BudgetExceeded { states_explored: 2 });
    }

    #[test]
    fn empty_image_is_trivially_verified() {
        let image = InstructionImage::from_bytes(&[]);
        let verdict = Explorer::new(&image, CheckerConfig::default())
            .run()
            .expect("nothing to decode");
        // The initial state already sits at the boundary.
        assert_eq!(verdict, Verdict::Verified { states_explored: 1 });
    }
}
