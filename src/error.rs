//! Error types shared by the encoder, planner and simulator

use crate::puzzle::Action;
use crate::sat::variables::Atom;
use thiserror::Error;

/// Errors produced while encoding, solving, decoding or replaying a plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// No plan length up to the configured maximum is satisfiable
    #[error("no plan found with at most {max_plan_length} moves")]
    EncodingExhausted { max_plan_length: usize },

    /// An action cannot be applied to the board it is replayed on
    #[error("move {action} at step {step} is not applicable: blank at ({row}, {col})")]
    InvalidMove {
        step: usize,
        action: Action,
        row: usize,
        col: usize,
    },

    /// The replayed plan ends on a board other than the goal
    #[error("replaying the plan ends in a board different from the goal")]
    VerificationMismatch,

    /// The SAT backend could not be constructed or invoked
    #[error("SAT solver failure: {0}")]
    SolverResource(String),

    /// The satisfying model does not describe a well-formed plan
    #[error("model decoding failed at step {step}: {reason}")]
    Decoding { step: usize, reason: String },

    /// An atom was referenced before the schema declared it
    #[error("atom {0:?} was referenced before being declared")]
    UndeclaredAtom(Atom),

    /// An atom lies outside the board or the plan-length bound
    #[error("atom {atom:?} is out of range: {reason}")]
    AtomOutOfRange { atom: Atom, reason: String },

    /// A board is not a permutation of the tiles 0..=8
    #[error("invalid board: {0}")]
    InvalidBoard(String),
}

pub type PlanResult<T> = std::result::Result<T, PlanError>;
