//! 8-puzzle solver via bounded SAT planning
//!
//! This library encodes "the goal board is reachable in L moves" as CNF,
//! hands it to a SAT solver for increasing L and decodes the first model
//! into a move sequence.

pub mod config;
pub mod error;
pub mod planning;
pub mod puzzle;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use error::{PlanError, PlanResult};
pub use planning::{Plan, PlanOutcome, Planner, PlannerConfig, PlanVerifier};
pub use puzzle::{Action, Board};

/// Main entry point: search for the shortest plan from `initial` with CaDiCaL
pub fn solve_puzzle(initial: &Board, settings: &Settings) -> PlanResult<PlanOutcome> {
    Planner::new(settings.planner_config()).solve(initial)
}
