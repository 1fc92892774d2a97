//! SAT encoding and solving for 8-puzzle planning

pub mod constraints;
pub mod encoder;
pub mod solver;
pub mod variables;

pub use constraints::{Clause, ConstraintGenerator};
pub use encoder::{EncodedProblem, EncodingStatistics, PlanEncoder};
pub use solver::{CadicalSolver, Model, SatBackend, SolveOutcome, SolverOptions};
pub use variables::{Atom, VariableRegistry, VariableSchema};
