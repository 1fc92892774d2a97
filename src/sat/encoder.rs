//! SAT encoder for bounded 8-puzzle planning

use super::constraints::{Clause, ConstraintGenerator};
use super::variables::{VariableRegistry, VariableSchema};
use crate::error::PlanResult;
use crate::puzzle::Board;
use std::fmt;
use std::io::{self, Write};

/// CNF formula for one plan-length bound, together with its registry
#[derive(Debug)]
pub struct EncodedProblem {
    pub bound: usize,
    pub registry: VariableRegistry,
    pub clauses: Vec<Clause>,
    pub statistics: EncodingStatistics,
}

impl EncodedProblem {
    pub fn variable_count(&self) -> usize {
        self.registry.variable_count()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Write the formula in DIMACS CNF format
    pub fn write_dimacs<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "c 8-puzzle plan encoding, bound {}", self.bound)?;
        writeln!(out, "p cnf {} {}", self.variable_count(), self.clause_count())?;
        for clause in &self.clauses {
            for literal in &clause.literals {
                write!(out, "{} ", literal)?;
            }
            writeln!(out, "0")?;
        }
        Ok(())
    }
}

/// Builds fresh formulas for an initial board
pub struct PlanEncoder {
    initial: Board,
    forbid_illegal_moves: bool,
}

impl PlanEncoder {
    pub fn new(initial: Board, forbid_illegal_moves: bool) -> Self {
        Self {
            initial,
            forbid_illegal_moves,
        }
    }

    /// Encode "the goal is reachable from the initial board in exactly `bound` steps"
    pub fn encode(&self, bound: usize) -> PlanResult<EncodedProblem> {
        let mut registry = VariableRegistry::with_bound(bound);
        VariableSchema::new(bound).declare(&mut registry)?;

        let generator = ConstraintGenerator::new(&registry, bound, self.forbid_illegal_moves);
        let mut clauses = Vec::new();
        let mut statistics = EncodingStatistics {
            bound,
            ..EncodingStatistics::default()
        };

        for step in 0..=bound {
            let family = generator.cell_exclusivity(step)?;
            statistics.cell_exclusivity_clauses += family.len();
            clauses.extend(family);
        }

        for step in 0..bound {
            let family = generator.action_exclusivity(step)?;
            statistics.action_exclusivity_clauses += family.len();
            clauses.extend(family);

            let family = generator.transitions(step)?;
            statistics.transition_clauses += family.len();
            clauses.extend(family);

            let family = generator.illegal_move_prohibitions(step)?;
            statistics.prohibition_clauses += family.len();
            clauses.extend(family);
        }

        let mut pins = generator.initial_state(&self.initial)?;
        pins.extend(generator.goal_state()?);
        statistics.pin_clauses = pins.len();
        clauses.extend(pins);

        let variables = registry.statistics();
        statistics.total_variables = variables.total_variables;
        statistics.position_variables = variables.position_variables;
        statistics.action_variables = variables.action_variables;
        statistics.total_clauses = clauses.len();

        Ok(EncodedProblem {
            bound,
            registry,
            clauses,
            statistics,
        })
    }
}

/// Statistics about one encoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingStatistics {
    pub bound: usize,
    pub total_variables: usize,
    pub position_variables: usize,
    pub action_variables: usize,
    pub total_clauses: usize,
    pub cell_exclusivity_clauses: usize,
    pub action_exclusivity_clauses: usize,
    pub transition_clauses: usize,
    pub prohibition_clauses: usize,
    pub pin_clauses: usize,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Encoding Statistics (plan length {}):", self.bound)?;
        writeln!(
            f,
            "  Variables: {} ({} position, {} action)",
            self.total_variables, self.position_variables, self.action_variables
        )?;
        writeln!(f, "  Clauses: {}", self.total_clauses)?;
        writeln!(f, "    Cell exclusivity: {}", self.cell_exclusivity_clauses)?;
        writeln!(f, "    Action exclusivity: {}", self.action_exclusivity_clauses)?;
        writeln!(f, "    Transitions: {}", self.transition_clauses)?;
        writeln!(f, "    Illegal move prohibitions: {}", self.prohibition_clauses)?;
        writeln!(f, "    Initial/goal pins: {}", self.pin_clauses)?;
        Ok(())
    }
}
