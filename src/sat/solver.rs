//! SAT solver integration using CaDiCaL

use super::constraints::Clause;
use crate::error::{PlanError, PlanResult};
use cadical::{Solver, Timeout};
use std::collections::HashMap;
use std::time::Duration;

/// Satisfying assignment returned by a backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub assignment: HashMap<i32, bool>,
}

impl Model {
    /// Build a model from signed literals: `+v` true, `-v` false
    pub fn from_literals(literals: impl IntoIterator<Item = i32>) -> Self {
        let assignment = literals
            .into_iter()
            .filter(|&lit| lit != 0)
            .map(|lit| (lit.abs(), lit > 0))
            .collect();
        Self { assignment }
    }

    /// Truth value of a variable; unassigned variables count as false
    pub fn value(&self, var: i32) -> bool {
        self.assignment.get(&var).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }
}

/// Result of one solver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Satisfiable(Model),
    Unsatisfiable,
    /// The per-trial time limit expired before an answer was found
    TimedOut,
}

/// Configuration options for the SAT solver
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    pub timeout: Option<Duration>,
}

/// Minimal contract the planner needs from a SAT solver
///
/// A backend is created per trial and released when dropped.
pub trait SatBackend: Sized {
    /// Construct a fresh solver instance
    fn create(options: &SolverOptions) -> PlanResult<Self>;

    /// Add a single clause
    fn add_clause(&mut self, clause: &Clause) -> PlanResult<()>;

    /// Add clauses to the solver
    fn add_clauses(&mut self, clauses: &[Clause]) -> PlanResult<()> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    /// Run the solver on everything added so far
    fn solve(&mut self) -> PlanResult<SolveOutcome>;
}

/// SAT solver wrapper for CaDiCaL
pub struct CadicalSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
}

impl CadicalSolver {
    /// Create a new SAT solver instance
    pub fn new(options: &SolverOptions) -> Self {
        let mut solver: Solver = Solver::new();
        if let Some(timeout) = options.timeout {
            solver.set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));
        }

        Self {
            solver,
            variable_count: 0,
            clause_count: 0,
        }
    }

    /// Extract variable assignment from the solver
    fn extract_model(&self) -> Model {
        let mut assignment = HashMap::with_capacity(self.variable_count);

        for var in 1..=self.variable_count as i32 {
            if let Some(value) = self.solver.value(var) {
                assignment.insert(var, value);
            }
        }

        Model { assignment }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl SatBackend for CadicalSolver {
    fn create(options: &SolverOptions) -> PlanResult<Self> {
        Ok(Self::new(options))
    }

    fn add_clause(&mut self, clause: &Clause) -> PlanResult<()> {
        if clause.is_empty() {
            return Err(PlanError::SolverResource(
                "cannot add empty clause".to_string(),
            ));
        }

        for &literal in &clause.literals {
            if literal == 0 {
                return Err(PlanError::SolverResource(
                    "clause contains literal 0".to_string(),
                ));
            }
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(clause.literals.iter().copied());
        self.clause_count += 1;
        Ok(())
    }

    fn solve(&mut self) -> PlanResult<SolveOutcome> {
        let result = self.solver.solve();

        Ok(match result {
            Some(true) => SolveOutcome::Satisfiable(self.extract_model()),
            Some(false) => SolveOutcome::Unsatisfiable,
            None => SolveOutcome::TimedOut,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> CadicalSolver {
        CadicalSolver::create(&SolverOptions::default()).unwrap()
    }

    #[test]
    fn test_solver_creation() {
        let solver = solver();
        assert_eq!(solver.variable_count(), 0);
        assert_eq!(solver.clause_count(), 0);
    }

    #[test]
    fn test_simple_satisfiable() {
        let mut solver = solver();

        // x1 ∨ x2 and ¬x1 ∨ x2
        solver.add_clause(&Clause::new(vec![1, 2])).unwrap();
        solver.add_clause(&Clause::new(vec![-1, 2])).unwrap();

        match solver.solve().unwrap() {
            SolveOutcome::Satisfiable(model) => assert!(model.value(2)),
            other => panic!("expected satisfiable, got {:?}", other),
        }
    }

    #[test]
    fn test_unsatisfiable() {
        let mut solver = solver();
        solver
            .add_clauses(&[Clause::unit(1), Clause::unit(-1)])
            .unwrap();

        assert_eq!(solver.solve().unwrap(), SolveOutcome::Unsatisfiable);
    }

    #[test]
    fn test_empty_clause_error() {
        let mut solver = solver();
        assert!(solver.add_clause(&Clause::new(vec![])).is_err());
        assert!(solver.add_clause(&Clause::new(vec![1, 0])).is_err());
    }

    #[test]
    fn test_variable_count_tracking() {
        let mut solver = solver();

        solver.add_clause(&Clause::new(vec![1, -5, 3])).unwrap();
        assert_eq!(solver.variable_count(), 5);

        solver.add_clause(&Clause::new(vec![2, -7])).unwrap();
        assert_eq!(solver.variable_count(), 7);
        assert_eq!(solver.clause_count(), 2);
    }

    #[test]
    fn test_model_literals() {
        let model = Model::from_literals(vec![-3, 1, 2, 0]);
        assert!(model.value(1));
        assert!(!model.value(3));
        assert!(!model.value(9));
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_timeout_configuration_still_solves() {
        let options = SolverOptions {
            timeout: Some(Duration::from_secs(10)),
        };
        let mut solver = CadicalSolver::create(&options).unwrap();
        solver.add_clause(&Clause::unit(1)).unwrap();
        assert!(matches!(solver.solve().unwrap(), SolveOutcome::Satisfiable(_)));
    }

    /// Pigeons into one fewer holes, hard for resolution-based solvers
    fn pigeonhole(holes: i32) -> Vec<Clause> {
        let var = |pigeon: i32, hole: i32| pigeon * holes + hole + 1;
        let mut clauses: Vec<Clause> = (0..=holes)
            .map(|p| Clause::new((0..holes).map(|h| var(p, h)).collect()))
            .collect();
        for h in 0..holes {
            for p in 0..=holes {
                for q in (p + 1)..=holes {
                    clauses.push(Clause::binary(-var(p, h), -var(q, h)));
                }
            }
        }
        clauses
    }

    #[test]
    fn test_expired_timeout_reports_timed_out() {
        let options = SolverOptions {
            timeout: Some(Duration::from_millis(1)),
        };
        let mut solver = CadicalSolver::create(&options).unwrap();
        solver.add_clauses(&pigeonhole(14)).unwrap();
        assert_eq!(solver.solve().unwrap(), SolveOutcome::TimedOut);
    }
}
