//! Iterative-deepening planning loop over plan lengths

use super::extractor::{decode_boards, extract_actions};
use super::plan::{Plan, PlanOutcome, TrialReport, TrialStatus};
use crate::error::PlanResult;
use crate::puzzle::{Action, Board};
use crate::sat::{CadicalSolver, PlanEncoder, SatBackend, SolveOutcome, SolverOptions};
use std::marker::PhantomData;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Search parameters for the planning loop
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub min_plan_length: usize,
    pub max_plan_length: usize,
    pub trial_timeout: Option<Duration>,
    pub forbid_illegal_moves: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_plan_length: 0,
            max_plan_length: 15,
            trial_timeout: None,
            forbid_illegal_moves: true,
        }
    }
}

/// Satisfying trial: the decoded plan and boards
#[derive(Debug, Clone)]
pub struct TrialSolution {
    pub actions: Vec<Action>,
    pub states: Vec<Board>,
}

/// Tries plan lengths in increasing order, encoding and solving each from scratch
pub struct Planner<B: SatBackend = CadicalSolver> {
    config: PlannerConfig,
    backend: PhantomData<B>,
}

impl Planner<CadicalSolver> {
    /// Planner backed by CaDiCaL
    pub fn new(config: PlannerConfig) -> Self {
        Self::with_backend(config)
    }
}

impl<B: SatBackend> Planner<B> {
    /// Planner backed by any [`SatBackend`]
    pub fn with_backend(config: PlannerConfig) -> Self {
        Self {
            config,
            backend: PhantomData,
        }
    }

    /// Find the shortest plan from `initial` to the goal within the configured bounds
    ///
    /// Solver failures abort the whole search.
    pub fn solve(&self, initial: &Board) -> PlanResult<PlanOutcome> {
        let encoder = PlanEncoder::new(*initial, self.config.forbid_illegal_moves);
        let mut trials = Vec::new();
        let mut undecided = false;

        for bound in self.config.min_plan_length..=self.config.max_plan_length {
            info!("Trying plan length {}...", bound);
            let (report, solution) = self.run_trial(&encoder, bound)?;
            let status = report.status;
            trials.push(report);

            match (status, solution) {
                (TrialStatus::Satisfiable, Some(solution)) => {
                    info!("Plan found with length {}", bound);
                    return Ok(PlanOutcome::Found(Plan {
                        initial: *initial,
                        actions: solution.actions,
                        bound,
                        states: solution.states,
                        trials,
                        proven_minimal: !undecided,
                    }));
                }
                (TrialStatus::TimedOut, _) => {
                    warn!("Plan length {} timed out, moving on", bound);
                    undecided = true;
                }
                _ => debug!("Plan length {} is unsatisfiable", bound),
            }
        }

        info!(
            "No plan found within {} moves",
            self.config.max_plan_length
        );
        Ok(PlanOutcome::Exhausted {
            max_plan_length: self.config.max_plan_length,
            trials,
        })
    }

    /// Encode and solve a single plan length
    pub fn run_trial(
        &self,
        encoder: &PlanEncoder,
        bound: usize,
    ) -> PlanResult<(TrialReport, Option<TrialSolution>)> {
        let start_time = Instant::now();
        let problem = encoder.encode(bound)?;
        debug!(
            "Plan length {}: {} variables, {} clauses",
            bound,
            problem.variable_count(),
            problem.clause_count()
        );

        let options = SolverOptions {
            timeout: self.config.trial_timeout,
        };
        let mut solver = B::create(&options)?;
        solver.add_clauses(&problem.clauses)?;
        let outcome = solver.solve()?;
        drop(solver);

        let (status, solution) = match outcome {
            SolveOutcome::Satisfiable(model) => {
                let actions = extract_actions(&model, &problem.registry, bound)?;
                let states = decode_boards(&model, &problem.registry, bound)?;
                (TrialStatus::Satisfiable, Some(TrialSolution { actions, states }))
            }
            SolveOutcome::Unsatisfiable => (TrialStatus::Unsatisfiable, None),
            SolveOutcome::TimedOut => (TrialStatus::TimedOut, None),
        };

        let report = TrialReport {
            plan_length: bound,
            variables: problem.variable_count(),
            clauses: problem.clause_count(),
            status,
            elapsed: start_time.elapsed(),
        };
        Ok((report, solution))
    }

    /// Status of a single plan length for `initial`
    pub fn check_length(&self, initial: &Board, bound: usize) -> PlanResult<TrialStatus> {
        let encoder = PlanEncoder::new(*initial, self.config.forbid_illegal_moves);
        Ok(self.run_trial(&encoder, bound)?.0.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::sat::{Clause, Model};
    use std::cell::Cell;

    /// Backend that cannot be constructed
    struct UnavailableSolver;

    impl SatBackend for UnavailableSolver {
        fn create(_options: &SolverOptions) -> PlanResult<Self> {
            Err(PlanError::SolverResource("solver library not loaded".to_string()))
        }

        fn add_clause(&mut self, _clause: &Clause) -> PlanResult<()> {
            Ok(())
        }

        fn solve(&mut self) -> PlanResult<SolveOutcome> {
            Ok(SolveOutcome::Unsatisfiable)
        }
    }

    /// Backend that always reports a timeout
    struct StalledSolver;

    impl SatBackend for StalledSolver {
        fn create(_options: &SolverOptions) -> PlanResult<Self> {
            Ok(StalledSolver)
        }

        fn add_clause(&mut self, _clause: &Clause) -> PlanResult<()> {
            Ok(())
        }

        fn solve(&mut self) -> PlanResult<SolveOutcome> {
            Ok(SolveOutcome::TimedOut)
        }
    }

    /// Backend whose model sets nothing true
    struct EmptyModelSolver;

    impl SatBackend for EmptyModelSolver {
        fn create(_options: &SolverOptions) -> PlanResult<Self> {
            Ok(EmptyModelSolver)
        }

        fn add_clause(&mut self, _clause: &Clause) -> PlanResult<()> {
            Ok(())
        }

        fn solve(&mut self) -> PlanResult<SolveOutcome> {
            Ok(SolveOutcome::Satisfiable(Model::default()))
        }
    }

    thread_local! {
        static TRIALS_STARTED: Cell<usize> = const { Cell::new(0) };
    }

    /// Times out on the first trial of the thread, then delegates to CaDiCaL
    struct FirstTrialTimesOut {
        inner: Option<CadicalSolver>,
    }

    impl SatBackend for FirstTrialTimesOut {
        fn create(options: &SolverOptions) -> PlanResult<Self> {
            let started = TRIALS_STARTED.with(|count| count.replace(count.get() + 1));
            let inner = if started == 0 {
                None
            } else {
                Some(CadicalSolver::create(options)?)
            };
            Ok(Self { inner })
        }

        fn add_clause(&mut self, clause: &Clause) -> PlanResult<()> {
            match self.inner.as_mut() {
                Some(solver) => solver.add_clause(clause),
                None => Ok(()),
            }
        }

        fn solve(&mut self) -> PlanResult<SolveOutcome> {
            match self.inner.as_mut() {
                Some(solver) => solver.solve(),
                None => Ok(SolveOutcome::TimedOut),
            }
        }
    }

    fn config(min: usize, max: usize) -> PlannerConfig {
        PlannerConfig {
            min_plan_length: min,
            max_plan_length: max,
            ..PlannerConfig::default()
        }
    }

    #[test]
    fn test_solver_failure_propagates() {
        let planner = Planner::<UnavailableSolver>::with_backend(config(0, 5));
        let result = planner.solve(&Board::goal());
        assert!(matches!(result, Err(PlanError::SolverResource(_))));
    }

    #[test]
    fn test_timeouts_exhaust_all_lengths() {
        let planner = Planner::<StalledSolver>::with_backend(config(1, 3));
        match planner.solve(&Board::goal()).unwrap() {
            PlanOutcome::Exhausted { max_plan_length, trials } => {
                assert_eq!(max_plan_length, 3);
                assert_eq!(trials.len(), 3);
                assert!(trials.iter().all(|t| t.status == TrialStatus::TimedOut));
                assert_eq!(trials[0].plan_length, 1);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_model_is_decoding_error() {
        let planner = Planner::<EmptyModelSolver>::with_backend(config(1, 1));
        assert!(matches!(
            planner.solve(&Board::goal()),
            Err(PlanError::Decoding { step: 0, .. })
        ));
    }

    #[test]
    fn test_goal_solved_at_length_zero() {
        let planner = Planner::new(config(0, 3));
        let plan = planner.solve(&Board::goal()).unwrap().into_plan().unwrap();
        assert_eq!(plan.bound, 0);
        assert!(plan.is_empty());
        assert_eq!(plan.states, vec![Board::goal()]);
        assert!(plan.proven_minimal);
    }

    #[test]
    fn test_two_move_scenario() {
        let initial: Board = "1 2 0 3 4 5 6 7 8".parse().unwrap();
        let planner = Planner::new(PlannerConfig::default());
        let plan = planner.solve(&initial).unwrap().into_plan().unwrap();

        assert_eq!(plan.bound, 2);
        assert_eq!(plan.actions, vec![Action::Left, Action::Left]);
        assert_eq!(plan.trials.len(), 3);
        assert_eq!(plan.trials[0].status, TrialStatus::Unsatisfiable);
        assert_eq!(plan.states.first(), Some(&initial));
        assert_eq!(plan.states.last(), Some(&Board::goal()));
    }

    #[test]
    fn test_plan_after_timeout_is_not_proven_minimal() {
        TRIALS_STARTED.with(|count| count.set(0));
        let initial: Board = "1 0 2 3 4 5 6 7 8".parse().unwrap();
        let planner = Planner::<FirstTrialTimesOut>::with_backend(config(1, 4));
        let plan = planner.solve(&initial).unwrap().into_plan().unwrap();

        // Length 1 would have worked; the padded plan is found at length 2
        assert_eq!(plan.bound, 2);
        let statuses: Vec<_> = plan.trials.iter().map(|t| t.status).collect();
        assert_eq!(statuses, vec![TrialStatus::TimedOut, TrialStatus::Satisfiable]);
        assert!(!plan.proven_minimal);
        assert_eq!(plan.actions, vec![Action::Left]);
    }
}
