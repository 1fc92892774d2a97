//! Constraint generation for the 8-puzzle planning encoding

use super::variables::{Atom, VariableRegistry};
use crate::error::PlanResult;
use crate::puzzle::{Action, Board, BLANK, CELLS, SIZE};
use itertools::Itertools;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// All nine cells in row-major order
fn board_cells() -> impl Iterator<Item = (usize, usize)> {
    (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| (row, col)))
}

/// At-least-one clause plus pairwise at-most-one clauses over `vars`
fn exactly_one(vars: &[i32], clauses: &mut Vec<Clause>) {
    clauses.push(Clause::new(vars.to_vec()));
    for (a, b) in vars.iter().tuple_combinations() {
        clauses.push(Clause::binary(-a, -b));
    }
}

/// Generates the clause families of the planning encoding for one bound
///
/// Every atom must have been declared in `registry` beforehand.
pub struct ConstraintGenerator<'a> {
    registry: &'a VariableRegistry,
    bound: usize,
    forbid_illegal_moves: bool,
}

impl<'a> ConstraintGenerator<'a> {
    pub fn new(registry: &'a VariableRegistry, bound: usize, forbid_illegal_moves: bool) -> Self {
        Self {
            registry,
            bound,
            forbid_illegal_moves,
        }
    }

    fn position(&self, step: usize, row: usize, col: usize, tile: u8) -> PlanResult<i32> {
        self.registry.require(Atom::position(step, row, col, tile))
    }

    fn action(&self, step: usize, kind: Action) -> PlanResult<i32> {
        self.registry.require(Atom::action(step, kind))
    }

    /// Each cell holds exactly one tile and each tile sits in exactly one cell
    pub fn cell_exclusivity(&self, step: usize) -> PlanResult<Vec<Clause>> {
        let mut clauses = Vec::new();

        for (row, col) in board_cells() {
            let vars = (0..CELLS as u8)
                .map(|tile| self.position(step, row, col, tile))
                .collect::<PlanResult<Vec<_>>>()?;
            exactly_one(&vars, &mut clauses);
        }

        for tile in 0..CELLS as u8 {
            let vars = board_cells()
                .map(|(row, col)| self.position(step, row, col, tile))
                .collect::<PlanResult<Vec<_>>>()?;
            exactly_one(&vars, &mut clauses);
        }

        Ok(clauses)
    }

    /// Exactly one of the five actions fires at `step`
    pub fn action_exclusivity(&self, step: usize) -> PlanResult<Vec<Clause>> {
        let mut clauses = Vec::new();
        let vars = Action::ALL
            .iter()
            .map(|&kind| self.action(step, kind))
            .collect::<PlanResult<Vec<_>>>()?;
        exactly_one(&vars, &mut clauses);
        Ok(clauses)
    }

    /// Transition and frame axioms linking `step` to `step + 1`
    pub fn transitions(&self, step: usize) -> PlanResult<Vec<Clause>> {
        let mut clauses = Vec::new();
        for kind in Action::DIRECTIONAL {
            clauses.extend(self.move_transitions(step, kind)?);
        }
        clauses.extend(self.noop_transitions(step)?);
        Ok(clauses)
    }

    /// Clauses for one directional action at `step`
    fn move_transitions(&self, step: usize, kind: Action) -> PlanResult<Vec<Clause>> {
        let mut clauses = Vec::new();
        let act = self.action(step, kind)?;

        for (row, col) in board_cells() {
            let blank = self.position(step, row, col, BLANK)?;
            let destination = kind.destination(row, col, SIZE);

            if let Some((nr, nc)) = destination {
                // The blank relocates to the destination
                let moved_blank = self.position(step + 1, nr, nc, BLANK)?;
                clauses.push(Clause::new(vec![-blank, -act, moved_blank]));

                // The tile at the destination slides into the vacated cell
                for tile in 1..CELLS as u8 {
                    let before = self.position(step, nr, nc, tile)?;
                    let after = self.position(step + 1, row, col, tile)?;
                    clauses.push(Clause::new(vec![-blank, -act, -before, after]));
                }
            }

            // Every other cell keeps its tile
            for (r, c) in board_cells() {
                if (r, c) == (row, col) || Some((r, c)) == destination {
                    continue;
                }
                for tile in 0..CELLS as u8 {
                    let before = self.position(step, r, c, tile)?;
                    let after = self.position(step + 1, r, c, tile)?;
                    clauses.push(Clause::new(vec![-act, -blank, -before, after]));
                }
            }
        }

        Ok(clauses)
    }

    /// NoOp keeps every position atom unchanged, in both directions
    fn noop_transitions(&self, step: usize) -> PlanResult<Vec<Clause>> {
        let mut clauses = Vec::new();
        let noop = self.action(step, Action::NoOp)?;

        for (row, col) in board_cells() {
            for tile in 0..CELLS as u8 {
                let before = self.position(step, row, col, tile)?;
                let after = self.position(step + 1, row, col, tile)?;
                clauses.push(Clause::new(vec![-noop, -before, after]));
                clauses.push(Clause::new(vec![-noop, before, -after]));
            }
        }

        Ok(clauses)
    }

    /// A directional action may not fire when it would push the blank off the board
    pub fn illegal_move_prohibitions(&self, step: usize) -> PlanResult<Vec<Clause>> {
        let mut clauses = Vec::new();
        if !self.forbid_illegal_moves {
            return Ok(clauses);
        }

        for kind in Action::DIRECTIONAL {
            let act = self.action(step, kind)?;
            for (row, col) in board_cells() {
                if kind.destination(row, col, SIZE).is_none() {
                    let blank = self.position(step, row, col, BLANK)?;
                    clauses.push(Clause::binary(-blank, -act));
                }
            }
        }

        Ok(clauses)
    }

    /// Unit clauses fixing the board at `step`
    pub fn pin_board(&self, step: usize, board: &Board) -> PlanResult<Vec<Clause>> {
        board
            .cells()
            .map(|(row, col, tile)| Ok(Clause::unit(self.position(step, row, col, tile)?)))
            .collect()
    }

    /// Pin `initial` at step 0
    pub fn initial_state(&self, initial: &Board) -> PlanResult<Vec<Clause>> {
        self.pin_board(0, initial)
    }

    /// Pin the goal board at the final step
    pub fn goal_state(&self) -> PlanResult<Vec<Clause>> {
        self.pin_board(self.bound, &Board::goal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::variables::VariableSchema;

    fn declared(bound: usize) -> VariableRegistry {
        let mut registry = VariableRegistry::with_bound(bound);
        VariableSchema::new(bound).declare(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_clause_creation() {
        let clause = Clause::new(vec![1, -2, 3]);
        assert_eq!(clause.literals, vec![1, -2, 3]);
        assert!(!clause.is_empty());
        assert!(!clause.is_unit());

        let unit_clause = Clause::unit(5);
        assert!(unit_clause.is_unit());
        assert_eq!(unit_clause.literals, vec![5]);
    }

    #[test]
    fn test_cell_exclusivity_count() {
        let registry = declared(1);
        let generator = ConstraintGenerator::new(&registry, 1, true);
        let clauses = generator.cell_exclusivity(0).unwrap();

        // 9 cells and 9 tiles, each with one at-least-one and 36 pair clauses
        assert_eq!(clauses.len(), 18 * (1 + 36));
        assert_eq!(clauses.iter().filter(|c| c.literals.len() == 9).count(), 18);
        assert!(clauses.iter().filter(|c| c.literals.len() == 2).all(|c| c.literals.iter().all(|&l| l < 0)));
    }

    #[test]
    fn test_action_exclusivity_count() {
        let registry = declared(2);
        let generator = ConstraintGenerator::new(&registry, 2, true);
        let clauses = generator.action_exclusivity(1).unwrap();
        assert_eq!(clauses.len(), 1 + 10);
        assert_eq!(clauses[0].literals.len(), 5);
    }

    #[test]
    fn test_transition_count() {
        let registry = declared(1);
        let generator = ConstraintGenerator::new(&registry, 1, true);
        let clauses = generator.transitions(0).unwrap();

        // Per direction: 6 in-bounds blank cells with 1 + 8 + 7*9 clauses,
        // 3 boundary cells with 8*9 frame clauses. NoOp adds 81*2.
        let per_direction = 6 * (1 + 8 + 63) + 3 * 72;
        assert_eq!(clauses.len(), 4 * per_direction + 162);
    }

    #[test]
    fn test_prohibitions() {
        let registry = declared(1);
        let forbidding = ConstraintGenerator::new(&registry, 1, true);
        let clauses = forbidding.illegal_move_prohibitions(0).unwrap();
        assert_eq!(clauses.len(), 12);

        let up = registry.require(Atom::action(0, Action::Up)).unwrap();
        let corner_blank = registry.require(Atom::position(0, 0, 0, BLANK)).unwrap();
        assert!(clauses.contains(&Clause::binary(-corner_blank, -up)));

        let permissive = ConstraintGenerator::new(&registry, 1, false);
        assert!(permissive.illegal_move_prohibitions(0).unwrap().is_empty());
    }

    #[test]
    fn test_pins() {
        let registry = declared(2);
        let generator = ConstraintGenerator::new(&registry, 2, true);
        let initial: Board = "1 2 0 3 4 5 6 7 8".parse().unwrap();

        let start = generator.initial_state(&initial).unwrap();
        assert_eq!(start.len(), 9);
        assert!(start.iter().all(Clause::is_unit));
        let first = registry.require(Atom::position(0, 0, 0, 1)).unwrap();
        assert!(start.contains(&Clause::unit(first)));

        let goal = generator.goal_state().unwrap();
        let last_blank = registry.require(Atom::position(2, 0, 0, BLANK)).unwrap();
        assert!(goal.contains(&Clause::unit(last_blank)));
    }

    #[test]
    fn test_undeclared_atoms_are_rejected() {
        let registry = VariableRegistry::with_bound(1);
        let generator = ConstraintGenerator::new(&registry, 1, true);
        assert!(generator.cell_exclusivity(0).is_err());
    }
}
