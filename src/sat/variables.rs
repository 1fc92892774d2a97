//! Variable management for the SAT encoding

use crate::error::{PlanError, PlanResult};
use crate::puzzle::{Action, CELLS, SIZE};
use std::collections::HashMap;

/// Propositional atoms of the planning encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Atom {
    /// Tile `tile` occupies cell `(row, col)` at `step`
    Position {
        step: usize,
        row: usize,
        col: usize,
        tile: u8,
    },
    /// `kind` is executed at `step`
    Action { step: usize, kind: Action },
}

/// Number of atoms of one position step: 9 cells times 9 tiles
pub const POSITION_ATOMS_PER_STEP: usize = CELLS * CELLS;
/// Number of atoms of one action step
pub const ACTION_ATOMS_PER_STEP: usize = Action::ALL.len();

impl Atom {
    pub fn position(step: usize, row: usize, col: usize, tile: u8) -> Self {
        Atom::Position { step, row, col, tile }
    }

    pub fn action(step: usize, kind: Action) -> Self {
        Atom::Action { step, kind }
    }

    pub fn step(&self) -> usize {
        match *self {
            Atom::Position { step, .. } | Atom::Action { step, .. } => step,
        }
    }

    /// Id this atom receives when the schema for `bound` is declared in order
    ///
    /// Positions come first (step, row, col, tile), then actions (step, kind).
    pub fn canonical_id(&self, bound: usize) -> i32 {
        let index = match *self {
            Atom::Position { step, row, col, tile } => {
                step * POSITION_ATOMS_PER_STEP + (row * SIZE + col) * CELLS + tile as usize
            }
            Atom::Action { step, kind } => {
                (bound + 1) * POSITION_ATOMS_PER_STEP + step * ACTION_ATOMS_PER_STEP + kind.index()
            }
        };
        index as i32 + 1
    }
}

/// Manages SAT variables and their mapping to integers
///
/// A registry belongs to a single plan-length trial.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    /// Map from atom to SAT variable ID (positive integer)
    variable_map: HashMap<Atom, i32>,
    /// Reverse lookup, `atoms[id - 1]` is the atom with that id
    atoms: Vec<Atom>,
    /// Plan-length bound atoms are validated against, if any
    bound: Option<usize>,
}

impl VariableRegistry {
    /// Create an empty registry that accepts atoms of any step
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry for plan length `bound`
    pub fn with_bound(bound: usize) -> Self {
        Self {
            variable_map: HashMap::with_capacity(expected_variables(bound)),
            atoms: Vec::with_capacity(expected_variables(bound)),
            bound: Some(bound),
        }
    }

    /// Get or create a variable ID for the given atom
    pub fn get_or_create(&mut self, atom: Atom) -> PlanResult<i32> {
        if let Some(&id) = self.variable_map.get(&atom) {
            return Ok(id);
        }

        self.validate(&atom)?;

        self.atoms.push(atom);
        let id = self.atoms.len() as i32;
        self.variable_map.insert(atom, id);
        Ok(id)
    }

    /// ID of an atom that must already be declared
    pub fn require(&self, atom: Atom) -> PlanResult<i32> {
        self.lookup(atom).ok_or(PlanError::UndeclaredAtom(atom))
    }

    pub fn lookup(&self, atom: Atom) -> Option<i32> {
        self.variable_map.get(&atom).copied()
    }

    /// Atom behind a variable ID
    pub fn atom(&self, id: i32) -> Option<&Atom> {
        if id <= 0 {
            return None;
        }
        self.atoms.get(id as usize - 1)
    }

    /// Get the total number of variables created
    pub fn variable_count(&self) -> usize {
        self.atoms.len()
    }

    /// Validate that an atom is within bounds
    fn validate(&self, atom: &Atom) -> PlanResult<()> {
        let out_of_range = |reason: String| PlanError::AtomOutOfRange {
            atom: *atom,
            reason,
        };

        match *atom {
            Atom::Position { step, row, col, tile } => {
                if row >= SIZE || col >= SIZE {
                    return Err(out_of_range(format!("cell ({}, {}) is off the board", row, col)));
                }
                if tile as usize >= CELLS {
                    return Err(out_of_range(format!("tile {} does not exist", tile)));
                }
                if let Some(bound) = self.bound {
                    if step > bound {
                        return Err(out_of_range(format!("step {} exceeds bound {}", step, bound)));
                    }
                }
            }
            Atom::Action { step, .. } => {
                if let Some(bound) = self.bound {
                    if step >= bound {
                        return Err(out_of_range(format!(
                            "action step {} must be below bound {}",
                            step, bound
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        let position_variables = self
            .atoms
            .iter()
            .filter(|atom| matches!(atom, Atom::Position { .. }))
            .count();

        VariableStatistics {
            total_variables: self.variable_count(),
            position_variables,
            action_variables: self.variable_count() - position_variables,
        }
    }
}

/// Number of atoms the schema declares for `bound`
pub fn expected_variables(bound: usize) -> usize {
    (bound + 1) * POSITION_ATOMS_PER_STEP + bound * ACTION_ATOMS_PER_STEP
}

/// Declares every atom of the encoding for one plan-length bound
pub struct VariableSchema {
    bound: usize,
}

impl VariableSchema {
    pub fn new(bound: usize) -> Self {
        Self { bound }
    }

    /// Position atoms for steps `0..=bound`, in canonical order
    pub fn position_atoms(&self) -> impl Iterator<Item = Atom> {
        (0..=self.bound).flat_map(|step| {
            (0..SIZE).flat_map(move |row| {
                (0..SIZE).flat_map(move |col| {
                    (0..CELLS as u8).map(move |tile| Atom::position(step, row, col, tile))
                })
            })
        })
    }

    /// Action atoms for steps `0..bound`, in canonical order
    pub fn action_atoms(&self) -> impl Iterator<Item = Atom> {
        (0..self.bound)
            .flat_map(|step| Action::ALL.into_iter().map(move |kind| Atom::action(step, kind)))
    }

    /// Register every atom so later lookups never allocate fresh ids
    pub fn declare(&self, registry: &mut VariableRegistry) -> PlanResult<()> {
        for atom in self.position_atoms().chain(self.action_atoms()) {
            registry.get_or_create(atom)?;
        }
        Ok(())
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub position_variables: usize,
    pub action_variables: usize,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Position variables: {}", self.position_variables)?;
        writeln!(f, "  Action variables: {}", self.action_variables)?;
        Ok(())
    }
}
