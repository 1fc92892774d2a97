//! Reconstruct plans and boards from a satisfying model

use crate::error::{PlanError, PlanResult};
use crate::puzzle::{Action, Board, CELLS, SIZE};
use crate::sat::{Atom, Model, VariableRegistry};

/// Action sequence encoded in `model`, NoOps dropped
pub fn extract_actions(
    model: &Model,
    registry: &VariableRegistry,
    bound: usize,
) -> PlanResult<Vec<Action>> {
    let mut actions = Vec::with_capacity(bound);

    for step in 0..bound {
        let mut chosen = Vec::with_capacity(1);
        for kind in Action::ALL {
            let var = registry.require(Atom::action(step, kind))?;
            if model.value(var) {
                chosen.push(kind);
            }
        }

        match chosen.as_slice() {
            [kind] => {
                if !kind.is_noop() {
                    actions.push(*kind);
                }
            }
            [] => {
                return Err(PlanError::Decoding {
                    step,
                    reason: "no action is true".to_string(),
                })
            }
            many => {
                return Err(PlanError::Decoding {
                    step,
                    reason: format!("{} actions are true", many.len()),
                })
            }
        }
    }

    Ok(actions)
}

/// Board encoded by the position atoms of one step
pub fn decode_board(model: &Model, registry: &VariableRegistry, step: usize) -> PlanResult<Board> {
    let mut rows = vec![vec![0u8; SIZE]; SIZE];

    for (row, cells) in rows.iter_mut().enumerate() {
        for (col, slot) in cells.iter_mut().enumerate() {
            let mut tiles = Vec::with_capacity(1);
            for tile in 0..CELLS as u8 {
                let var = registry.require(Atom::position(step, row, col, tile))?;
                if model.value(var) {
                    tiles.push(tile);
                }
            }
            match tiles.as_slice() {
                [tile] => *slot = *tile,
                other => {
                    return Err(PlanError::Decoding {
                        step,
                        reason: format!("cell ({}, {}) holds {} tiles", row, col, other.len()),
                    })
                }
            }
        }
    }

    Board::from_rows(rows).map_err(|e| PlanError::Decoding {
        step,
        reason: e.to_string(),
    })
}

/// Boards for every step `0..=bound`
pub fn decode_boards(
    model: &Model,
    registry: &VariableRegistry,
    bound: usize,
) -> PlanResult<Vec<Board>> {
    (0..=bound)
        .map(|step| decode_board(model, registry, step))
        .collect()
}
