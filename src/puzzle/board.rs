//! 3x3 board representation for the 8-puzzle

use super::Action;
use crate::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the board
pub const SIZE: usize = 3;
/// Number of cells, which is also the number of tile identities (blank included)
pub const CELLS: usize = SIZE * SIZE;
/// Tile value of the blank
pub const BLANK: u8 = 0;

/// A board state: every tile 0..=8 appears in exactly one cell, 0 is the blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Board {
    tiles: [[u8; SIZE]; SIZE],
}

impl Board {
    /// Create a board, checking that it is a permutation of 0..=8
    pub fn new(tiles: [[u8; SIZE]; SIZE]) -> PlanResult<Self> {
        let mut seen = [false; CELLS];
        for row in &tiles {
            for &tile in row {
                let idx = tile as usize;
                if idx >= CELLS {
                    return Err(PlanError::InvalidBoard(format!(
                        "tile {} out of range 0..={}",
                        tile,
                        CELLS - 1
                    )));
                }
                if seen[idx] {
                    return Err(PlanError::InvalidBoard(format!("tile {} appears twice", tile)));
                }
                seen[idx] = true;
            }
        }
        Ok(Self { tiles })
    }

    /// The goal board: tiles 0..=8 in row-major order, blank top-left
    pub fn goal() -> Self {
        let mut tiles = [[0u8; SIZE]; SIZE];
        for (row, cells) in tiles.iter_mut().enumerate() {
            for (col, tile) in cells.iter_mut().enumerate() {
                *tile = (row * SIZE + col) as u8;
            }
        }
        Self { tiles }
    }

    /// Build a board from rows of arbitrary length, as read from text or JSON
    pub fn from_rows(rows: Vec<Vec<u8>>) -> PlanResult<Self> {
        if rows.len() != SIZE {
            return Err(PlanError::InvalidBoard(format!(
                "expected {} rows, found {}",
                SIZE,
                rows.len()
            )));
        }
        let mut tiles = [[0u8; SIZE]; SIZE];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != SIZE {
                return Err(PlanError::InvalidBoard(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    SIZE
                )));
            }
            tiles[r].copy_from_slice(row);
        }
        Self::new(tiles)
    }

    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.tiles.iter().map(|row| row.to_vec()).collect()
    }

    /// Tile at a cell
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.tiles[row][col]
    }

    /// Iterate over `(row, col, tile)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &tile)| (r, c, tile)))
    }

    /// Cell currently holding the blank
    pub fn blank(&self) -> (usize, usize) {
        self.cells()
            .find(|&(_, _, tile)| tile == BLANK)
            .map(|(r, c, _)| (r, c))
            .unwrap_or((0, 0))
    }

    pub fn is_goal(&self) -> bool {
        *self == Self::goal()
    }

    /// Directional actions the blank can take from its current cell
    pub fn legal_actions(&self) -> Vec<Action> {
        let (row, col) = self.blank();
        Action::DIRECTIONAL
            .into_iter()
            .filter(|action| action.destination(row, col, SIZE).is_some())
            .collect()
    }

    /// Board after applying `action`, swapping the blank with its neighbour
    ///
    /// `step` is only used to label an [`PlanError::InvalidMove`].
    pub fn apply(&self, action: Action, step: usize) -> PlanResult<Board> {
        if action.is_noop() {
            return Ok(*self);
        }
        let (row, col) = self.blank();
        let (nr, nc) = action
            .destination(row, col, SIZE)
            .ok_or(PlanError::InvalidMove { step, action, row, col })?;

        let mut next = *self;
        next.tiles[row][col] = self.tiles[nr][nc];
        next.tiles[nr][nc] = BLANK;
        Ok(next)
    }

    /// Manhattan distance of the blank from its goal cell, a lower bound on plan length
    pub fn blank_distance(&self) -> usize {
        let (row, col) = self.blank();
        row + col
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::goal()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Board {
    type Error = PlanError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<u8>> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}

impl FromStr for Board {
    type Err = PlanError;

    /// Accepts nine tiles separated by whitespace, commas or newlines,
    /// or a single run of nine digits such as `"120345678"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();

        let values: Vec<u8> = if tokens.len() == 1 && tokens[0].len() == CELLS {
            tokens[0]
                .chars()
                .map(|ch| {
                    ch.to_digit(10)
                        .map(|d| d as u8)
                        .ok_or_else(|| PlanError::InvalidBoard(format!("invalid character '{}'", ch)))
                })
                .collect::<PlanResult<_>>()?
        } else {
            tokens
                .iter()
                .map(|t| {
                    t.parse::<u8>()
                        .map_err(|_| PlanError::InvalidBoard(format!("invalid tile '{}'", t)))
                })
                .collect::<PlanResult<_>>()?
        };

        if values.len() != CELLS {
            return Err(PlanError::InvalidBoard(format!(
                "expected {} tiles, found {}",
                CELLS,
                values.len()
            )));
        }

        Self::from_rows(values.chunks(SIZE).map(|row| row.to_vec()).collect())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.tiles {
            let line: Vec<String> = row.iter().map(|t| t.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_layout() {
        let goal = Board::goal();
        assert_eq!(goal.rows(), vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]);
        assert_eq!(goal.blank(), (0, 0));
        assert!(goal.is_goal());
    }

    #[test]
    fn test_rejects_non_permutations() {
        assert!(Board::new([[0, 1, 2], [3, 4, 5], [6, 7, 7]]).is_err());
        assert!(Board::new([[0, 1, 2], [3, 4, 5], [6, 7, 9]]).is_err());
        assert!(Board::from_rows(vec![vec![0, 1, 2], vec![3, 4, 5]]).is_err());
    }

    #[test]
    fn test_apply_swaps_blank() {
        let board = Board::new([[1, 2, 0], [3, 4, 5], [6, 7, 8]]).unwrap();
        let next = board.apply(Action::Left, 0).unwrap();
        assert_eq!(next.rows(), vec![vec![1, 0, 2], vec![3, 4, 5], vec![6, 7, 8]]);
        let goal = next.apply(Action::Left, 1).unwrap();
        assert!(goal.is_goal());
    }

    #[test]
    fn test_apply_out_of_bounds() {
        let result = Board::goal().apply(Action::Up, 3);
        assert_eq!(
            result,
            Err(PlanError::InvalidMove {
                step: 3,
                action: Action::Up,
                row: 0,
                col: 0
            })
        );
        assert_eq!(Board::goal().apply(Action::NoOp, 0), Ok(Board::goal()));
    }

    #[test]
    fn test_legal_actions() {
        assert_eq!(Board::goal().legal_actions(), vec![Action::Down, Action::Right]);
        let center = Board::new([[1, 2, 3], [4, 0, 5], [6, 7, 8]]).unwrap();
        assert_eq!(center.legal_actions().len(), 4);
    }

    #[test]
    fn test_parse() {
        let a: Board = "1 2 0\n3 4 5\n6 7 8".parse().unwrap();
        let b: Board = "120345678".parse().unwrap();
        let c: Board = "1,2,0,3,4,5,6,7,8".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert!("12034567".parse::<Board>().is_err());
        assert!("1 2 0 3 4 5 6 7 x".parse::<Board>().is_err());
    }

    #[test]
    fn test_serde_as_rows() {
        let board = Board::new([[1, 2, 0], [3, 4, 5], [6, 7, 8]]).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "[[1,2,0],[3,4,5],[6,7,8]]");
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert!(serde_json::from_str::<Board>("[[1,1,0],[3,4,5],[6,7,8]]").is_err());
    }
}
