//! Actions of the 8-puzzle, named by the direction the blank travels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action executed at one plan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    NoOp,
}

impl Action {
    /// All action kinds, in schema order
    pub const ALL: [Action; 5] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::NoOp,
    ];

    /// The four actions that move the blank
    pub const DIRECTIONAL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Row/column displacement of the blank, `None` for NoOp
    pub fn delta(self) -> Option<(isize, isize)> {
        match self {
            Action::Up => Some((-1, 0)),
            Action::Down => Some((1, 0)),
            Action::Left => Some((0, -1)),
            Action::Right => Some((0, 1)),
            Action::NoOp => None,
        }
    }

    /// Position of this action within [`Action::ALL`]
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
            Action::NoOp => 4,
        }
    }

    pub fn is_noop(self) -> bool {
        self == Action::NoOp
    }

    /// Action that undoes this one
    pub fn inverse(self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
            Action::NoOp => Action::NoOp,
        }
    }

    /// Destination of the blank when it starts at `(row, col)`, if it stays on the board
    pub fn destination(self, row: usize, col: usize, size: usize) -> Option<(usize, usize)> {
        let (dr, dc) = self.delta()?;
        let r = row as isize + dr;
        let c = col as isize + dc;
        if r >= 0 && r < size as isize && c >= 0 && c < size as isize {
            Some((r as usize, c as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "Up",
            Action::Down => "Down",
            Action::Left => "Left",
            Action::Right => "Right",
            Action::NoOp => "NoOp",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Action::Up),
            "d" | "down" => Ok(Action::Down),
            "l" | "left" => Ok(Action::Left),
            "r" | "right" => Ok(Action::Right),
            "n" | "noop" | "none" => Ok(Action::NoOp),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

/// Parse a comma or whitespace separated list of actions, e.g. `"Left, Up"`
pub fn parse_actions(text: &str) -> Result<Vec<Action>, String> {
    text.split(|c: char| c == ',' || c.is_whitespace() || c == '>')
        .map(|token| token.trim_matches('-'))
        .filter(|token| !token.is_empty())
        .map(Action::from_str)
        .collect()
}
