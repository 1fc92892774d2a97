//! File I/O for puzzle boards

use super::Board;
use anyhow::{Context, Result};
use std::path::Path;

/// Load a board from a text file
/// Format: three lines of three whitespace-separated tiles, 0 for the blank.
/// Lines starting with `#` are ignored.
pub fn load_board_from_file<P: AsRef<Path>>(path: P) -> Result<Board> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read board file: {}", path.as_ref().display()))?;

    parse_board_from_string(&content)
        .with_context(|| format!("Failed to parse board from file: {}", path.as_ref().display()))
}

/// Parse a board from its text representation
pub fn parse_board_from_string(content: &str) -> Result<Board> {
    let body: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if body.is_empty() {
        anyhow::bail!("Board file is empty or contains no valid rows");
    }

    Ok(body.join("\n").parse::<Board>()?)
}

/// Save a board to a text file
pub fn save_board_to_file<P: AsRef<Path>>(board: &Board, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, board.to_string())
        .with_context(|| format!("Failed to write board to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Create example board files in the given directory
pub fn create_example_boards<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let examples = [
        ("two_moves.txt", "1 2 0\n3 4 5\n6 7 8\n"),
        ("three_moves.txt", "1 2 5\n3 4 0\n6 7 8\n"),
        ("solved.txt", "0 1 2\n3 4 5\n6 7 8\n"),
    ];

    for (name, content) in examples {
        std::fs::write(dir.join(name), content)
            .with_context(|| format!("Failed to write example board {}", name))?;
    }

    Ok(())
}
