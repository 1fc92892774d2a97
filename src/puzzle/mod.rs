//! 8-puzzle board, actions and scrambling

pub mod board;
pub mod io;
pub mod moves;
pub mod scramble;

pub use board::{Board, BLANK, CELLS, SIZE};
pub use io::{create_example_boards, load_board_from_file, save_board_to_file};
pub use moves::{parse_actions, Action};
pub use scramble::{rng_from_seed, scramble};
