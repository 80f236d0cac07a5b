//! Board test suite.
//!
//! - `fen.rs` - FEN parsing and round trips
//! - `make_unmake.rs` - `push`/`pop` correctness over every move kind
//! - `movegen.rs` - perft counts and special-move generation
//! - `draw.rs` - draw-by-rule classification
//! - `proptest.rs` - property tests for hash and push/pop invariants

mod draw;
mod fen;

use super::{Board, Move};

/// Find a legal move by its terse notation, or panic.
pub(crate) fn find_move(board: &mut Board, terse: &str) -> Move {
    board
        .legal_moves()
        .into_iter()
        .find(|mv| mv.to_string() == terse)
        .unwrap_or_else(|| panic!("move {terse} not legal in {}", board.to_fen()))
}
