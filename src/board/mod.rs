//! Board primitive: mailbox board, reversible `push`/`pop`, legal move
//! generation, FEN.

mod error;
mod fen;
mod movegen;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::FenError;
pub use state::Board;
pub use types::{
    Color, Move, MoveKind, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K,
    CASTLE_WHITE_Q,
};

use types::Square as Sq;

// Named squares used by castling, hashing and FEN grooming.
pub(crate) const A1: Sq = Sq::new(0, 0);
pub(crate) const B1: Sq = Sq::new(0, 1);
pub(crate) const C1: Sq = Sq::new(0, 2);
pub(crate) const D1: Sq = Sq::new(0, 3);
pub(crate) const E1: Sq = Sq::new(0, 4);
pub(crate) const F1: Sq = Sq::new(0, 5);
pub(crate) const G1: Sq = Sq::new(0, 6);
pub(crate) const H1: Sq = Sq::new(0, 7);
pub(crate) const A8: Sq = Sq::new(7, 0);
pub(crate) const B8: Sq = Sq::new(7, 1);
pub(crate) const C8: Sq = Sq::new(7, 2);
pub(crate) const D8: Sq = Sq::new(7, 3);
pub(crate) const E8: Sq = Sq::new(7, 4);
pub(crate) const F8: Sq = Sq::new(7, 5);
pub(crate) const G8: Sq = Sq::new(7, 6);
pub(crate) const H8: Sq = Sq::new(7, 7);
