//! Zobrist position hashing.
//!
//! 781 64-bit keys in four blocks: 768 piece-square keys (12 piece kinds x
//! 64 squares, black/white interleaved per kind), 4 castling-right keys,
//! 8 en-passant file keys and one side-to-move key XORed while white is to
//! move. The en-passant key participates only when a pawn of the side to
//! move actually stands beside the pushed pawn, so positions that differ
//! only by an unusable en-passant target hash identically.
//!
//! Keys come from a fixed-seed generator: opening-book files are keyed by
//! these hashes, so they must not change between runs.
//!
//! [`update`] is called with the board still in the pre-move position and
//! is its own inverse: applying it again after `pop` restores the previous
//! hash. That symmetry is what lets the search maintain the hash around
//! `push`/`pop` without recomputing it.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{
    Board, Color, Move, MoveKind, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K,
    CASTLE_WHITE_Q,
};
use crate::board::{A1, A8, C1, C8, D1, D8, E1, E8, F1, F8, G1, G8, H1, H8};

struct ZobristKeys {
    piece_square: [[u64; 64]; 12],
    castling: [u64; 4],
    en_passant_file: [u64; 8],
    white_to_move: u64,
}

const KEY_SEED: u64 = 0x0CE1_07C4_E55E_ED01;

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(KEY_SEED);
    let mut piece_square = [[0u64; 64]; 12];
    for kind in &mut piece_square {
        for key in kind.iter_mut() {
            *key = rng.gen();
        }
    }
    let mut castling = [0u64; 4];
    for key in &mut castling {
        *key = rng.gen();
    }
    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.gen();
    }
    ZobristKeys {
        piece_square,
        castling,
        en_passant_file,
        white_to_move: rng.gen(),
    }
});

// Castling key indices
const WK: usize = 0;
const WQ: usize = 1;
const BK: usize = 2;
const BQ: usize = 3;

#[inline]
fn piece_key(color: Color, piece: Piece, sq: Square) -> u64 {
    // Black piece of each kind first, then white
    let kind = piece.index() * 2 + usize::from(color == Color::White);
    KEYS.piece_square[kind][sq.index()]
}

/// Hash a position from scratch.
#[must_use]
pub fn hash(board: &Board) -> u64 {
    let keys = &*KEYS;
    let mut h = 0u64;

    for idx in 0..64 {
        let sq = Square::from_index(idx);
        if let Some((color, piece)) = board.piece_at(sq) {
            h ^= piece_key(color, piece, sq);
        }
    }

    let rights = board.castling_rights();
    if rights & CASTLE_WHITE_K != 0 {
        h ^= keys.castling[WK];
    }
    if rights & CASTLE_WHITE_Q != 0 {
        h ^= keys.castling[WQ];
    }
    if rights & CASTLE_BLACK_K != 0 {
        h ^= keys.castling[BK];
    }
    if rights & CASTLE_BLACK_Q != 0 {
        h ^= keys.castling[BQ];
    }

    if let Some(file) = reachable_en_passant_file(board) {
        h ^= keys.en_passant_file[file];
    }

    if board.white_to_move() {
        h ^= keys.white_to_move;
    }

    h
}

/// Incrementally update `hash` across `mv`. Must be called with the board
/// still in the pre-move position: before `push`, or again after `pop` to
/// roll the hash back.
#[must_use]
pub fn update(hash: u64, board: &Board, mv: Move) -> u64 {
    let keys = &*KEYS;
    let mut h = hash;
    let (color, piece) = match board.piece_at(mv.from) {
        Some(occupant) => occupant,
        None => {
            debug_assert!(false, "hash update from empty square {}", mv.from);
            return hash;
        }
    };
    let rights = board.castling_rights();

    match mv.kind {
        MoveKind::Quiet
        | MoveKind::KingMove
        | MoveKind::WhiteDoublePush
        | MoveKind::BlackDoublePush => {
            if let Some(captured) = mv.capture {
                h ^= piece_key(color.opponent(), captured, mv.to);
            }
            h ^= piece_key(color, piece, mv.from);
            h ^= piece_key(color, piece, mv.to);

            // Rights revoked by moving the king or a rook off its home square
            match piece {
                Piece::King => {
                    if color == Color::White {
                        if rights & CASTLE_WHITE_K != 0 {
                            h ^= keys.castling[WK];
                        }
                        if rights & CASTLE_WHITE_Q != 0 {
                            h ^= keys.castling[WQ];
                        }
                    } else {
                        if rights & CASTLE_BLACK_K != 0 {
                            h ^= keys.castling[BK];
                        }
                        if rights & CASTLE_BLACK_Q != 0 {
                            h ^= keys.castling[BQ];
                        }
                    }
                }
                Piece::Rook => {
                    if color == Color::White {
                        if mv.from == H1 && rights & CASTLE_WHITE_K != 0 {
                            h ^= keys.castling[WK];
                        }
                        if mv.from == A1 && rights & CASTLE_WHITE_Q != 0 {
                            h ^= keys.castling[WQ];
                        }
                    } else {
                        if mv.from == H8 && rights & CASTLE_BLACK_K != 0 {
                            h ^= keys.castling[BK];
                        }
                        if mv.from == A8 && rights & CASTLE_BLACK_Q != 0 {
                            h ^= keys.castling[BQ];
                        }
                    }
                }
                _ => {}
            }

            // A double push creates an en-passant file only when an enemy
            // pawn stands beside the pushed pawn
            if matches!(mv.kind, MoveKind::WhiteDoublePush | MoveKind::BlackDoublePush)
                && enemy_pawn_beside(board, mv.to, color)
            {
                h ^= keys.en_passant_file[mv.to.file() as usize];
            }
        }
        MoveKind::PromoteQueen
        | MoveKind::PromoteRook
        | MoveKind::PromoteBishop
        | MoveKind::PromoteKnight => {
            if let Some(captured) = mv.capture {
                h ^= piece_key(color.opponent(), captured, mv.to);
            }
            h ^= piece_key(color, Piece::Pawn, mv.from);
            let promoted = mv.kind.promotion_piece().unwrap_or(Piece::Queen);
            h ^= piece_key(color, promoted, mv.to);
        }
        MoveKind::WhiteEnPassant => {
            h ^= piece_key(Color::White, Piece::Pawn, mv.from);
            h ^= piece_key(Color::White, Piece::Pawn, mv.to);
            h ^= piece_key(Color::Black, Piece::Pawn, Square::new(4, mv.to.file()));
        }
        MoveKind::BlackEnPassant => {
            h ^= piece_key(Color::Black, Piece::Pawn, mv.from);
            h ^= piece_key(Color::Black, Piece::Pawn, mv.to);
            h ^= piece_key(Color::White, Piece::Pawn, Square::new(3, mv.to.file()));
        }
        MoveKind::WhiteKingsideCastle => {
            h ^= piece_key(Color::White, Piece::King, E1);
            h ^= piece_key(Color::White, Piece::King, G1);
            h ^= piece_key(Color::White, Piece::Rook, H1);
            h ^= piece_key(Color::White, Piece::Rook, F1);
            // The kingside right was necessarily held; the other side only if
            // still active
            h ^= keys.castling[WK];
            if rights & CASTLE_WHITE_Q != 0 {
                h ^= keys.castling[WQ];
            }
        }
        MoveKind::WhiteQueensideCastle => {
            h ^= piece_key(Color::White, Piece::King, E1);
            h ^= piece_key(Color::White, Piece::King, C1);
            h ^= piece_key(Color::White, Piece::Rook, A1);
            h ^= piece_key(Color::White, Piece::Rook, D1);
            h ^= keys.castling[WQ];
            if rights & CASTLE_WHITE_K != 0 {
                h ^= keys.castling[WK];
            }
        }
        MoveKind::BlackKingsideCastle => {
            h ^= piece_key(Color::Black, Piece::King, E8);
            h ^= piece_key(Color::Black, Piece::King, G8);
            h ^= piece_key(Color::Black, Piece::Rook, H8);
            h ^= piece_key(Color::Black, Piece::Rook, F8);
            h ^= keys.castling[BK];
            if rights & CASTLE_BLACK_Q != 0 {
                h ^= keys.castling[BQ];
            }
        }
        MoveKind::BlackQueensideCastle => {
            h ^= piece_key(Color::Black, Piece::King, E8);
            h ^= piece_key(Color::Black, Piece::King, C8);
            h ^= piece_key(Color::Black, Piece::Rook, A8);
            h ^= piece_key(Color::Black, Piece::Rook, D8);
            h ^= keys.castling[BQ];
            if rights & CASTLE_BLACK_K != 0 {
                h ^= keys.castling[BK];
            }
        }
    }

    // Capturing a rook on its home square revokes the victim's right
    if mv.capture == Some(Piece::Rook) {
        match color.opponent() {
            Color::White => {
                if mv.to == H1 && rights & CASTLE_WHITE_K != 0 {
                    h ^= keys.castling[WK];
                }
                if mv.to == A1 && rights & CASTLE_WHITE_Q != 0 {
                    h ^= keys.castling[WQ];
                }
            }
            Color::Black => {
                if mv.to == H8 && rights & CASTLE_BLACK_K != 0 {
                    h ^= keys.castling[BK];
                }
                if mv.to == A8 && rights & CASTLE_BLACK_Q != 0 {
                    h ^= keys.castling[BQ];
                }
            }
        }
    }

    // Any en-passant file valid in the pre-move position expires, played or
    // not
    if let Some(file) = reachable_en_passant_file(board) {
        h ^= keys.en_passant_file[file];
    }

    h ^= keys.white_to_move;
    h
}

/// File of the en-passant target if a capture onto it is actually available
/// to the side to move.
fn reachable_en_passant_file(board: &Board) -> Option<usize> {
    let target = board.en_passant_target()?;
    let (expected_rank, capture_rank, mover) = if board.white_to_move() {
        (5u8, 4u8, Color::White)
    } else {
        (2u8, 3u8, Color::Black)
    };
    if target.rank() != expected_rank {
        return None;
    }
    for df in [-1i8, 1] {
        let file = target.file() as i8 + df;
        if (0..8).contains(&file)
            && board.piece_at(Square::new(capture_rank, file as u8))
                == Some((mover, Piece::Pawn))
        {
            return Some(target.file() as usize);
        }
    }
    None
}

fn enemy_pawn_beside(board: &Board, sq: Square, mover: Color) -> bool {
    let enemy = mover.opponent();
    for df in [-1i8, 1] {
        let file = sq.file() as i8 + df;
        if (0..8).contains(&file)
            && board.piece_at(Square::new(sq.rank(), file as u8)) == Some((enemy, Piece::Pawn))
        {
            return true;
        }
    }
    false
}
