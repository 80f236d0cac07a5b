//! FEN parsing and formatting.

use std::fmt::Write;

use super::error::FenError;
use super::state::Board;
use super::types::{
    Color, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};
use super::{A1, A8, E1, E8, H1, H8};

impl Board {
    /// Parse a FEN position. The halfmove clock and fullmove number are
    /// optional and default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankCount { found: ranks.len() });
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else {
                    match Piece::from_char(c) {
                        Some((color, piece)) => {
                            if file > 7 {
                                return Err(FenError::TooManyFiles { rank: rank + 1 });
                            }
                            board.squares[Square::new(rank, file).index()] =
                                Some((color, piece));
                            file += 1;
                        }
                        None => return Err(FenError::InvalidPiece { piece: c }),
                    }
                }
                if file > 8 {
                    return Err(FenError::TooManyFiles { rank: rank + 1 });
                }
            }
        }

        board.white_to_move = match parts[1] {
            "w" => true,
            "b" => false,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                board.castling_rights |= match c {
                    'K' => CASTLE_WHITE_K,
                    'Q' => CASTLE_WHITE_Q,
                    'k' => CASTLE_BLACK_K,
                    'q' => CASTLE_BLACK_Q,
                    _ => return Err(FenError::InvalidCastling { castling: c }),
                };
            }
        }
        // Drop rights the piece placement cannot support
        board.castling_rights &= placement_rights(&board);

        if parts[3] != "-" {
            match Square::from_algebraic(parts[3]) {
                Some(sq) => board.en_passant_target = Some(sq),
                None => {
                    return Err(FenError::InvalidEnPassant {
                        found: parts[3].to_string(),
                    })
                }
            }
        }

        if parts.len() > 4 {
            board.halfmove_clock = parts[4].parse().unwrap_or(0);
        }
        if parts.len() > 5 {
            board.fullmove_number = parts[5].parse().unwrap_or(1);
        }

        Ok(board)
    }

    /// Emit the position as FEN.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                match self.squares[Square::new(rank, file).index()] {
                    None => empty_run += 1,
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            let _ = write!(fen, "{empty_run}");
                            empty_run = 0;
                        }
                        let c = piece.to_char();
                        fen.push(if color == Color::White {
                            c.to_ascii_uppercase()
                        } else {
                            c
                        });
                    }
                }
            }
            if empty_run > 0 {
                let _ = write!(fen, "{empty_run}");
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.white_to_move { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            if self.castling_rights & CASTLE_WHITE_K != 0 {
                fen.push('K');
            }
            if self.castling_rights & CASTLE_WHITE_Q != 0 {
                fen.push('Q');
            }
            if self.castling_rights & CASTLE_BLACK_K != 0 {
                fen.push('k');
            }
            if self.castling_rights & CASTLE_BLACK_Q != 0 {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant_target {
            Some(sq) => {
                let _ = write!(fen, "{sq}");
            }
            None => fen.push('-'),
        }

        let _ = write!(fen, " {} {}", self.halfmove_clock, self.fullmove_number);
        fen
    }
}

/// Castling rights the piece placement can actually support.
fn placement_rights(board: &Board) -> u8 {
    let mut mask = 0;
    if board.piece_at(E1) == Some((Color::White, Piece::King)) {
        if board.piece_at(H1) == Some((Color::White, Piece::Rook)) {
            mask |= CASTLE_WHITE_K;
        }
        if board.piece_at(A1) == Some((Color::White, Piece::Rook)) {
            mask |= CASTLE_WHITE_Q;
        }
    }
    if board.piece_at(E8) == Some((Color::Black, Piece::King)) {
        if board.piece_at(H8) == Some((Color::Black, Piece::Rook)) {
            mask |= CASTLE_BLACK_K;
        }
        if board.piece_at(A8) == Some((Color::Black, Piece::Rook)) {
            mask |= CASTLE_BLACK_Q;
        }
    }
    mask
}
