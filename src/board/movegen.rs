//! Legal move generation, attack detection and perft.

use super::state::Board;
use super::types::{
    Color, Move, MoveKind, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K,
    CASTLE_WHITE_Q,
};
use super::{B1, B8, C1, C8, D1, D8, E1, E8, F1, F8, G1, G8};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Step from `sq` by (rank, file) deltas, staying on the board.
fn offset(sq: Square, dr: i8, df: i8) -> Option<Square> {
    let rank = sq.rank() as i8 + dr;
    let file = sq.file() as i8 + df;
    if (0..8).contains(&rank) && (0..8).contains(&file) {
        Some(Square::new(rank as u8, file as u8))
    } else {
        None
    }
}

impl Board {
    /// All legal moves for the side to move.
    #[must_use]
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let mover = self.side_to_move();
        let pseudo = self.pseudo_legal_moves();
        let mut legal = Vec::with_capacity(pseudo.len());
        for mv in pseudo {
            self.push(mv);
            if !self.in_check(mover) {
                legal.push(mv);
            }
            self.pop(mv);
        }
        legal
    }

    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(sq) => self.is_square_attacked(sq, color.opponent()),
            None => false,
        }
    }

    /// Whether any piece of `by` attacks `sq`.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        // Pawns: a pawn of `by` one rank behind (from its own direction of
        // travel) on an adjacent file attacks sq.
        let pawn_dir: i8 = if by == Color::White { 1 } else { -1 };
        for df in [-1i8, 1] {
            if let Some(origin) = offset(sq, -pawn_dir, df) {
                if self.squares[origin.index()] == Some((by, Piece::Pawn)) {
                    return true;
                }
            }
        }

        for &(dr, df) in &KNIGHT_OFFSETS {
            if let Some(origin) = offset(sq, dr, df) {
                if self.squares[origin.index()] == Some((by, Piece::Knight)) {
                    return true;
                }
            }
        }

        for &(dr, df) in &KING_OFFSETS {
            if let Some(origin) = offset(sq, dr, df) {
                if self.squares[origin.index()] == Some((by, Piece::King)) {
                    return true;
                }
            }
        }

        for &(dr, df) in &ORTHOGONAL_DIRS {
            let mut cur = sq;
            while let Some(next) = offset(cur, dr, df) {
                if let Some((color, piece)) = self.squares[next.index()] {
                    if color == by && (piece == Piece::Rook || piece == Piece::Queen) {
                        return true;
                    }
                    break;
                }
                cur = next;
            }
        }

        for &(dr, df) in &DIAGONAL_DIRS {
            let mut cur = sq;
            while let Some(next) = offset(cur, dr, df) {
                if let Some((color, piece)) = self.squares[next.index()] {
                    if color == by && (piece == Piece::Bishop || piece == Piece::Queen) {
                        return true;
                    }
                    break;
                }
                cur = next;
            }
        }

        false
    }

    #[must_use]
    pub fn is_checkmate(&mut self) -> bool {
        self.legal_moves().is_empty() && self.in_check(self.side_to_move())
    }

    #[must_use]
    pub fn is_stalemate(&mut self) -> bool {
        self.legal_moves().is_empty() && !self.in_check(self.side_to_move())
    }

    fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mover = self.side_to_move();
        let mut moves = Vec::with_capacity(64);

        for idx in 0..64 {
            let piece = match self.squares[idx] {
                Some((color, piece)) if color == mover => piece,
                _ => continue,
            };
            let from = Square::from_index(idx);
            match piece {
                Piece::Pawn => self.pawn_moves(from, mover, &mut moves),
                Piece::Knight => {
                    self.leaper_moves(from, mover, &KNIGHT_OFFSETS, MoveKind::Quiet, &mut moves);
                }
                Piece::Bishop => self.slider_moves(from, mover, &DIAGONAL_DIRS, &mut moves),
                Piece::Rook => self.slider_moves(from, mover, &ORTHOGONAL_DIRS, &mut moves),
                Piece::Queen => {
                    self.slider_moves(from, mover, &ORTHOGONAL_DIRS, &mut moves);
                    self.slider_moves(from, mover, &DIAGONAL_DIRS, &mut moves);
                }
                Piece::King => {
                    self.leaper_moves(from, mover, &KING_OFFSETS, MoveKind::KingMove, &mut moves);
                }
            }
        }

        self.castle_moves(mover, &mut moves);
        moves
    }

    fn leaper_moves(
        &self,
        from: Square,
        mover: Color,
        offsets: &[(i8, i8)],
        kind: MoveKind,
        moves: &mut Vec<Move>,
    ) {
        for &(dr, df) in offsets {
            if let Some(to) = offset(from, dr, df) {
                match self.squares[to.index()] {
                    None => moves.push(Move {
                        from,
                        to,
                        capture: None,
                        kind,
                    }),
                    Some((color, piece)) if color != mover => moves.push(Move {
                        from,
                        to,
                        capture: Some(piece),
                        kind,
                    }),
                    Some(_) => {}
                }
            }
        }
    }

    fn slider_moves(
        &self,
        from: Square,
        mover: Color,
        dirs: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, df) in dirs {
            let mut cur = from;
            while let Some(to) = offset(cur, dr, df) {
                match self.squares[to.index()] {
                    None => {
                        moves.push(Move {
                            from,
                            to,
                            capture: None,
                            kind: MoveKind::Quiet,
                        });
                        cur = to;
                    }
                    Some((color, piece)) => {
                        if color != mover {
                            moves.push(Move {
                                from,
                                to,
                                capture: Some(piece),
                                kind: MoveKind::Quiet,
                            });
                        }
                        break;
                    }
                }
            }
        }
    }

    fn pawn_moves(&self, from: Square, mover: Color, moves: &mut Vec<Move>) {
        let (dir, start_rank, promo_rank, double_kind, ep_kind) = match mover {
            Color::White => (
                1i8,
                1u8,
                7u8,
                MoveKind::WhiteDoublePush,
                MoveKind::WhiteEnPassant,
            ),
            Color::Black => (
                -1i8,
                6u8,
                0u8,
                MoveKind::BlackDoublePush,
                MoveKind::BlackEnPassant,
            ),
        };

        if let Some(one) = offset(from, dir, 0) {
            if self.squares[one.index()].is_none() {
                if one.rank() == promo_rank {
                    push_promotions(from, one, None, moves);
                } else {
                    moves.push(Move {
                        from,
                        to: one,
                        capture: None,
                        kind: MoveKind::Quiet,
                    });
                    if from.rank() == start_rank {
                        if let Some(two) = offset(from, 2 * dir, 0) {
                            if self.squares[two.index()].is_none() {
                                moves.push(Move {
                                    from,
                                    to: two,
                                    capture: None,
                                    kind: double_kind,
                                });
                            }
                        }
                    }
                }
            }
        }

        for df in [-1i8, 1] {
            if let Some(to) = offset(from, dir, df) {
                match self.squares[to.index()] {
                    Some((color, piece)) if color != mover => {
                        if to.rank() == promo_rank {
                            push_promotions(from, to, Some(piece), moves);
                        } else {
                            moves.push(Move {
                                from,
                                to,
                                capture: Some(piece),
                                kind: MoveKind::Quiet,
                            });
                        }
                    }
                    None => {
                        if self.en_passant_target == Some(to) {
                            moves.push(Move {
                                from,
                                to,
                                capture: Some(Piece::Pawn),
                                kind: ep_kind,
                            });
                        }
                    }
                    Some(_) => {}
                }
            }
        }
    }

    fn castle_moves(&self, mover: Color, moves: &mut Vec<Move>) {
        match mover {
            Color::White => {
                if self.castling_rights & CASTLE_WHITE_K != 0
                    && self.squares[F1.index()].is_none()
                    && self.squares[G1.index()].is_none()
                    && !self.is_square_attacked(E1, Color::Black)
                    && !self.is_square_attacked(F1, Color::Black)
                    && !self.is_square_attacked(G1, Color::Black)
                {
                    moves.push(Move {
                        from: E1,
                        to: G1,
                        capture: None,
                        kind: MoveKind::WhiteKingsideCastle,
                    });
                }
                if self.castling_rights & CASTLE_WHITE_Q != 0
                    && self.squares[D1.index()].is_none()
                    && self.squares[C1.index()].is_none()
                    && self.squares[B1.index()].is_none()
                    && !self.is_square_attacked(E1, Color::Black)
                    && !self.is_square_attacked(D1, Color::Black)
                    && !self.is_square_attacked(C1, Color::Black)
                {
                    moves.push(Move {
                        from: E1,
                        to: C1,
                        capture: None,
                        kind: MoveKind::WhiteQueensideCastle,
                    });
                }
            }
            Color::Black => {
                if self.castling_rights & CASTLE_BLACK_K != 0
                    && self.squares[F8.index()].is_none()
                    && self.squares[G8.index()].is_none()
                    && !self.is_square_attacked(E8, Color::White)
                    && !self.is_square_attacked(F8, Color::White)
                    && !self.is_square_attacked(G8, Color::White)
                {
                    moves.push(Move {
                        from: E8,
                        to: G8,
                        capture: None,
                        kind: MoveKind::BlackKingsideCastle,
                    });
                }
                if self.castling_rights & CASTLE_BLACK_Q != 0
                    && self.squares[D8.index()].is_none()
                    && self.squares[C8.index()].is_none()
                    && self.squares[B8.index()].is_none()
                    && !self.is_square_attacked(E8, Color::White)
                    && !self.is_square_attacked(D8, Color::White)
                    && !self.is_square_attacked(C8, Color::White)
                {
                    moves.push(Move {
                        from: E8,
                        to: C8,
                        capture: None,
                        kind: MoveKind::BlackQueensideCastle,
                    });
                }
            }
        }
    }

    /// Count leaf nodes of the move-generation tree to `depth`.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in moves {
            self.push(mv);
            nodes += self.perft(depth - 1);
            self.pop(mv);
        }
        nodes
    }
}

fn push_promotions(from: Square, to: Square, capture: Option<Piece>, moves: &mut Vec<Move>) {
    for kind in [
        MoveKind::PromoteQueen,
        MoveKind::PromoteRook,
        MoveKind::PromoteBishop,
        MoveKind::PromoteKnight,
    ] {
        moves.push(Move {
            from,
            to,
            capture,
            kind,
        });
    }
}
