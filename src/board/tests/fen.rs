//! FEN parsing and round trips.

use crate::board::{Board, Color, FenError, Piece, Square, CASTLE_BLACK_Q, CASTLE_WHITE_K};

const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[test]
fn startpos_round_trips() {
    let board = Board::from_fen(STARTPOS).expect("valid fen");
    assert_eq!(board.to_fen(), STARTPOS);
    assert_eq!(Board::new().to_fen(), STARTPOS);
}

#[test]
fn parses_pieces_side_and_clocks() {
    let board =
        Board::from_fen("r1b1kb1r/pppp1ppp/5q2/4n3/3KP3/2N3PN/PPP4P/R1BQ1B1R b kq - 3 11")
            .expect("valid fen");
    assert!(!board.white_to_move());
    assert_eq!(board.halfmove_clock(), 3);
    assert_eq!(
        board.piece_at(Square::from_algebraic("d4").unwrap()),
        Some((Color::White, Piece::King))
    );
    assert_eq!(
        board.piece_at(Square::from_algebraic("f6").unwrap()),
        Some((Color::Black, Piece::Queen))
    );
    assert!(board.to_fen().ends_with("3 11"));
}

#[test]
fn clocks_are_optional() {
    let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").expect("valid fen");
    assert_eq!(board.halfmove_clock(), 0);
    assert!(board.to_fen().ends_with("0 1"));
}

#[test]
fn en_passant_target_is_parsed() {
    let board =
        Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .expect("valid fen");
    assert_eq!(board.en_passant_target(), Square::from_algebraic("e3"));
}

#[test]
fn rejects_malformed_input() {
    assert_eq!(
        Board::from_fen("4k3/8/8"),
        Err(FenError::TooFewParts { found: 1 })
    );
    assert_eq!(
        Board::from_fen("4k3/8/8/8/8/8/4K3 w - - 0 1"),
        Err(FenError::BadRankCount { found: 7 })
    );
    assert_eq!(
        Board::from_fen("4x3/8/8/8/8/8/8/4K3 w - - 0 1"),
        Err(FenError::InvalidPiece { piece: 'x' })
    );
    assert_eq!(
        Board::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
        Err(FenError::InvalidSideToMove {
            found: "x".to_string()
        })
    );
    assert_eq!(
        Board::from_fen("4k3/8/8/8/8/8/8/4K3 w z - 0 1"),
        Err(FenError::InvalidCastling { castling: 'z' })
    );
    assert_eq!(
        Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - e9 0 1"),
        Err(FenError::InvalidEnPassant {
            found: "e9".to_string()
        })
    );
    assert!(Board::from_fen("rnbqkbnr9/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1").is_err());
}

#[test]
fn unsupported_castling_rights_are_dropped() {
    // Kings and rooks are off their home squares: the claimed rights cannot
    // stand
    let board =
        Board::from_fen("1r2k2r/8/8/8/8/8/8/R3K1R1 w KQkq - 0 1").expect("valid fen");
    assert_eq!(board.castling_rights() & CASTLE_WHITE_K, 0);
    assert_eq!(board.castling_rights() & CASTLE_BLACK_Q, 0);
    assert_ne!(board.castling_rights(), 0); // white queenside and black kingside survive
}
