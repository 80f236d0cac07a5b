//! Draw-by-rule classification: 50-move rule and insufficient material.
//! Threefold repetition lives in the transposition cache, not here.

use super::find_move;
use crate::board::Board;

#[test]
fn fifty_move_rule_draws() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 100 1").expect("valid fen");
    assert!(board.is_draw());
}

#[test]
fn clock_just_below_the_rule_is_not_a_draw() {
    let board = Board::from_fen("8/8/4R3/8/8/8/8/K1k5 w - - 99 1").expect("valid fen");
    assert!(!board.is_draw());
}

#[test]
fn pawn_move_resets_the_clock_out_of_the_draw() {
    let mut board = Board::from_fen("8/8/8/8/8/8/4P3/K1k5 w - - 99 1").expect("valid fen");
    let mv = find_move(&mut board, "e2e3");
    board.push(mv);
    assert_eq!(board.halfmove_clock(), 0);
    assert!(!board.is_draw());
}

#[test]
fn bare_kings_are_a_draw() {
    let board = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 0 1").expect("valid fen");
    assert!(board.is_draw());
}

#[test]
fn lone_minor_is_a_draw() {
    let knight = Board::from_fen("8/8/8/8/8/8/6N1/K1k5 w - - 0 1").expect("valid fen");
    assert!(knight.is_draw());
    let bishop = Board::from_fen("8/8/8/8/8/8/6B1/K1k5 w - - 0 1").expect("valid fen");
    assert!(bishop.is_draw());
}

#[test]
fn same_colored_bishops_are_a_draw() {
    // c1 and e3 are both dark squares
    let board = Board::from_fen("8/8/8/8/8/4b3/8/K1B1k3 w - - 0 1").expect("valid fen");
    assert!(board.is_draw());
}

#[test]
fn opposite_colored_bishops_are_not_a_draw() {
    let board = Board::from_fen("8/8/8/8/8/5b2/8/K1B1k3 w - - 0 1").expect("valid fen");
    assert!(!board.is_draw());
}

#[test]
fn pawns_rooks_or_queens_prevent_the_material_draw() {
    for fen in [
        "8/8/8/8/8/8/4P3/K1k5 w - - 0 1",
        "8/8/8/8/8/8/4R3/K1k5 w - - 0 1",
        "8/8/8/8/8/8/4Q3/K1k5 w - - 0 1",
    ] {
        let board = Board::from_fen(fen).expect("valid fen");
        assert!(!board.is_draw(), "{fen}");
    }
}

#[test]
fn two_knights_are_not_classified_as_a_draw() {
    let board = Board::from_fen("8/8/8/8/8/8/5NN1/K1k5 w - - 0 1").expect("valid fen");
    assert!(!board.is_draw());
}
