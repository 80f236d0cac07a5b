//! UCI protocol helpers: move parsing, score formatting, `go` parameters.

use std::time::Duration;

use crate::board::{Board, Move};
use crate::eval::{MATE_BAND, MATE_SCORE};

/// Parse a terse (long-algebraic) move like `e2e4` or `a7a8q` against the
/// legal moves of `board`. `None` when the token is malformed or the move
/// is not legal here.
#[must_use]
pub fn parse_terse_move(board: &mut Board, terse: &str) -> Option<Move> {
    if terse.len() < 4 || terse.len() > 5 {
        return None;
    }
    let wanted = terse.to_ascii_lowercase();
    board
        .legal_moves()
        .into_iter()
        .find(|mv| mv.to_string() == wanted)
}

/// Format a score for an `info` line: `cp <n>`, or `mate <k>` when the
/// magnitude falls in the mate band. `k` counts the winner's moves
/// (half the plies, rounded up) and is negative for the losing side.
#[must_use]
pub fn format_score(score: i32) -> String {
    if MATE_SCORE - score.abs() < MATE_BAND {
        let mate_in = if score > 0 {
            (MATE_SCORE - score + 1) / 2
        } else {
            -((MATE_SCORE + score) / 2)
        };
        format!("mate {mate_in}")
    } else {
        format!("cp {score}")
    }
}

/// Recognized `go` arguments. Unknown tokens are skipped.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub movestogo: Option<u64>,
    pub depth: Option<u32>,
}

#[must_use]
pub fn parse_go(tokens: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 1;
    while i < tokens.len() {
        match tokens[i] {
            "wtime" => {
                params.wtime = tokens.get(i + 1).and_then(|t| t.parse().ok());
                i += 2;
            }
            "btime" => {
                params.btime = tokens.get(i + 1).and_then(|t| t.parse().ok());
                i += 2;
            }
            "movestogo" => {
                params.movestogo = tokens.get(i + 1).and_then(|t| t.parse().ok());
                i += 2;
            }
            "depth" => {
                params.depth = tokens.get(i + 1).and_then(|t| t.parse().ok());
                i += 2;
            }
            _ => i += 1,
        }
    }
    params
}

/// Move-time budget: the mover's remaining clock spread over the coming
/// moves, capped at a 50-move horizon. `None` without clock information.
#[must_use]
pub fn time_budget(params: &GoParams, white_to_move: bool) -> Option<Duration> {
    let remaining = if white_to_move {
        params.wtime
    } else {
        params.btime
    }?;
    let horizon = match params.movestogo {
        Some(moves) if moves > 0 => moves.min(50),
        _ => 50,
    };
    Some(Duration::from_millis(remaining / horizon))
}
