//! End-to-end UCI scenarios driven over an in-memory session.

use std::io::Cursor;

use ocelot::board::Board;
use ocelot::engine::Engine;
use ocelot::uci::parse_terse_move;

fn run_session(commands: &str) -> String {
    let mut out = Vec::new();
    {
        let mut engine = Engine::new(&mut out);
        engine
            .run(Cursor::new(commands.as_bytes().to_vec()))
            .expect("session I/O");
    }
    String::from_utf8(out).expect("utf8 output")
}

fn bestmove_of(output: &str) -> &str {
    output
        .lines()
        .find_map(|line| line.strip_prefix("bestmove "))
        .expect("no bestmove emitted")
        .trim()
}

fn last_info_line(output: &str) -> &str {
    output
        .lines()
        .filter(|line| line.starts_with("info score"))
        .last()
        .expect("no info lines")
}

fn pv_of(info_line: &str) -> Vec<&str> {
    let mut parts = info_line.split_whitespace();
    while let Some(token) = parts.next() {
        if token == "pv" {
            return parts.collect();
        }
    }
    Vec::new()
}

#[test]
fn handshake_identifies_engine_and_options() {
    let output = run_session("uci\nquit\n");
    let mut lines = output.lines();
    assert!(lines.next().expect("id line").starts_with("id name Ocelot"));
    assert!(lines.next().expect("author line").starts_with("id author"));
    assert!(output.contains("option name hashSize type spin default 64 min 1 max 128"));
    assert!(output.contains("option name maxSearchDepth type spin default 6 min 1 max 10"));
    // uciok closes the handshake and nothing follows it
    let tail = output.split("uciok").nth(1).expect("uciok present");
    assert!(tail.trim().is_empty());
}

#[test]
fn isready_answers_readyok() {
    let output = run_session("uci\nisready\nquit\n");
    assert!(output.contains("readyok"));
}

// Scenario S1: a mate in one is announced and played.
#[test]
fn mate_in_one_is_announced_and_played() {
    let output =
        run_session("uci\nposition fen 4k3/8/4K3/4Q3/8/8/8/8 w - - 0 1\ngo depth 4\nquit\n");
    assert!(output.contains("info score mate 1"), "output:\n{output}");
    let best = bestmove_of(&output);
    assert!(
        best == "e5h8" || best == "e5b8",
        "not a mate in one: {best}"
    );
}

// Scenario S2: the opening search returns a plausible line, not a mate.
#[test]
fn opening_search_returns_a_sane_line() {
    let output = run_session("uci\nposition startpos\ngo depth 4\nquit\n");
    let best = bestmove_of(&output);
    assert_ne!(best, "0000");

    let mut board = Board::new();
    assert!(
        parse_terse_move(&mut board, best).is_some(),
        "illegal bestmove {best}"
    );

    let info = last_info_line(&output);
    assert!(
        info.contains("score cp "),
        "the opening is not a forced mate: {info}"
    );
    let pv = pv_of(info);
    assert!(pv.len() >= 2, "PV too short: {info}");
    assert_eq!(pv[0], best);
}

// Scenario S3: a forced shuffle back to the same position is a draw.
#[test]
fn forced_repetition_scores_as_draw() {
    let moves = "d2d4 d7d5 d1d2 d8d7 d2d1 d7d8 d1d2 d8d7 d2d1 d7d8";
    let output = run_session(&format!(
        "uci\nposition startpos moves {moves}\ngo depth 6\nquit\n"
    ));
    assert!(output.contains("score cp 0"), "draw score missing:\n{output}");

    let best = bestmove_of(&output);
    let mut board = Board::new();
    for terse in moves.split_whitespace() {
        let mv = parse_terse_move(&mut board, terse).expect("scripted move is legal");
        board.push(mv);
    }
    assert!(
        parse_terse_move(&mut board, best).is_some(),
        "illegal bestmove {best}"
    );
}

// Scenario S5: mate distance is reported exactly.
#[test]
fn mate_in_two_is_announced_exactly() {
    let output =
        run_session("uci\nposition fen k7/8/6R1/7R/8/8/8/4K3 w - - 0 1\ngo depth 5\nquit\n");
    assert!(output.contains("info score mate 2"), "output:\n{output}");
    let info = last_info_line(&output);
    assert!(info.contains("score mate 2"), "final depth disagrees: {info}");
}

#[test]
fn mated_position_yields_null_bestmove() {
    let output =
        run_session("uci\nposition fen 7k/7Q/7K/8/8/8/8/8 b - - 0 1\ngo depth 3\nquit\n");
    assert_eq!(bestmove_of(&output), "0000");
}

#[test]
fn go_depth_zero_still_produces_a_move() {
    let output = run_session("uci\nposition startpos\ngo depth 0\nquit\n");
    let best = bestmove_of(&output);
    let mut board = Board::new();
    assert!(parse_terse_move(&mut board, best).is_some());
}

#[test]
fn survives_an_adversarial_command_stream() {
    let output = run_session(
        "uci\nbogus command here\nposition fen not a fen at all\nposition startpos moves e2e5\nsetoption name Threads value 8\nsetoption name hashSize value nine\ngo depth 1\nisready\nquit\n",
    );
    assert!(output.contains("info string unknown command: bogus"));
    assert!(output.contains("info string bad fen"));
    assert!(output.contains("info string illegal move: e2e5"));
    assert!(output.contains("info string unknown option: Threads"));
    assert!(output.contains("readyok"));
    // The engine still searches from its last good position
    let best = bestmove_of(&output);
    let mut board = Board::new();
    assert!(parse_terse_move(&mut board, best).is_some());
}

#[test]
fn ucinewgame_resets_to_startpos() {
    let output = run_session(
        "uci\nposition fen 7k/7Q/7K/8/8/8/8/8 b - - 0 1\nucinewgame\ngo depth 2\nquit\n",
    );
    let best = bestmove_of(&output);
    let mut board = Board::new();
    assert!(
        parse_terse_move(&mut board, best).is_some(),
        "bestmove {best} not legal from startpos"
    );
}

#[test]
fn info_lines_report_increasing_depth_then_bestmove_last() {
    let output = run_session("uci\nposition startpos\ngo depth 3\nquit\n");
    let mut depths = Vec::new();
    for line in output.lines() {
        if line.starts_with("info score") {
            let mut parts = line.split_whitespace();
            while let Some(token) = parts.next() {
                if token == "depth" {
                    let depth = parts
                        .next()
                        .and_then(|d| d.parse::<u32>().ok())
                        .expect("depth value");
                    depths.push(depth);
                    break;
                }
            }
        }
    }
    assert_eq!(depths, vec![1, 2, 3]);

    let last_line = output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .last()
        .expect("output");
    assert!(
        last_line.starts_with("bestmove "),
        "bestmove must come last: {last_line}"
    );
}

#[test]
fn time_limited_search_still_reports_a_move() {
    let output = run_session(
        "uci\nposition startpos\ngo wtime 2000 btime 2000 movestogo 40\nquit\n",
    );
    let best = bestmove_of(&output);
    let mut board = Board::new();
    assert!(parse_terse_move(&mut board, best).is_some());
}
