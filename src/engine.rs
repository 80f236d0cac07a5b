//! Engine session: owns the board, hash, repetition history, transposition
//! cache, principal variation and opening book, and drives them from the
//! UCI command stream.
//!
//! The search runs inline on the session's thread with cooperative time
//! checks between depths, so command handling can never race an in-flight
//! search. The [`StopFlag`] stays the cancellation seam for embedders that
//! run [`SearchContext`] on a thread of their own.

use std::io::{self, BufRead, Write};

use log::{debug, warn};

use crate::board::{Board, Move, Piece};
use crate::book::Book;
use crate::search::{PvLine, SearchContext, SearchLimits};
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;
use crate::uci;
use crate::zobrist;

pub const ENGINE_NAME: &str = "Ocelot";
pub const ENGINE_AUTHOR: &str = "the Ocelot authors";

pub const HASH_SIZE_DEFAULT: usize = 64;
pub const HASH_SIZE_MIN: usize = 1;
pub const HASH_SIZE_MAX: usize = 128;
pub const SEARCH_DEPTH_DEFAULT: u32 = 6;
pub const SEARCH_DEPTH_MIN: u32 = 1;
pub const SEARCH_DEPTH_MAX: u32 = 10;
const DEFAULT_BOOK_FILE: &str = "book.bin";

/// Runtime configuration, adjusted over `setoption`.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Transposition cache size in mebibytes
    pub hash_size_mb: usize,
    /// Default iterative-deepening depth cap
    pub max_search_depth: u32,
    /// Polyglot-format opening book path
    pub book_file: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            hash_size_mb: HASH_SIZE_DEFAULT,
            max_search_depth: SEARCH_DEPTH_DEFAULT,
            book_file: DEFAULT_BOOK_FILE.to_string(),
        }
    }
}

/// A UCI session over an output writer. Tests drive it over in-memory
/// buffers; the binary hands it locked stdio.
pub struct Engine<W: Write> {
    out: W,
    board: Board,
    hash: u64,
    repetition_history: Vec<u64>,
    tt: TranspositionTable,
    pv: PvLine,
    book: Book,
    in_opening: bool,
    stop: StopFlag,
    options: EngineOptions,
}

impl<W: Write> Engine<W> {
    pub fn new(out: W) -> Engine<W> {
        Engine::with_options(out, EngineOptions::default())
    }

    pub fn with_options(out: W, options: EngineOptions) -> Engine<W> {
        let board = Board::new();
        let hash = zobrist::hash(&board);
        let book = match Book::open(&options.book_file) {
            Ok(book) => book,
            Err(err) => {
                warn!("opening book {} unavailable: {err}", options.book_file);
                Book::empty()
            }
        };
        Engine {
            out,
            board,
            hash,
            repetition_history: vec![hash],
            tt: TranspositionTable::new(options.hash_size_mb),
            pv: PvLine::new(),
            book,
            in_opening: true,
            stop: StopFlag::new(),
            options,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Cancellation token; clones observe this session's searches.
    #[must_use]
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Consume the command stream until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if !self.handle_line(line.trim())? {
                break;
            }
        }
        self.out.flush()
    }

    /// Process one command line. Returns `false` when the session should
    /// end. Unknown or malformed input is reported as `info string` and the
    /// session stays in its last good state.
    pub fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let command = match tokens.first() {
            Some(first) => *first,
            None => return Ok(true),
        };

        match command {
            "uci" => {
                self.handshake()?;
                self.reset_game();
            }
            "isready" => writeln!(self.out, "readyok")?,
            "ucinewgame" => self.reset_game(),
            "position" => self.cmd_position(&tokens)?,
            "go" => self.cmd_go(&tokens)?,
            "setoption" => self.cmd_setoption(&tokens)?,
            "debug" => self.cmd_debug()?,
            // With the inline search nothing can be in flight here; the
            // flag is reset when the next search starts
            "stop" => self.stop.stop(),
            "quit" => return Ok(false),
            _ => writeln!(self.out, "info string unknown command: {command}")?,
        }
        self.out.flush()?;
        Ok(true)
    }

    fn handshake(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "id name {ENGINE_NAME} {}",
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(self.out, "id author {ENGINE_AUTHOR}")?;
        writeln!(
            self.out,
            "option name hashSize type spin default {HASH_SIZE_DEFAULT} min {HASH_SIZE_MIN} max {HASH_SIZE_MAX}"
        )?;
        writeln!(
            self.out,
            "option name maxSearchDepth type spin default {SEARCH_DEPTH_DEFAULT} min {SEARCH_DEPTH_MIN} max {SEARCH_DEPTH_MAX}"
        )?;
        writeln!(
            self.out,
            "option name bookFile type string default {DEFAULT_BOOK_FILE}"
        )?;
        writeln!(self.out, "uciok")
    }

    fn reset_game(&mut self) {
        self.board = Board::new();
        self.hash = zobrist::hash(&self.board);
        self.repetition_history = vec![self.hash];
        self.tt.clear();
        self.pv = PvLine::new();
        self.in_opening = true;
    }

    fn cmd_position(&mut self, tokens: &[&str]) -> io::Result<()> {
        let mut idx = 1;
        let board = match tokens.get(idx) {
            Some(&"startpos") => {
                idx += 1;
                Board::new()
            }
            Some(&"fen") => {
                idx += 1;
                let fen_start = idx;
                while idx < tokens.len() && tokens[idx] != "moves" {
                    idx += 1;
                }
                match Board::from_fen(&tokens[fen_start..idx].join(" ")) {
                    Ok(board) => board,
                    Err(err) => {
                        writeln!(self.out, "info string bad fen: {err}")?;
                        return Ok(());
                    }
                }
            }
            _ => {
                writeln!(self.out, "info string malformed position command")?;
                return Ok(());
            }
        };

        self.board = board;
        self.hash = zobrist::hash(&self.board);
        self.repetition_history = vec![self.hash];
        self.in_opening = true;

        if tokens.get(idx) == Some(&"moves") {
            for token in &tokens[idx + 1..] {
                match uci::parse_terse_move(&mut self.board, token) {
                    Some(mv) => self.play_move(mv),
                    None => {
                        // Keep the position reached so far; the rest of the
                        // list would be nonsense on top of a skipped move
                        writeln!(self.out, "info string illegal move: {token}")?;
                        break;
                    }
                }
            }
        }

        self.seed_repetition_counters();
        Ok(())
    }

    /// Play a move permanently, advancing the hash and repetition history.
    /// Captures and pawn moves are irreversible: no earlier position can
    /// repeat past them.
    fn play_move(&mut self, mv: Move) {
        self.hash = zobrist::update(self.hash, &self.board, mv);
        let pawn_move = matches!(self.board.piece_at(mv.from), Some((_, Piece::Pawn)));
        if mv.capture.is_some() || pawn_move {
            self.repetition_history.clear();
        } else {
            self.repetition_history.push(self.hash);
        }
        self.board.push(mv);
    }

    /// Seed the cache's per-slot repetition counters from the history of
    /// positions since the last irreversible move.
    fn seed_repetition_counters(&mut self) {
        for &hash in &self.repetition_history {
            let count = self
                .repetition_history
                .iter()
                .filter(|&&other| other == hash)
                .count() as u32;
            self.tt.set_repetition(hash, count);
        }
    }

    fn cmd_go(&mut self, tokens: &[&str]) -> io::Result<()> {
        let params = uci::parse_go(tokens);

        if self.in_opening {
            if let Some(terse) = self.book.lookup(self.hash) {
                if let Some(mv) = uci::parse_terse_move(&mut self.board, &terse) {
                    debug!("book move {mv}");
                    writeln!(self.out, "bestmove {mv}")?;
                    return Ok(());
                }
                writeln!(self.out, "info string ignoring illegal book move {terse}")?;
            }
            self.in_opening = false;
        }

        let max_depth = match params.depth {
            Some(depth) => depth.max(SEARCH_DEPTH_MIN),
            None => self.options.max_search_depth,
        };
        let mut limits = SearchLimits::depth(max_depth);
        if let Some(budget) = uci::time_budget(&params, self.board.white_to_move()) {
            limits = limits.with_budget(budget);
        }

        self.seed_repetition_counters();
        self.stop.reset();

        let mut write_error: Option<io::Error> = None;
        let best = {
            let out = &mut self.out;
            let mut ctx = SearchContext::new(
                &mut self.board,
                &mut self.tt,
                self.hash,
                &mut self.pv,
                &self.stop,
            );
            ctx.run(&limits, |info| {
                if write_error.is_some() {
                    return;
                }
                let pv: Vec<String> = info.pv.iter().map(ToString::to_string).collect();
                let written = writeln!(
                    out,
                    "info score {} depth {} time {} nps {} pv {}",
                    uci::format_score(info.score),
                    info.depth,
                    info.time_ms,
                    info.nps,
                    pv.join(" "),
                );
                if let Err(err) = written {
                    write_error = Some(err);
                }
            })
        };
        if let Some(err) = write_error {
            return Err(err);
        }

        match best {
            Some(mv) => writeln!(self.out, "bestmove {mv}"),
            None => writeln!(self.out, "bestmove 0000"),
        }
    }

    fn cmd_setoption(&mut self, tokens: &[&str]) -> io::Result<()> {
        let name_pos = tokens.iter().position(|&t| t == "name");
        let value_pos = tokens.iter().position(|&t| t == "value");
        let (name_pos, value_pos) = match (name_pos, value_pos) {
            (Some(name), Some(value)) if name < value => (name, value),
            _ => {
                writeln!(self.out, "info string malformed setoption command")?;
                return Ok(());
            }
        };
        let key = tokens[name_pos + 1..value_pos].join(" ");
        let value = tokens[value_pos + 1..].join(" ");

        match key.to_ascii_lowercase().as_str() {
            "hashsize" => match value.parse::<usize>() {
                Ok(mb) => {
                    let clamped = mb.clamp(HASH_SIZE_MIN, HASH_SIZE_MAX);
                    if clamped != mb {
                        writeln!(self.out, "info string hashSize clamped to {clamped}")?;
                    }
                    self.options.hash_size_mb = clamped;
                    self.tt = TranspositionTable::new(clamped);
                }
                Err(_) => writeln!(self.out, "info string hashSize wants an integer")?,
            },
            "maxsearchdepth" => match value.parse::<u32>() {
                Ok(depth) => {
                    let clamped = depth.clamp(SEARCH_DEPTH_MIN, SEARCH_DEPTH_MAX);
                    if clamped != depth {
                        writeln!(self.out, "info string maxSearchDepth clamped to {clamped}")?;
                    }
                    self.options.max_search_depth = clamped;
                }
                Err(_) => writeln!(self.out, "info string maxSearchDepth wants an integer")?,
            },
            "bookfile" => match Book::open(&value) {
                Ok(book) => {
                    self.book = book;
                    self.in_opening = true;
                    self.options.book_file = value;
                }
                Err(err) => {
                    writeln!(self.out, "info string cannot open book {value}: {err}")?;
                    self.book = Book::empty();
                }
            },
            _ => writeln!(self.out, "info string unknown option: {key}")?,
        }
        Ok(())
    }

    fn cmd_debug(&mut self) -> io::Result<()> {
        writeln!(self.out, "info string fen {}", self.board.to_fen())?;
        writeln!(
            self.out,
            "info string hash {:#018x} (from scratch {:#018x})",
            self.hash,
            zobrist::hash(&self.board)
        )?;
        writeln!(
            self.out,
            "info string cache {} of {} slots occupied",
            self.tt.occupancy(),
            self.tt.len()
        )?;
        match self.tt.entry(self.hash) {
            Some(entry) => writeln!(
                self.out,
                "info string slot depth {} bound {:?} score {} repetitions {} best {}",
                entry.depth(),
                entry.bound(),
                entry.score(),
                entry.repetitions(),
                entry
                    .best_move()
                    .map_or_else(|| "-".to_string(), |mv| mv.to_string()),
            )?,
            None => writeln!(self.out, "info string no entry for this position")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine<Vec<u8>> {
        Engine::new(Vec::new())
    }

    fn drain(engine: &mut Engine<Vec<u8>>) -> String {
        let bytes = std::mem::take(&mut engine.out);
        String::from_utf8(bytes).expect("utf8 output")
    }

    #[test]
    fn position_rebuilds_hash_and_history() {
        let mut engine = engine();
        engine
            .handle_line("position startpos moves e2e4 e7e5 g1f3")
            .expect("io");
        assert_eq!(engine.hash(), zobrist::hash(engine.board()));
        // History restarts after the last pawn move (e7e5): only g1f3's
        // position is reversible
        assert_eq!(engine.repetition_history.len(), 1);
    }

    #[test]
    fn illegal_move_keeps_last_good_position() {
        let mut engine = engine();
        engine
            .handle_line("position startpos moves e2e4 e2e4 e7e5")
            .expect("io");
        let output = drain(&mut engine);
        assert!(output.contains("info string illegal move: e2e4"));
        // The first e2e4 was played, the rest of the list dropped
        assert!(!engine.board().white_to_move());
        assert_eq!(engine.hash(), zobrist::hash(engine.board()));
    }

    #[test]
    fn bad_fen_is_reported_and_ignored() {
        let mut engine = engine();
        engine
            .handle_line("position fen not/a/real/fen w - - 0 1")
            .expect("io");
        let output = drain(&mut engine);
        assert!(output.contains("info string bad fen"));
        assert_eq!(engine.board().to_fen(), Board::new().to_fen());
    }

    #[test]
    fn setoption_clamps_and_reports() {
        let mut engine = engine();
        engine
            .handle_line("setoption name hashSize value 4096")
            .expect("io");
        assert_eq!(engine.options().hash_size_mb, HASH_SIZE_MAX);
        engine
            .handle_line("setoption name maxSearchDepth value 0")
            .expect("io");
        assert_eq!(engine.options().max_search_depth, SEARCH_DEPTH_MIN);
        let output = drain(&mut engine);
        assert!(output.contains("hashSize clamped to 128"));
        assert!(output.contains("maxSearchDepth clamped to 1"));
    }

    #[test]
    fn unknown_option_is_reported() {
        let mut engine = engine();
        engine
            .handle_line("setoption name Ponder value true")
            .expect("io");
        let output = drain(&mut engine);
        assert!(output.contains("info string unknown option: Ponder"));
    }

    #[test]
    fn repeated_position_counters_are_seeded() {
        let mut engine = engine();
        engine
            .handle_line("position startpos moves g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1 f6g8")
            .expect("io");
        // The current position is startpos itself, seen at the start and
        // after each knight shuffle: three occurrences on the history
        assert_eq!(engine.tt.repetition_count(engine.hash()), 3);
    }
}
