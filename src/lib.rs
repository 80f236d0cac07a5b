//! Ocelot chess engine library.
//!
//! A UCI chess engine built around four tightly coupled pieces:
//! - An incrementally maintained Zobrist position hash ([`zobrist`])
//! - A hash-indexed transposition cache with draw-repetition counters ([`tt`])
//! - An iterative-deepening alpha-beta search with principal-variation
//!   reuse ([`search`])
//! - A static evaluator feeding the search's leaves ([`eval`])
//!
//! The [`board`] module supplies the board primitive (mailbox board,
//! reversible `push`/`pop`, legal move generation, FEN), [`book`] reads
//! Polyglot-format opening books, and [`engine`] ties everything together
//! behind the UCI command stream.
//!
//! # Quick Start
//!
//! ```
//! use std::io::Cursor;
//! use ocelot::engine::Engine;
//!
//! let mut out = Vec::new();
//! let input = Cursor::new(b"uci\nisready\nquit\n".to_vec());
//! Engine::new(&mut out).run(input).unwrap();
//!
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("uciok"));
//! assert!(text.contains("readyok"));
//! ```
//!
//! # Searching a position directly
//!
//! ```
//! use ocelot::board::Board;
//! use ocelot::search::{PvLine, SearchContext, SearchLimits};
//! use ocelot::sync::StopFlag;
//! use ocelot::tt::TranspositionTable;
//! use ocelot::zobrist;
//!
//! let mut board = Board::new();
//! let mut tt = TranspositionTable::new(16);
//! let hash = zobrist::hash(&board);
//! let mut pv = PvLine::new();
//! let stop = StopFlag::new();
//!
//! let mut ctx = SearchContext::new(&mut board, &mut tt, hash, &mut pv, &stop);
//! let best = ctx.run(&SearchLimits::depth(3), |_info| {});
//! assert!(best.is_some());
//! ```

// Enable pedantic lints with domain-specific exceptions
#![warn(clippy::pedantic)]
// Chess code indexes small fixed arrays with narrow integers everywhere
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod board;
pub mod book;
pub mod engine;
pub mod eval;
pub mod search;
pub mod sync;
pub mod tt;
pub mod uci;
pub mod zobrist;
