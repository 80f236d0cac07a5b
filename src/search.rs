//! Iterative-deepening negamax search with alpha-beta pruning.
//!
//! The recursion keeps scores in the side-to-move's perspective and negates
//! child results (negamax). Cutoffs are fail-hard: the routine never
//! returns outside its (alpha, beta) window. Results are read from and
//! written to the transposition cache at every node, and the principal
//! variation is recovered afterwards by walking the cache from the root.
//!
//! The previous iteration's PV steers move ordering: at each ply the PV
//! move, when still applicable, is tried first.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::board::{Board, Move};
use crate::eval::{self, MATE_BAND, MATE_SCORE};
use crate::sync::StopFlag;
use crate::tt::{Bound, TranspositionTable};
use crate::zobrist;

/// Longest principal variation recovered from the cache.
pub const MAX_PV: usize = 30;

/// An ordered line of moves from the root.
#[derive(Clone, Debug, Default)]
pub struct PvLine {
    pub moves: Vec<Move>,
}

impl PvLine {
    #[must_use]
    pub fn new() -> PvLine {
        PvLine { moves: Vec::new() }
    }

    #[must_use]
    pub fn first(&self) -> Option<Move> {
        self.moves.first().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Bounds for one search: a depth cap always, a wall-clock budget
/// optionally.
#[derive(Clone, Copy, Debug)]
pub struct SearchLimits {
    pub max_depth: u32,
    pub budget: Option<Duration>,
}

impl SearchLimits {
    /// Depth-only limits. A depth of 0 is clamped to 1.
    #[must_use]
    pub fn depth(max_depth: u32) -> SearchLimits {
        SearchLimits {
            max_depth: max_depth.max(1),
            budget: None,
        }
    }

    #[must_use]
    pub fn with_budget(mut self, budget: Duration) -> SearchLimits {
        self.budget = Some(budget);
        self
    }
}

/// Per-iteration report handed to the info callback.
#[derive(Clone, Debug)]
pub struct IterationInfo {
    pub depth: u32,
    pub score: i32,
    pub time_ms: u64,
    pub nps: u64,
    pub pv: Vec<Move>,
}

/// One search over borrowed session state. The board, hash and repetition
/// counters are restored to their entry values when [`run`](Self::run)
/// returns.
pub struct SearchContext<'a> {
    board: &'a mut Board,
    tt: &'a mut TranspositionTable,
    hash: u64,
    pv: &'a mut PvLine,
    use_previous_pv: bool,
    stop: &'a StopFlag,
    start: Instant,
    budget: Option<Duration>,
    initial_depth: u32,
    evaluated_leaves: u64,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        board: &'a mut Board,
        tt: &'a mut TranspositionTable,
        hash: u64,
        pv: &'a mut PvLine,
        stop: &'a StopFlag,
    ) -> SearchContext<'a> {
        SearchContext {
            board,
            tt,
            hash,
            pv,
            use_previous_pv: false,
            stop,
            start: Instant::now(),
            budget: None,
            initial_depth: 0,
            evaluated_leaves: 0,
        }
    }

    /// Iterative deepening to the limits, reporting each completed depth.
    ///
    /// Depth 1 always completes, so there is a move to play even under an
    /// immediate stop; deeper iterations start only while neither the stop
    /// flag nor the time budget has tripped. Returns the move to play, or
    /// `None` only when the position has no legal move.
    pub fn run(
        &mut self,
        limits: &SearchLimits,
        mut on_iteration: impl FnMut(&IterationInfo),
    ) -> Option<Move> {
        self.pv.moves.clear();
        self.use_previous_pv = false;
        self.budget = limits.budget;
        self.start = Instant::now();
        let max_depth = limits.max_depth.max(1);

        for depth in 1..=max_depth {
            self.evaluated_leaves = 0;
            self.initial_depth = depth;
            let depth_start = Instant::now();

            let mut line = PvLine::new();
            let score = self.alphabeta(-MATE_SCORE, MATE_SCORE, depth, &mut line);

            self.pv.moves.clear();
            self.extract_pv();

            let time_ms = depth_start.elapsed().as_millis() as u64;
            let nps = if time_ms > 0 {
                self.evaluated_leaves * 1000 / time_ms
            } else {
                0
            };
            on_iteration(&IterationInfo {
                depth,
                score,
                time_ms,
                nps,
                pv: self.pv.moves.clone(),
            });
            self.use_previous_pv = true;

            if depth < max_depth && self.should_stop() {
                break;
            }
        }

        self.pv
            .first()
            .or_else(|| self.board.legal_moves().first().copied())
    }

    fn should_stop(&self) -> bool {
        if self.stop.is_stopped() {
            return true;
        }
        match self.budget {
            Some(budget) => self.start.elapsed() > budget,
            None => false,
        }
    }

    /// Fail-hard alpha-beta. Scores are from the moving side's perspective.
    fn alphabeta(&mut self, mut alpha: i32, beta: i32, depth: u32, line: &mut PvLine) -> i32 {
        if let Some(score) = self.tt.probe(self.hash, depth, alpha, beta) {
            return score;
        }

        let mut moves = self.board.legal_moves();

        if depth == 0 || moves.is_empty() {
            line.moves.clear();
            let score = eval::evaluate(self.board);
            self.evaluated_leaves += 1;
            self.tt.record(self.hash, depth, Bound::Exact, score, None);
            return score;
        }

        // Previous iteration's PV move first at this ply, if it still
        // applies; once the position diverges the old line is abandoned
        let ply = self.initial_depth.saturating_sub(depth) as usize;
        if self.use_previous_pv && ply < self.pv.moves.len() {
            let pv_move = self.pv.moves[ply];
            match moves.iter().position(|&m| m == pv_move) {
                Some(idx) => moves.swap(0, idx),
                None => self.use_previous_pv = false,
            }
        } else {
            self.use_previous_pv = false;
        }

        let mut best_move = moves[0];
        let mut bound = Bound::Upper;
        let mut child_line = PvLine::new();
        let parent_hash = self.hash;

        for mv in moves {
            child_line.moves.clear();

            self.hash = zobrist::update(self.hash, self.board, mv);
            self.board.push(mv);
            self.tt.increment_repetition(self.hash);

            let mut score = -self.alphabeta(-beta, -alpha, depth - 1, &mut child_line);

            self.tt.decrement_repetition(self.hash);
            self.board.pop(mv);
            self.hash = zobrist::update(self.hash, self.board, mv);
            debug_assert_eq!(self.hash, parent_hash, "hash not restored after {mv}");
            debug_assert_eq!(
                self.hash,
                zobrist::hash(self.board),
                "incremental hash drifted after {mv}"
            );

            // Mate-distance ageing: seen one ply further from the mate, the
            // score moves one step away from MATE
            if MATE_SCORE - score.abs() < MATE_BAND {
                score -= score.signum();
            }

            if score >= beta {
                self.tt.record(parent_hash, depth, Bound::Lower, beta, Some(mv));
                return beta;
            }
            if score > alpha {
                alpha = score;
                line.moves.clear();
                line.moves.push(mv);
                line.moves.extend_from_slice(&child_line.moves);
                self.use_previous_pv = false;
                best_move = mv;
                bound = Bound::Exact;
            }
        }

        self.tt.record(parent_hash, depth, bound, alpha, Some(best_move));
        alpha
    }

    /// Rebuild the global PV by walking best moves stored in the cache.
    fn extract_pv(&mut self) {
        let mut visited = HashSet::new();
        self.walk_pv(&mut visited);
    }

    fn walk_pv(&mut self, visited: &mut HashSet<u64>) {
        if self.pv.moves.len() >= MAX_PV || visited.contains(&self.hash) {
            return;
        }
        let mv = match self.tt.entry(self.hash) {
            Some(entry) => match entry.best_move() {
                Some(mv) => mv,
                None => return,
            },
            None => return,
        };
        // A slot can hold a colliding position's move: follow it only if it
        // is legal here
        if !self.board.legal_moves().contains(&mv) {
            return;
        }

        self.pv.moves.push(mv);
        visited.insert(self.hash);

        self.hash = zobrist::update(self.hash, self.board, mv);
        self.board.push(mv);
        self.walk_pv(visited);
        self.board.pop(mv);
        self.hash = zobrist::update(self.hash, self.board, mv);

        visited.remove(&self.hash);
    }
}
