//! Iterative-deepening alpha-beta search with quiescence and pondering.

mod alpha_beta;
mod iterative;
mod quiescence;

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::board::{Board, Color, Move};
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;
use crate::{clock, eval};

/// Mate sentinel, well clear of any evaluation magnitude. A forced mate in
/// k plies from the root scores `MATE_SCORE - k`, so faster mates win.
pub const MATE_SCORE: i32 = 1_000_000;

pub(crate) const INFINITY_SCORE: i32 = i32::MAX;

/// Floor of the iterative-deepening loop. The depth-1 iteration always runs
/// to completion so a fallback move exists almost immediately.
pub(crate) const MIN_DEPTH: u32 = 1;

/// Hard ceiling on iteration depth.
pub(crate) const MAX_DEPTH: u32 = 64;

/// Budget for a `go` without clocks.
pub const DEFAULT_SEARCH_TIME_MS: u64 = 1000;

/// Result of a completed search.
#[derive(Clone, Copy, Debug)]
pub struct Evaluation {
    /// The move judged best.
    pub best_move: Move,
    /// The reply the opponent is expected to make, if one was found.
    pub ponder_move: Option<Move>,
    /// Score of `best_move` from the mover's perspective.
    pub score: i32,
}

/// Search failures. Both are caller errors rather than in-band results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The position has no legal moves or is already drawn by repetition.
    TerminalPosition,
    /// The search was stopped before even one iteration completed.
    NoResult,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::TerminalPosition => {
                write!(f, "search invoked on a terminal position")
            }
            SearchError::NoResult => {
                write!(f, "search stopped before any iteration completed")
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Clock state handed down from the `go` command.
#[derive(Clone, Copy, Debug)]
pub struct TimeControls {
    pub wtime_ms: u64,
    pub btime_ms: u64,
    pub winc_ms: u64,
    pub binc_ms: u64,
    /// When set, overrides the clock-derived budget with a fixed window.
    pub forced_time_ms: Option<u64>,
}

impl Default for TimeControls {
    fn default() -> Self {
        TimeControls {
            wtime_ms: 30_000,
            btime_ms: 30_000,
            winc_ms: 0,
            binc_ms: 0,
            forced_time_ms: None,
        }
    }
}

impl TimeControls {
    /// A fixed thinking window, ignoring the clocks.
    #[must_use]
    pub fn fixed(ms: u64) -> Self {
        TimeControls {
            forced_time_ms: Some(ms),
            ..TimeControls::default()
        }
    }

    fn remaining_for(&self, color: Color) -> u64 {
        match color {
            Color::White => self.wtime_ms,
            Color::Black => self.btime_ms,
        }
    }

    fn increment_for(&self, color: Color) -> u64 {
        match color {
            Color::White => self.winc_ms,
            Color::Black => self.binc_ms,
        }
    }

    /// Budget for this move given the board's material phase.
    fn budget(&self, mover: Color, material_ratio: f64) -> Duration {
        match self.forced_time_ms {
            Some(ms) => Duration::from_millis(ms),
            None => clock::budget_for_move(
                self.remaining_for(mover),
                self.increment_for(mover),
                material_ratio,
            ),
        }
    }
}

/// Node-level return value: the score plus the line head needed for move
/// ordering and ponder extraction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeResult {
    pub score: i32,
    pub best_move: Option<Move>,
    pub best_response: Option<Move>,
}

impl NodeResult {
    pub(crate) fn leaf(score: i32) -> Self {
        NodeResult {
            score,
            best_move: None,
            best_response: None,
        }
    }
}

/// Run the foreground search under the clock controller's budget.
///
/// Ages the transposition table once on success.
pub fn find_best_move(
    board: &mut Board,
    tt: &TranspositionTable,
    controls: &TimeControls,
    log_search: bool,
) -> Result<Evaluation, SearchError> {
    let mover = board.side_to_move();
    let material_ratio = eval::remaining_material_ratio(board);
    let budget = controls.budget(mover, material_ratio);
    let cutoff = Instant::now() + budget;

    if log_search {
        tracing::debug!(target: "search", budget_ms = budget.as_millis() as u64, "allocated");
    }

    let stop = move || Instant::now() >= cutoff;
    let deadline = move || Some(cutoff);
    let result = iterative::run_iterative_deepening(board, tt, &stop, &deadline, MAX_DEPTH, log_search);
    if result.is_ok() {
        tt.advance_age();
    }
    result
}

/// Search to an exact depth with no clock. Used by tests and benchmarks.
pub fn search_fixed_depth(
    board: &mut Board,
    tt: &TranspositionTable,
    depth: u32,
) -> Result<Evaluation, SearchError> {
    let stop = || false;
    let deadline = || None::<Instant>;
    let result = iterative::run_iterative_deepening(board, tt, &stop, &deadline, depth, false);
    if result.is_ok() {
        tt.advance_age();
    }
    result
}

/// Speculative search during the opponent's clock.
///
/// The board must already have the expected opponent reply applied. The
/// search runs without a deadline until one of the flags fires:
/// `ponder_hit` switches it onto the normal clock budget, `hard_stop`
/// abandons it at the next stop-predicate check. Everything learned lands
/// in the shared transposition table either way.
pub fn ponder(
    board: &mut Board,
    tt: &TranspositionTable,
    ponder_hit: &StopFlag,
    hard_stop: &StopFlag,
    controls: &TimeControls,
    log_search: bool,
) -> Result<Evaluation, SearchError> {
    let mover = board.side_to_move();
    let material_ratio = eval::remaining_material_ratio(board);
    let deadline_cell: Mutex<Option<Instant>> = Mutex::new(None);

    let stop = || {
        if hard_stop.is_set() {
            return true;
        }
        let mut deadline = deadline_cell.lock();
        if deadline.is_none() && ponder_hit.is_set() {
            *deadline = Some(Instant::now() + controls.budget(mover, material_ratio));
        }
        deadline.is_some_and(|d| Instant::now() >= d)
    };
    let deadline = || *deadline_cell.lock();

    let result = iterative::run_iterative_deepening(board, tt, &stop, &deadline, MAX_DEPTH, log_search);
    if result.is_ok() {
        tt.advance_age();
    }
    result
}
