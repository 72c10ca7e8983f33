//! The iterative-deepening driver.

use std::time::Instant;

use crate::board::{Board, Move};
use crate::tt::TranspositionTable;
use crate::{clock, ordering};

use super::{Evaluation, SearchError, INFINITY_SCORE, MIN_DEPTH};

/// Per-search state threaded through the recursion.
pub(crate) struct SearchContext<'a> {
    pub board: &'a mut Board,
    pub tt: &'a TranspositionTable,
    pub stop: &'a dyn Fn() -> bool,
    /// Target depth of the iteration currently running.
    pub iteration_depth: u32,
    /// Set when the stop predicate fired inside the tree; the current
    /// iteration's partial results are discarded.
    pub stop_flag: bool,
    /// Nodes visited in the current iteration.
    pub nodes: u64,
    /// Root move list, kept sorted with the previous best move in front.
    pub root_moves: Vec<Move>,
}

impl SearchContext<'_> {
    /// Whether to abandon the current iteration. The shallowest iteration
    /// always runs to completion so a fallback result exists.
    #[inline]
    pub(crate) fn should_abort(&self) -> bool {
        self.iteration_depth > MIN_DEPTH && (self.stop)()
    }
}

/// Deepen until the stop predicate fires, the deadline math says another
/// iteration will not fit, or `max_depth` is reached. Returns the last
/// iteration that ran to completion.
pub(crate) fn run_iterative_deepening(
    board: &mut Board,
    tt: &TranspositionTable,
    stop: &dyn Fn() -> bool,
    deadline: &dyn Fn() -> Option<Instant>,
    max_depth: u32,
    log_search: bool,
) -> Result<Evaluation, SearchError> {
    if board.repetition_count(board.hash()) >= 3 {
        return Err(SearchError::TerminalPosition);
    }
    let mut root_moves = board.generate_legal_moves();
    if root_moves.is_empty() {
        return Err(SearchError::TerminalPosition);
    }
    ordering::sort_moves(board, &mut root_moves);

    let mut ctx = SearchContext {
        board,
        tt,
        stop,
        iteration_depth: 0,
        stop_flag: false,
        nodes: 0,
        root_moves,
    };

    let mut completed: Option<Evaluation> = None;
    let mut nodes_prev_iter = 0u64;

    for depth in MIN_DEPTH..=max_depth {
        let iteration_start = Instant::now();
        ctx.iteration_depth = depth;
        ctx.stop_flag = false;
        ctx.nodes = 0;

        let result = ctx.search_node(depth, -INFINITY_SCORE, INFINITY_SCORE, 0);
        if ctx.stop_flag {
            break;
        }
        let Some(best_move) = result.best_move else {
            break;
        };

        completed = Some(Evaluation {
            best_move,
            ponder_move: result.best_response,
            score: result.score,
        });
        ordering::rotate_to_front(&mut ctx.root_moves, &best_move);

        if log_search {
            tracing::debug!(
                target: "search",
                depth,
                score = result.score,
                nodes = ctx.nodes,
                elapsed_ms = iteration_start.elapsed().as_millis() as u64,
                best = %best_move,
                "completed iteration"
            );
        }

        if (ctx.stop)() {
            break;
        }
        if let Some(cutoff) = deadline() {
            if !clock::should_continue_iterating(ctx.nodes, nodes_prev_iter, iteration_start, cutoff)
            {
                break;
            }
        }
        nodes_prev_iter = ctx.nodes;
    }

    completed.ok_or(SearchError::NoResult)
}
