//! Time management.
//!
//! Two pure functions: one turns the remaining clock, the increment and the
//! material phase into a budget for this move, the other predicts whether a
//! deeper iteration can still finish before the deadline.

use std::time::{Duration, Instant};

/// Below this much total time, switch to increment-only budgeting.
const EMERGENCY_MS: u64 = 5000;
/// Never think for less than this.
const MIN_MOVE_TIME_MS: u64 = 50;
/// Reserved out of the increment to cover I/O latency.
const BUFFER_MS: u64 = 500;
/// Moves-left estimate at full material.
const TOP_REMAINING_MOVES: f64 = 30.0;
/// Moves-left estimate with bare kings.
const BOTTOM_REMAINING_MOVES: f64 = 10.0;

/// Wall-clock budget for the move about to be searched.
///
/// `material_ratio` is the remaining-material phase in [0, 1]; more material
/// means more moves still to come and a thinner slice per move.
#[must_use]
pub fn budget_for_move(remaining_ms: u64, increment_ms: u64, material_ratio: f64) -> Duration {
    if remaining_ms + increment_ms < EMERGENCY_MS {
        let per_move = increment_ms.saturating_sub(BUFFER_MS).max(MIN_MOVE_TIME_MS);
        return Duration::from_millis(per_move);
    }

    let moves_left = (TOP_REMAINING_MOVES * material_ratio
        + BOTTOM_REMAINING_MOVES * (1.0 - material_ratio))
        .round()
        .max(1.0) as u64;

    Duration::from_millis(remaining_ms / moves_left + increment_ms)
}

/// Whether the next, deeper iteration is expected to finish in time.
///
/// Extrapolates with the effective branching factor: with N nodes this
/// iteration and M the one before, the next is expected to cost roughly
/// N * sqrt(N / M) nodes at this iteration's speed.
#[must_use]
pub fn should_continue_iterating(
    nodes_this_iter: u64,
    nodes_prev_iter: u64,
    iteration_start: Instant,
    deadline: Instant,
) -> bool {
    let now = Instant::now();
    if nodes_this_iter == 0 || nodes_prev_iter == 0 {
        return now < deadline;
    }

    let ebf = (nodes_this_iter as f64 / nodes_prev_iter as f64).sqrt();
    let expected_nodes_next = nodes_this_iter as f64 * ebf;

    let iteration_ms = now.duration_since(iteration_start).as_millis() as f64;
    let ms_per_node = iteration_ms / nodes_this_iter as f64;
    let expected_ms_next = expected_nodes_next * ms_per_node;

    now + Duration::from_millis(expected_ms_next as u64) <= deadline
}
