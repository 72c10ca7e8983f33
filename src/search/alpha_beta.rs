//! Negamax alpha-beta recursion.

use crate::ordering;
use crate::tt::{Bound, MIN_TRANSPOSITION_DEPTH};

use super::iterative::SearchContext;
use super::{NodeResult, INFINITY_SCORE, MATE_SCORE};

impl SearchContext<'_> {
    /// Search one node. `ply` is the distance from the root; the root keeps
    /// its pre-sorted move list and skips the draw and cache checks the
    /// driver already performed.
    pub(crate) fn search_node(
        &mut self,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        ply: i32,
    ) -> NodeResult {
        self.nodes += 1;
        let is_root = ply == 0;
        let mut tt_move = None;

        if !is_root {
            // The board's repetition counter already includes this node's
            // position (make_move bumped it); three visits on the current
            // line is a draw, as is an exhausted fifty-move clock.
            if self.board.repetition_count(self.board.hash()) >= 3 {
                return NodeResult::leaf(0);
            }
            if self.board.halfmove_clock >= 100 {
                return NodeResult::leaf(0);
            }

            if let Some(hit) = self.tt.probe(self.board.hash()) {
                if hit.depth >= depth {
                    let usable = match hit.bound {
                        Bound::Exact => true,
                        Bound::Lower => hit.score >= beta,
                        Bound::Upper => hit.score <= alpha,
                    };
                    if usable {
                        return NodeResult {
                            score: hit.score,
                            best_move: Some(hit.best_move),
                            best_response: hit.best_response,
                        };
                    }
                }
                tt_move = Some(hit.best_move);
            }
        }

        if depth == 0 {
            return NodeResult::leaf(self.quiesce(alpha, beta));
        }

        let mut moves = if is_root {
            self.root_moves.clone()
        } else {
            let mut moves = self.board.generate_legal_moves();
            ordering::sort_moves(self.board, &mut moves);
            moves
        };
        if moves.is_empty() {
            // Mated: prefer shallower mates by discounting the distance.
            let score = if self.board.in_check {
                -(MATE_SCORE - ply)
            } else {
                0
            };
            return NodeResult::leaf(score);
        }
        if let Some(tt_move) = tt_move {
            ordering::rotate_to_front(&mut moves, &tt_move);
        }

        let original_alpha = alpha;
        let mut best_score = -INFINITY_SCORE;
        let mut best_move = None;
        let mut best_response = None;

        for mv in &moves {
            if self.should_abort() {
                self.stop_flag = true;
                return NodeResult::leaf(0);
            }

            self.board.make_move(mv);
            let child = self.search_node(depth - 1, -beta, -alpha, ply + 1);
            self.board.undo_move(mv);

            if self.stop_flag {
                return NodeResult::leaf(0);
            }

            let score = -child.score;
            if score > best_score {
                best_score = score;
                best_move = Some(*mv);
                best_response = child.best_move;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        if depth >= MIN_TRANSPOSITION_DEPTH && !self.stop_flag {
            let bound = if best_score <= original_alpha {
                Bound::Upper
            } else if best_score >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            if let Some(best_move) = best_move {
                self.tt
                    .insert(self.board.hash(), depth, best_score, bound, best_move, best_response);
            }
        }

        NodeResult {
            score: best_score,
            best_move,
            best_response,
        }
    }
}
