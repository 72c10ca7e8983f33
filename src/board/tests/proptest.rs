//! Property-based board tests.

use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng as _;

use super::assert_boards_identical;
use crate::board::{Board, Move};

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=24usize
}

proptest! {
    /// make_move followed by undo_move restores every observable component.
    #[test]
    fn prop_make_undo_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let reference = board.clone();

        let mut line: Vec<Move> = Vec::new();
        for _ in 0..num_moves {
            let moves = board.generate_legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(&mv);
            line.push(mv);
        }

        while let Some(mv) = line.pop() {
            board.undo_move(&mv);
        }

        assert_boards_identical(&board, &reference);
    }

    /// The incremental hash always equals the hash recomputed from scratch.
    #[test]
    fn prop_incremental_hash_is_consistent(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = board.generate_legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(&mv);
            prop_assert_eq!(board.hash(), board.compute_hash_from_scratch());
            prop_assert_eq!(board.to_fen(), Board::try_from_fen(&board.to_fen()).unwrap().to_fen());
        }
    }

    /// The repetition count of the current position is always at least one.
    #[test]
    fn prop_current_position_is_counted(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = board.generate_legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            board.make_move(&mv);
            prop_assert!(board.repetition_count(board.hash()) >= 1);
        }
    }
}
