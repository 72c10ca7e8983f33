//! Transposition-table behavior through the public API, including the
//! reader/writer contract the ponder thread relies on.

use std::sync::Arc;
use std::thread;

use skewer::board::{Board, Move, Square};
use skewer::search::search_fixed_depth;
use skewer::tt::{Bound, TranspositionTable, MAX_AGE_DIFF};

fn mv(from: (i8, i8), to: (i8, i8)) -> Move {
    Move::new(Square::new(from.0, from.1), Square::new(to.0, to.1))
}

#[test]
fn depth_preference_in_both_orders() {
    let tt = TranspositionTable::new();
    tt.insert(7, 2, 10, Bound::Exact, mv((0, 0), (0, 1)), None);
    tt.insert(7, 5, 20, Bound::Exact, mv((1, 0), (1, 1)), None);
    assert_eq!(tt.probe(7).unwrap().depth, 5);

    let tt = TranspositionTable::new();
    tt.insert(7, 5, 20, Bound::Exact, mv((1, 0), (1, 1)), None);
    tt.insert(7, 2, 10, Bound::Exact, mv((0, 0), (0, 1)), None);
    let probe = tt.probe(7).unwrap();
    assert_eq!(probe.depth, 5);
    assert_eq!(probe.score, 20);
}

#[test]
fn aging_prunes_only_untouched_entries() {
    let tt = TranspositionTable::new();
    tt.insert(1, 4, 0, Bound::Exact, mv((0, 0), (0, 1)), None);
    tt.insert(2, 4, 0, Bound::Exact, mv((0, 0), (0, 1)), None);

    for _ in 0..=MAX_AGE_DIFF {
        tt.advance_age();
        // Entry 2 is probed (and so refreshed) every generation.
        assert!(tt.probe(2).is_some());
    }
    tt.prune();

    assert!(tt.probe(1).is_none(), "stale entry evicted");
    assert!(tt.probe(2).is_some(), "refreshed entry survives");
}

#[test]
fn reset_forgets_the_game() {
    let tt = TranspositionTable::new();
    let mut board = Board::new();
    search_fixed_depth(&mut board, &tt, 3).unwrap();
    assert!(!tt.is_empty());
    tt.reset();
    assert!(tt.is_empty());
}

#[test]
fn concurrent_readers_and_writers_stay_consistent() {
    let tt = Arc::new(TranspositionTable::new());
    let mut handles = Vec::new();

    // Two writers on disjoint key ranges, two readers over everything.
    for writer in 0..2u64 {
        let tt = Arc::clone(&tt);
        handles.push(thread::spawn(move || {
            for i in 0..2000u64 {
                let key = writer * 1_000_000 + i;
                tt.insert(key, 4, i as i32, Bound::Exact, mv((0, 0), (0, 1)), None);
            }
        }));
    }
    for _ in 0..2 {
        let tt = Arc::clone(&tt);
        handles.push(thread::spawn(move || {
            for i in 0..2000u64 {
                if let Some(probe) = tt.probe(i) {
                    // A visible entry is never torn.
                    assert_eq!(probe.score, i as i32);
                    assert_eq!(probe.depth, 4);
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tt.len(), 4000);
}

#[test]
fn search_results_are_visible_to_a_second_searcher() {
    // What one search learns, a search on another thread can reuse; this is
    // the mechanism pondering depends on.
    let tt = Arc::new(TranspositionTable::new());
    let mut board = Board::new();
    let eval = search_fixed_depth(&mut board, &tt, 4).unwrap();
    let root_hash = board.hash();

    let tt_clone = Arc::clone(&tt);
    let handle = thread::spawn(move || tt_clone.probe(root_hash));
    let probe = handle.join().unwrap().expect("entry visible across threads");
    assert_eq!(probe.best_move, eval.best_move);
}
