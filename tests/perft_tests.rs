//! Reference perft counts for the move generator.
//!
//! The full-depth counts take minutes in a debug build; they are `#[ignore]`d
//! and meant for `cargo test --release -- --ignored`.

use skewer::board::Board;

fn perft_from(fen: &str, depth: u32) -> u64 {
    let mut board = Board::try_from_fen(fen).expect(fen);
    board.perft(depth)
}

const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const ROOK_ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const PROMOTION_TANGLE: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

#[test]
fn startpos_shallow() {
    assert_eq!(perft_from(STARTPOS, 1), 20);
    assert_eq!(perft_from(STARTPOS, 2), 400);
    assert_eq!(perft_from(STARTPOS, 3), 8_902);
    assert_eq!(perft_from(STARTPOS, 4), 197_281);
}

#[test]
fn kiwipete_shallow() {
    assert_eq!(perft_from(KIWIPETE, 1), 48);
    assert_eq!(perft_from(KIWIPETE, 2), 2_039);
    assert_eq!(perft_from(KIWIPETE, 3), 97_862);
}

#[test]
fn rook_endgame_shallow() {
    assert_eq!(perft_from(ROOK_ENDGAME, 1), 14);
    assert_eq!(perft_from(ROOK_ENDGAME, 2), 191);
    assert_eq!(perft_from(ROOK_ENDGAME, 3), 2_812);
    assert_eq!(perft_from(ROOK_ENDGAME, 4), 43_238);
}

#[test]
fn promotion_tangle_shallow() {
    assert_eq!(perft_from(PROMOTION_TANGLE, 1), 6);
    assert_eq!(perft_from(PROMOTION_TANGLE, 2), 264);
    assert_eq!(perft_from(PROMOTION_TANGLE, 3), 9_467);
}

#[test]
#[ignore = "minutes of work; run with --release"]
fn startpos_depth_six() {
    assert_eq!(perft_from(STARTPOS, 5), 4_865_609);
    assert_eq!(perft_from(STARTPOS, 6), 119_060_324);
}

#[test]
#[ignore = "minutes of work; run with --release"]
fn kiwipete_depth_five() {
    assert_eq!(perft_from(KIWIPETE, 4), 4_085_603);
    assert_eq!(perft_from(KIWIPETE, 5), 193_690_690);
}

#[test]
#[ignore = "minutes of work; run with --release"]
fn rook_endgame_depth_six() {
    assert_eq!(perft_from(ROOK_ENDGAME, 5), 674_624);
    assert_eq!(perft_from(ROOK_ENDGAME, 6), 11_030_083);
}

#[test]
#[ignore = "minutes of work; run with --release"]
fn promotion_tangle_depth_five() {
    assert_eq!(perft_from(PROMOTION_TANGLE, 4), 422_333);
    assert_eq!(perft_from(PROMOTION_TANGLE, 5), 15_833_292);
}
