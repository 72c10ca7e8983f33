//! FEN loader and serializer tests.

use crate::board::{Board, FenError, START_POS};

const ROUND_TRIP_CASES: &[&str] = &[
    START_POS,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    "4k3/8/8/8/8/8/8/4K3 b - - 73 112",
    "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 12 40",
];

#[test]
fn load_serialize_round_trip() {
    for fen in ROUND_TRIP_CASES {
        let board = Board::try_from_fen(fen).expect(fen);
        assert_eq!(&board.to_fen(), fen);
    }
}

#[test]
fn new_is_the_starting_position() {
    assert_eq!(Board::new().to_fen(), START_POS);
}

#[test]
fn loader_recomputes_hash_and_occupancy() {
    let board = Board::try_from_fen(START_POS).unwrap();
    assert_eq!(board.hash(), board.compute_hash_from_scratch());
    assert_eq!(board.occupied.len(), 32);
    assert_eq!(board.repetition_count(board.hash()), 1);
}

#[test]
fn missing_fields_are_rejected() {
    let err = Board::try_from_fen("8/8/8/8/8/8/8/8 w - -").unwrap_err();
    assert_eq!(err, FenError::MissingFields { found: 4 });
}

#[test]
fn bad_piece_characters_are_rejected() {
    let err = Board::try_from_fen("xnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap_err();
    assert_eq!(err, FenError::InvalidPiece { piece: 'x' });
}

#[test]
fn wrong_rank_count_is_rejected() {
    let err = Board::try_from_fen("8/8/8/8/8/8/8 w - - 0 1").unwrap_err();
    assert_eq!(err, FenError::InvalidRankCount { found: 7 });
}

#[test]
fn bad_side_to_move_is_rejected() {
    let err = Board::try_from_fen("8/8/8/8/8/8/8/4K3 x - - 0 1").unwrap_err();
    assert!(matches!(err, FenError::InvalidSideToMove { .. }));
}

#[test]
fn bad_castling_characters_are_rejected() {
    let err = Board::try_from_fen("8/8/8/8/8/8/8/4K3 w Kz - 0 1").unwrap_err();
    assert_eq!(err, FenError::InvalidCastling { rights: 'z' });
}

#[test]
fn bad_en_passant_square_is_rejected() {
    let err = Board::try_from_fen("8/8/8/8/8/8/8/4K3 w - j9 0 1").unwrap_err();
    assert!(matches!(err, FenError::InvalidEnPassant { .. }));
}

#[test]
fn bad_counters_are_rejected() {
    let err = Board::try_from_fen("8/8/8/8/8/8/8/4K3 w - - abc 1").unwrap_err();
    assert!(matches!(err, FenError::InvalidCounter { .. }));
}

#[test]
fn overfull_ranks_are_rejected() {
    let err = Board::try_from_fen("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .unwrap_err();
    assert!(matches!(err, FenError::TooManyFiles { .. }));
}
