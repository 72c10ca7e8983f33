//! Board representation and game rules.
//!
//! An 8x8 piece grid with a cached set of occupied squares, reversible
//! make/undo through an explicit undo stack, an incrementally maintained
//! Zobrist hash, and a repetition counter over the current line of play.
//! Move generation produces legal moves only.

mod error;
mod fen;
mod make_unmake;
mod movegen;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, SquareError};
pub use state::{Board, START_POS};
pub use types::{Color, Move, Piece, Square};
