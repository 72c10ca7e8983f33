//! Reversible move application.
//!
//! `make_move` mutates the grid, flags, clocks and hash in place and pushes
//! an undo record; `undo_move` pops it and restores the previous position
//! exactly. Hash maintenance is incremental: every changed term is XORed in
//! or out, and the accumulated delta is stored so undo is a single XOR.

use super::error::MoveParseError;
use super::state::{Board, UndoState};
use super::types::{
    Color, Move, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};
use crate::zobrist::KEYS;

const KINGSIDE_ROOK_FILE: i8 = 7;
const QUEENSIDE_ROOK_FILE: i8 = 0;
const KINGSIDE_ROOK_DEST_FILE: i8 = 5;
const QUEENSIDE_ROOK_DEST_FILE: i8 = 3;

impl Board {
    /// Apply a legal move.
    ///
    /// The move must come from the generator (or be otherwise known legal);
    /// no legality checking happens here.
    pub fn make_move(&mut self, mv: &Move) {
        let mover = self.side_to_move();
        let prior_hash = self.hash;
        let mut hash = self.hash;

        let undo_base = UndoState {
            castling_rights: self.castling_rights,
            en_passant_target: self.en_passant_target,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            white_to_move: self.white_to_move,
            captured: None,
            hash_delta: 0,
        };

        hash ^= KEYS.side_to_move;
        if let Some(ep) = self.en_passant_target.take() {
            hash ^= KEYS.en_passant_file[ep.file_idx()];
        }

        // Remove the captured piece, if any.
        let captured = if mv.is_en_passant {
            let victim_sq = Square::new(mv.from.rank(), mv.to.file());
            let victim = self.take(victim_sq);
            debug_assert_eq!(victim, Some((mover.opponent(), Piece::Pawn)));
            if let Some((color, piece)) = victim {
                hash ^= KEYS.piece_square(color, piece, victim_sq);
            }
            victim
        } else if !mv.is_castle {
            let victim = self.take(mv.to);
            if let Some((color, piece)) = victim {
                debug_assert_ne!(piece, Piece::King, "king capture implies corrupt position");
                hash ^= KEYS.piece_square(color, piece, mv.to);
            }
            victim
        } else {
            None
        };

        let Some((_, moving_piece)) = self.take(mv.from) else {
            panic!("make_move from an empty square: {mv}");
        };
        hash ^= KEYS.piece_square(mover, moving_piece, mv.from);

        if mv.is_castle {
            // King two squares over, rook to the adjacent inner square.
            self.put(mv.to, (mover, Piece::King));
            hash ^= KEYS.piece_square(mover, Piece::King, mv.to);

            let rank = mv.from.rank();
            let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
                (
                    Square::new(rank, KINGSIDE_ROOK_FILE),
                    Square::new(rank, KINGSIDE_ROOK_DEST_FILE),
                )
            } else {
                (
                    Square::new(rank, QUEENSIDE_ROOK_FILE),
                    Square::new(rank, QUEENSIDE_ROOK_DEST_FILE),
                )
            };
            let rook = self.take(rook_from);
            debug_assert_eq!(rook, Some((mover, Piece::Rook)));
            self.put(rook_to, (mover, Piece::Rook));
            hash ^= KEYS.piece_square(mover, Piece::Rook, rook_from);
            hash ^= KEYS.piece_square(mover, Piece::Rook, rook_to);
        } else {
            let placed = match mv.promotion {
                Some(promoted) => (mover, promoted),
                None => (mover, moving_piece),
            };
            self.put(mv.to, placed);
            hash ^= KEYS.piece_square(placed.0, placed.1, mv.to);
        }

        // A two-square pawn advance exposes the skipped square.
        if moving_piece == Piece::Pawn && (mv.to.rank() - mv.from.rank()).abs() == 2 {
            let skipped = Square::new((mv.from.rank() + mv.to.rank()) / 2, mv.from.file());
            self.en_passant_target = Some(skipped);
            hash ^= KEYS.en_passant_file[skipped.file_idx()];
        }

        let new_rights = updated_castling_rights(self.castling_rights, mover, moving_piece, mv);
        hash ^= KEYS.castling_set(self.castling_rights ^ new_rights);
        self.castling_rights = new_rights;

        if moving_piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if !mover.is_white() {
            self.fullmove_number += 1;
        }
        self.white_to_move = !self.white_to_move;

        self.hash = hash;
        *self.repetitions.entry(hash).or_insert(0) += 1;

        self.undo_stack.push(UndoState {
            captured,
            hash_delta: prior_hash ^ hash,
            ..undo_base
        });
    }

    /// Reverse the most recent `make_move`.
    ///
    /// Calling this without a matching make is an invariant violation.
    pub fn undo_move(&mut self, mv: &Move) {
        let Some(undo) = self.undo_stack.pop() else {
            panic!("undo_move with an empty undo stack");
        };

        // Leave the outgoing position's visit count behind.
        if let Some(count) = self.repetitions.get_mut(&self.hash) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&self.hash);
            }
        }
        self.hash ^= undo.hash_delta;

        let mover = if undo.white_to_move {
            Color::White
        } else {
            Color::Black
        };

        if mv.is_castle {
            let taken = self.take(mv.to);
            debug_assert_eq!(taken, Some((mover, Piece::King)));
            self.put(mv.from, (mover, Piece::King));

            let rank = mv.from.rank();
            let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
                (
                    Square::new(rank, KINGSIDE_ROOK_FILE),
                    Square::new(rank, KINGSIDE_ROOK_DEST_FILE),
                )
            } else {
                (
                    Square::new(rank, QUEENSIDE_ROOK_FILE),
                    Square::new(rank, QUEENSIDE_ROOK_DEST_FILE),
                )
            };
            let rook = self.take(rook_to);
            debug_assert_eq!(rook, Some((mover, Piece::Rook)));
            self.put(rook_from, (mover, Piece::Rook));
        } else {
            let Some((color, piece_now)) = self.take(mv.to) else {
                panic!("undo_move destination is empty: {mv}");
            };
            debug_assert_eq!(color, mover);
            let original = if mv.promotion.is_some() {
                Piece::Pawn
            } else {
                piece_now
            };
            self.put(mv.from, (mover, original));

            if mv.is_en_passant {
                let victim_sq = Square::new(mv.from.rank(), mv.to.file());
                if let Some(victim) = undo.captured {
                    self.put(victim_sq, victim);
                }
            } else if let Some(victim) = undo.captured {
                self.put(mv.to, victim);
            }
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant_target = undo.en_passant_target;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.white_to_move = undo.white_to_move;
    }

    /// Parse 4- or 5-character coordinate notation (`e2e4`, `e7e8q`) into a
    /// move, inferring the en-passant and castle markers from the board.
    pub fn parse_move(&self, notation: &str) -> Result<Move, MoveParseError> {
        if !notation.is_ascii() || (notation.len() != 4 && notation.len() != 5) {
            return Err(MoveParseError::InvalidLength {
                len: notation.len(),
            });
        }

        let bad_square = |_| MoveParseError::InvalidSquare {
            notation: notation.to_string(),
        };
        let from = Square::from_algebraic(&notation[0..2]).map_err(bad_square)?;
        let to = Square::from_algebraic(&notation[2..4]).map_err(bad_square)?;

        let promotion = match notation.len() {
            5 => {
                let c = notation
                    .chars()
                    .nth(4)
                    .ok_or(MoveParseError::InvalidLength { len: 4 })?;
                match Piece::from_char(c) {
                    Some(p) if Piece::PROMOTION_CHOICES.contains(&p) => Some(p),
                    _ => return Err(MoveParseError::InvalidPromotion { piece: c }),
                }
            }
            _ => None,
        };

        let Some((_, piece)) = self.piece_at(from) else {
            return Err(MoveParseError::EmptyOrigin {
                notation: notation.to_string(),
            });
        };

        let is_en_passant = piece == Piece::Pawn
            && self.en_passant_target == Some(to)
            && from.file() != to.file();
        let is_castle = piece == Piece::King && (to.file() - from.file()).abs() == 2;

        Ok(Move {
            from,
            to,
            is_en_passant,
            is_castle,
            promotion,
        })
    }
}

/// Castling rights after a move: a king move forfeits both of the mover's
/// rights, and any move onto or off of a corner square forfeits the right
/// tied to that corner, whichever piece is involved.
fn updated_castling_rights(rights: u8, mover: Color, moving_piece: Piece, mv: &Move) -> u8 {
    let mut rights = rights;

    if moving_piece == Piece::King {
        rights &= match mover {
            Color::White => !(CASTLE_WHITE_K | CASTLE_WHITE_Q),
            Color::Black => !(CASTLE_BLACK_K | CASTLE_BLACK_Q),
        };
    }

    for sq in [mv.from, mv.to] {
        let lost = match (sq.rank(), sq.file()) {
            (0, 7) => CASTLE_WHITE_K,
            (0, 0) => CASTLE_WHITE_Q,
            (7, 7) => CASTLE_BLACK_K,
            (7, 0) => CASTLE_BLACK_Q,
            _ => 0,
        };
        rights &= !lost;
    }

    rights
}
