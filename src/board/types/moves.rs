//! Move records.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::{Color, Piece};
use super::square::Square;

/// A move: origin, destination and the three special-move markers.
///
/// `is_en_passant`, `is_castle` and `promotion` are mutually exclusive.
/// Castling is recorded as the king's two-square move; the rook jump is
/// implied.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub is_en_passant: bool,
    pub is_castle: bool,
    pub promotion: Option<Piece>,
}

impl Move {
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            is_en_passant: false,
            is_castle: false,
            promotion: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            is_en_passant: true,
            is_castle: false,
            promotion: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn castle(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            is_en_passant: false,
            is_castle: true,
            promotion: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            is_en_passant: false,
            is_castle: false,
            promotion: Some(piece),
        }
    }

    /// Coordinate notation: `e2e4`, `e7e8q`.
    #[must_use]
    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(p) => format!("{}{}{}", self.from, self.to, p.to_char(Color::Black)),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

// Two moves are the same move when origin, destination and promotion agree;
// the en-passant and castle markers are derivable from the position.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uci_rendering() {
        let m = Move::new(Square::new(1, 4), Square::new(3, 4));
        assert_eq!(m.to_uci(), "e2e4");
        let p = Move::promotion(Square::new(6, 0), Square::new(7, 0), Piece::Queen);
        assert_eq!(p.to_uci(), "a7a8q");
    }

    #[test]
    fn equality_ignores_derived_flags() {
        let plain = Move::new(Square::new(4, 4), Square::new(5, 3));
        let ep = Move::en_passant(Square::new(4, 4), Square::new(5, 3));
        assert_eq!(plain, ep);

        let q = Move::promotion(Square::new(6, 0), Square::new(7, 0), Piece::Queen);
        let r = Move::promotion(Square::new(6, 0), Square::new(7, 0), Piece::Rook);
        assert_ne!(q, r);
    }
}
