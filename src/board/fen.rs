//! Position-description (FEN) loading and serialization.

use super::error::FenError;
use super::state::Board;
use super::types::{
    Color, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};

impl Board {
    /// Parse the six whitespace-separated FEN fields into a board.
    ///
    /// Rebuilds the occupied-square set, recomputes the hash from scratch
    /// and seeds the repetition counter for the loaded position.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(FenError::MissingFields { found: parts.len() });
        }

        let mut board = Board::empty();

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount { found: ranks.len() });
        }
        // FEN lists ranks 8 down to 1.
        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - row as i8;
            let mut file = 0i8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as i8;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { piece: c })?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file >= 8 {
                        return Err(FenError::TooManyFiles { rank: rank as usize });
                    }
                    board.put(Square::new(rank, file), (color, piece));
                    file += 1;
                }
            }
            if file > 8 {
                return Err(FenError::TooManyFiles { rank: rank as usize });
            }
        }

        match parts[1] {
            "w" => board.white_to_move = true,
            "b" => board.white_to_move = false,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        }

        for c in parts[2].chars() {
            match c {
                'K' => board.castling_rights |= CASTLE_WHITE_K,
                'Q' => board.castling_rights |= CASTLE_WHITE_Q,
                'k' => board.castling_rights |= CASTLE_BLACK_K,
                'q' => board.castling_rights |= CASTLE_BLACK_Q,
                '-' => {}
                other => return Err(FenError::InvalidCastling { rights: other }),
            }
        }

        board.en_passant_target = if parts[3] == "-" {
            None
        } else {
            Some(
                Square::from_algebraic(parts[3]).map_err(|_| FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                })?,
            )
        };

        board.halfmove_clock = parts[4].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[4].to_string(),
        })?;
        board.fullmove_number = parts[5].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[5].to_string(),
        })?;

        board.hash = board.compute_hash_from_scratch();
        board.repetitions.insert(board.hash, 1);
        Ok(board)
    }

    /// Serialize the position back into FEN. The round-trip through
    /// `try_from_fen` is the identity for every legal position.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_run = 0u8;
            for file in 0..8 {
                match self.piece_at(Square::new(rank, file)) {
                    Some((color, piece)) => {
                        if empty_run > 0 {
                            fen.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        fen.push(piece.to_char(color));
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                fen.push((b'0' + empty_run) as char);
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.white_to_move { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            if self.has_castling_right(CASTLE_WHITE_K) {
                fen.push('K');
            }
            if self.has_castling_right(CASTLE_WHITE_Q) {
                fen.push('Q');
            }
            if self.has_castling_right(CASTLE_BLACK_K) {
                fen.push('k');
            }
            if self.has_castling_right(CASTLE_BLACK_Q) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant_target {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}
