//! Legal move generation.
//!
//! One scan over the occupied squares produces the side-to-move's
//! pseudo-legal moves and, simultaneously, the set of squares the enemy
//! controls (as (attacked, attacker) pairs). A filter then rejects illegal
//! pseudo-legal moves using that attack information alone; no move is ever
//! executed on the board during generation.

use super::state::Board;
use super::types::{
    Color, Move, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Squares the enemy controls, recorded while scanning enemy pieces.
struct AttackMap {
    controlled: [[bool; 8]; 8],
    /// (attacked square, attacker square) pairs.
    pairs: Vec<(Square, Square)>,
}

impl AttackMap {
    fn new() -> Self {
        AttackMap {
            controlled: [[false; 8]; 8],
            pairs: Vec::with_capacity(64),
        }
    }

    #[inline]
    fn record(&mut self, attacked: Square, attacker: Square) {
        self.controlled[attacked.rank_idx()][attacked.file_idx()] = true;
        self.pairs.push((attacked, attacker));
    }

    #[inline]
    fn is_attacked(&self, square: Square) -> bool {
        self.controlled[square.rank_idx()][square.file_idx()]
    }

    fn attackers_of(&self, square: Square) -> Vec<Square> {
        self.pairs
            .iter()
            .filter(|(attacked, _)| *attacked == square)
            .map(|&(_, attacker)| attacker)
            .collect()
    }
}

impl Board {
    /// All legal moves for the side to move. Also refreshes `in_check`.
    pub fn generate_legal_moves(&mut self) -> Vec<Move> {
        self.generate(false)
    }

    /// Legal captures only (including en passant), for quiescence. Also
    /// refreshes `in_check`.
    pub fn generate_capture_moves(&mut self) -> Vec<Move> {
        self.generate(true)
    }

    fn generate(&mut self, captures_only: bool) -> Vec<Move> {
        let us = self.side_to_move();
        let king_sq = self.king_square(us);

        let squares: Vec<Square> = self.occupied.iter().copied().collect();
        let mut pseudo: Vec<Move> = Vec::with_capacity(64);
        let mut attacks = AttackMap::new();

        for sq in squares {
            let Some((color, piece)) = self.piece_at(sq) else {
                continue;
            };
            if color == us {
                self.pseudo_moves_for(sq, piece, us, &mut pseudo);
            } else {
                self.record_attacks(sq, piece, color, &mut attacks);
            }
        }
        self.generate_castles(us, &mut pseudo);

        let checkers = attacks.attackers_of(king_sq);
        self.in_check = !checkers.is_empty();

        let mut legal = Vec::with_capacity(pseudo.len());
        for mv in pseudo {
            if captures_only && !mv.is_en_passant && self.piece_at(mv.to).is_none() {
                continue;
            }
            if self.passes_legality_filter(&mv, king_sq, &attacks, &checkers) {
                legal.push(mv);
            }
        }
        legal
    }

    /// The non-executing legality filter over pseudo-legal moves.
    fn passes_legality_filter(
        &self,
        mv: &Move,
        king_sq: Square,
        attacks: &AttackMap,
        checkers: &[Square],
    ) -> bool {
        if mv.is_castle {
            // The king may not castle out of, through, or into an attack.
            let transit = Square::new(mv.from.rank(), (mv.from.file() + mv.to.file()) / 2);
            return !attacks.is_attacked(mv.from)
                && !attacks.is_attacked(transit)
                && !attacks.is_attacked(mv.to);
        }

        let Some((_, piece)) = self.piece_at(mv.from) else {
            return false;
        };

        if piece == Piece::King {
            if attacks.is_attacked(mv.to) {
                return false;
            }
            // A sliding checker keeps attacking through the king's current
            // square, so the king must step off the checking line entirely
            // (capturing the checker is the one exception).
            for &checker in checkers {
                if let Some((_, checker_piece)) = self.piece_at(checker) {
                    if checker_piece.is_slider()
                        && mv.to != checker
                        && mv.to.is_on_line(checker, king_sq)
                    {
                        return false;
                    }
                }
            }
            return true;
        }

        match checkers {
            [] => {}
            [checker] => {
                let checker = *checker;
                let checker_is_slider = self
                    .piece_at(checker)
                    .is_some_and(|(_, p)| p.is_slider());
                let captures_checker = mv.to == checker
                    || (mv.is_en_passant
                        && Square::new(mv.from.rank(), mv.to.file()) == checker);
                let interposes = checker_is_slider && mv.to.is_between(checker, king_sq);
                if !captures_checker && !interposes {
                    return false;
                }
            }
            // Double check: only the king may move.
            _ => return false,
        }

        // A piece pinned against the king must stay on the pinning ray.
        for &(attacked, attacker) in &attacks.pairs {
            if attacked != mv.from {
                continue;
            }
            let Some((_, attacker_piece)) = self.piece_at(attacker) else {
                continue;
            };
            if !attacker_piece.is_slider() {
                continue;
            }
            if self.is_only_piece_between(attacker, king_sq, mv.from) {
                let stays_on_ray = mv.to == attacker || mv.to.is_between(attacker, king_sq);
                if !stays_on_ray {
                    return false;
                }
            }
        }

        // An en-passant capture removes two pawns from one rank at once; if
        // the king shares that rank, a rook or queen may be waiting behind
        // them.
        if mv.is_en_passant
            && mv.from.rank() == king_sq.rank()
            && self.en_passant_exposes_king(mv, king_sq)
        {
            return false;
        }

        true
    }

    /// Simulate the two-pawn removal of an en-passant capture and report
    /// whether an enemy rook or queen is revealed along the king's rank.
    fn en_passant_exposes_king(&self, mv: &Move, king_sq: Square) -> bool {
        let us = self.side_to_move();
        let captured_sq = Square::new(mv.from.rank(), mv.to.file());
        let step = (mv.from.file() - king_sq.file()).signum();

        let mut file = king_sq.file() + step;
        while (0..8).contains(&file) {
            let sq = Square::new(king_sq.rank(), file);
            if sq != mv.from && sq != captured_sq {
                if let Some((color, piece)) = self.piece_at(sq) {
                    return color != us && matches!(piece, Piece::Rook | Piece::Queen);
                }
            }
            file += step;
        }
        false
    }

    fn pseudo_moves_for(&self, sq: Square, piece: Piece, us: Color, out: &mut Vec<Move>) {
        match piece {
            Piece::Pawn => self.pawn_moves(sq, us, out),
            Piece::Knight => self.step_moves(sq, us, &KNIGHT_OFFSETS, out),
            Piece::King => self.step_moves(sq, us, &KING_OFFSETS, out),
            Piece::Bishop => self.ray_moves(sq, us, &BISHOP_DIRECTIONS, out),
            Piece::Rook => self.ray_moves(sq, us, &ROOK_DIRECTIONS, out),
            Piece::Queen => {
                self.ray_moves(sq, us, &ROOK_DIRECTIONS, out);
                self.ray_moves(sq, us, &BISHOP_DIRECTIONS, out);
            }
        }
    }

    fn pawn_moves(&self, sq: Square, us: Color, out: &mut Vec<Move>) {
        let dir: i8 = if us.is_white() { 1 } else { -1 };
        let start_rank: i8 = if us.is_white() { 1 } else { 6 };
        let promotion_rank: i8 = if us.is_white() { 7 } else { 0 };

        if let Some(one) = sq.offset(dir, 0) {
            if self.piece_at(one).is_none() {
                if one.rank() == promotion_rank {
                    for promoted in Piece::PROMOTION_CHOICES {
                        out.push(Move::promotion(sq, one, promoted));
                    }
                } else {
                    out.push(Move::new(sq, one));
                    if sq.rank() == start_rank {
                        if let Some(two) = sq.offset(2 * dir, 0) {
                            if self.piece_at(two).is_none() {
                                out.push(Move::new(sq, two));
                            }
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(target) = sq.offset(dir, df) else {
                continue;
            };
            match self.piece_at(target) {
                Some((color, _)) if color != us => {
                    if target.rank() == promotion_rank {
                        for promoted in Piece::PROMOTION_CHOICES {
                            out.push(Move::promotion(sq, target, promoted));
                        }
                    } else {
                        out.push(Move::new(sq, target));
                    }
                }
                None if self.en_passant_target == Some(target) => {
                    out.push(Move::en_passant(sq, target));
                }
                _ => {}
            }
        }
    }

    fn step_moves(&self, sq: Square, us: Color, offsets: &[(i8, i8)], out: &mut Vec<Move>) {
        for &(dr, df) in offsets {
            let Some(target) = sq.offset(dr, df) else {
                continue;
            };
            match self.piece_at(target) {
                Some((color, _)) if color == us => {}
                _ => out.push(Move::new(sq, target)),
            }
        }
    }

    fn ray_moves(&self, sq: Square, us: Color, directions: &[(i8, i8)], out: &mut Vec<Move>) {
        for &(dr, df) in directions {
            let mut current = sq;
            while let Some(target) = current.offset(dr, df) {
                match self.piece_at(target) {
                    None => out.push(Move::new(sq, target)),
                    Some((color, _)) => {
                        if color != us {
                            out.push(Move::new(sq, target));
                        }
                        break;
                    }
                }
                current = target;
            }
        }
    }

    fn generate_castles(&self, us: Color, out: &mut Vec<Move>) {
        let rank: i8 = if us.is_white() { 0 } else { 7 };
        let (kingside, queenside) = if us.is_white() {
            (CASTLE_WHITE_K, CASTLE_WHITE_Q)
        } else {
            (CASTLE_BLACK_K, CASTLE_BLACK_Q)
        };
        let king_from = Square::new(rank, 4);

        if self.has_castling_right(kingside)
            && self.piece_at(Square::new(rank, 5)).is_none()
            && self.piece_at(Square::new(rank, 6)).is_none()
        {
            out.push(Move::castle(king_from, Square::new(rank, 6)));
        }

        if self.has_castling_right(queenside)
            && self.piece_at(Square::new(rank, 1)).is_none()
            && self.piece_at(Square::new(rank, 2)).is_none()
            && self.piece_at(Square::new(rank, 3)).is_none()
        {
            out.push(Move::castle(king_from, Square::new(rank, 2)));
        }
    }

    /// Record every square an enemy piece controls. Ray attacks stop at the
    /// first occupied square but do record it, so defended pieces and
    /// blockers count as attacked.
    fn record_attacks(&self, sq: Square, piece: Piece, attacker_color: Color, out: &mut AttackMap) {
        match piece {
            Piece::Pawn => {
                let dir: i8 = if attacker_color.is_white() { 1 } else { -1 };
                for df in [-1, 1] {
                    if let Some(target) = sq.offset(dir, df) {
                        out.record(target, sq);
                    }
                }
            }
            Piece::Knight => {
                for &(dr, df) in &KNIGHT_OFFSETS {
                    if let Some(target) = sq.offset(dr, df) {
                        out.record(target, sq);
                    }
                }
            }
            Piece::King => {
                for &(dr, df) in &KING_OFFSETS {
                    if let Some(target) = sq.offset(dr, df) {
                        out.record(target, sq);
                    }
                }
            }
            Piece::Bishop => self.record_ray_attacks(sq, &BISHOP_DIRECTIONS, out),
            Piece::Rook => self.record_ray_attacks(sq, &ROOK_DIRECTIONS, out),
            Piece::Queen => {
                self.record_ray_attacks(sq, &ROOK_DIRECTIONS, out);
                self.record_ray_attacks(sq, &BISHOP_DIRECTIONS, out);
            }
        }
    }

    fn record_ray_attacks(&self, sq: Square, directions: &[(i8, i8)], out: &mut AttackMap) {
        for &(dr, df) in directions {
            let mut current = sq;
            while let Some(target) = current.offset(dr, df) {
                out.record(target, sq);
                if self.piece_at(target).is_some() {
                    break;
                }
                current = target;
            }
        }
    }

    /// Leaf count of the legal move tree to the given depth.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in &moves {
            self.make_move(mv);
            nodes += self.perft(depth - 1);
            self.undo_move(mv);
        }
        nodes
    }

    /// Whether the side to move is checkmated.
    pub fn is_checkmate(&mut self) -> bool {
        self.generate_legal_moves().is_empty() && self.in_check
    }

    /// Whether the side to move is stalemated.
    pub fn is_stalemate(&mut self) -> bool {
        self.generate_legal_moves().is_empty() && !self.in_check
    }
}
