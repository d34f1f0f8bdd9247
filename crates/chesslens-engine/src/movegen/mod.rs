//! Move generation.
//!
//! Pseudo-legal moves come from the attack tables in [`attacks`]; a move is
//! legal when the mover's king is not attacked after playing it on a scratch
//! copy of the board. That single check covers pins, discovered checks and
//! en passant captures that expose the king along a rank.

pub mod attacks;
pub mod perft;

use crate::{Bitboard, Board, Move};
use chesslens_core::{CastleSide, Color, Piece, PieceKind, Square};

use attacks::{is_king_attacked, is_square_attacked, pawn_attacks, piece_attacks};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array
/// avoids heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        if self.len < Self::MAX_MOVES {
            self.moves[self.len] = m;
            self.len += 1;
        }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    pub fn to_vec(&self) -> Vec<Move> {
        self.as_slice().to_vec()
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the side to move.
pub fn legal_moves(board: &Board) -> MoveList {
    let mut moves = pseudo_legal_moves(board);
    let us = board.side_to_move();
    moves.retain(|m| !is_king_attacked(&board.apply_unchecked(*m), us));
    moves
}

/// Generates moves that obey piece geometry and occupancy but may leave the
/// mover's king attacked.
///
/// Castling is only generated when the king's start, transit and
/// destination squares are all safe, since those conditions are part of
/// the castling rule itself.
pub fn pseudo_legal_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();
    generate_pawn_moves(board, &mut moves);
    generate_piece_moves(board, &mut moves);
    generate_castling_moves(board, &mut moves);
    moves
}

fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, capture: bool, us: Color) {
    if to.rank() == us.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::promote(from, to, kind, capture));
        }
    } else if capture {
        moves.push(Move::capture(from, to));
    } else {
        moves.push(Move::quiet(from, to));
    }
}

fn generate_pawn_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let theirs = board.color_pieces(us.opposite());
    let occupied = board.occupied();
    let forward = us.forward();

    for from in board.pieces_of(PieceKind::Pawn, us) {
        if let Some(one) = from.offset(0, forward).filter(|sq| !occupied.contains(*sq)) {
            push_pawn_move(moves, from, one, false, us);
            if from.rank() == us.pawn_rank() {
                if let Some(two) = one.offset(0, forward).filter(|sq| !occupied.contains(*sq)) {
                    moves.push(Move::double_push(from, two));
                }
            }
        }

        let targets = pawn_attacks(from, us);
        for to in targets & theirs {
            push_pawn_move(moves, from, to, true, us);
        }
        if let Some(ep) = board.en_passant().filter(|ep| targets.contains(*ep)) {
            moves.push(Move::en_passant(from, ep));
        }
    }
}

/// Knight, bishop, rook, queen and king moves share one table lookup.
fn generate_piece_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let ours = board.color_pieces(us);
    let theirs = board.color_pieces(us.opposite());
    let occupied = board.occupied();

    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        for from in board.pieces_of(kind, us) {
            let targets = piece_attacks(Piece::new(kind, us), from, occupied) & !ours;
            for to in targets {
                if theirs.contains(to) {
                    moves.push(Move::capture(from, to));
                } else {
                    moves.push(Move::quiet(from, to));
                }
            }
        }
    }
}

fn generate_castling_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.opposite();
    let rank = us.home_rank();
    let rights = board.castling_rights();
    let occupied = board.occupied();

    let Some(king_from) = Square::from_coords(4, rank) else {
        return;
    };
    if board.piece_at(king_from) != Some(Piece::new(PieceKind::King, us)) {
        return;
    }

    for side in CastleSide::BOTH {
        if !rights.has(us, side) {
            continue;
        }
        let (king_to_file, transit_file) = match side {
            CastleSide::Kingside => (6, 5),
            CastleSide::Queenside => (2, 3),
        };
        let (Some(rook_from), Some(king_to), Some(transit)) = (
            Square::from_coords(side.rook_file(), rank),
            Square::from_coords(king_to_file, rank),
            Square::from_coords(transit_file, rank),
        ) else {
            continue;
        };
        if board.piece_at(rook_from) != Some(Piece::new(PieceKind::Rook, us)) {
            continue;
        }
        if (attacks::between(king_from, rook_from) & occupied).is_not_empty() {
            continue;
        }
        let safe = [king_from, transit, king_to]
            .into_iter()
            .all(|sq| !is_square_attacked(board, sq, them));
        if safe {
            moves.push(Move::castle(king_from, king_to));
        }
    }
}

/// Squares the side to move could move a piece to, keyed by origin.
pub fn destinations_from(moves: &MoveList, from: Square) -> Bitboard {
    moves
        .iter()
        .filter(|m| m.from() == from)
        .map(|m| m.to())
        .collect()
}
