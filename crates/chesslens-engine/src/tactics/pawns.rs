//! Pawn structure classification.

use crate::{Bitboard, Board};
use chesslens_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};

/// Weak and strong pawns of one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnStructure {
    /// No friendly pawn on either neighbouring file.
    pub isolated: Vec<Square>,
    /// Shares its file with another friendly pawn.
    pub doubled: Vec<Square>,
    /// No enemy pawn in front of it on its own or a neighbouring file.
    pub passed: Vec<Square>,
    /// Cannot be protected by a pawn and cannot advance without being taken.
    pub backward: Vec<Square>,
}

/// Squares strictly in front of `rank` from `color`'s point of view.
fn ranks_ahead(rank: u8, color: Color) -> Bitboard {
    (0..8)
        .filter(|&r| match color {
            Color::White => r > rank,
            Color::Black => r < rank,
        })
        .fold(Bitboard::EMPTY, |acc, r| acc | Bitboard::rank(r))
}

/// Pawn of `color` on the square at the given offset, if any.
fn pawn_at(board: &Board, sq: Square, color: Color, df: i8, dr: i8) -> bool {
    sq.offset(df, dr)
        .is_some_and(|target| board.pieces_of(PieceKind::Pawn, color).contains(target))
}

pub fn pawn_structure(board: &Board, color: Color) -> PawnStructure {
    let ours = board.pieces_of(PieceKind::Pawn, color);
    let theirs = board.pieces_of(PieceKind::Pawn, color.opposite());
    let forward = color.forward();
    let mut structure = PawnStructure::default();

    for sq in ours {
        let file = Bitboard::file(sq.file());
        let neighbours = Bitboard::adjacent_files(sq.file());

        if (ours & neighbours).is_empty() {
            structure.isolated.push(sq);
        }
        if (ours & file).count() > 1 {
            structure.doubled.push(sq);
        }
        if (theirs & (file | neighbours) & ranks_ahead(sq.rank(), color)).is_empty() {
            structure.passed.push(sq);
        }

        let supported = [-1, 1]
            .into_iter()
            .any(|df| pawn_at(board, sq, color, df, -forward));
        let stop_guarded = [-1, 1]
            .into_iter()
            .any(|df| pawn_at(board, sq, color.opposite(), df, 2 * forward));
        if !supported && stop_guarded {
            structure.backward.push(sq);
        }
    }
    structure
}
