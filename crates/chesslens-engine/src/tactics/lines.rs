//! Pins and skewers: two enemy pieces lined up behind each other on a
//! slider's ray.

use crate::movegen::attacks::{ray_attacks, Direction};
use crate::{Bitboard, Board};
use chesslens_core::{Piece, PieceKind, Square};
use serde::{Deserialize, Serialize};

/// A piece that cannot leave its line without exposing the one behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub pinned: Square,
    pub pinner: Square,
    /// King or piece worth at least as much as the pinned one.
    pub pinned_to: Square,
    /// Squares from the pinner to `pinned_to`, both included.
    pub line: Vec<Square>,
    /// Pinned to the king, so the piece may not legally leave the line.
    pub absolute: bool,
}

/// A valuable piece in front of a cheaper (or equal) one on an attack line.
/// Kings and pawns are never part of a skewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skewer {
    pub front: Square,
    pub back: Square,
    pub attacker: Square,
    /// Squares from the attacker to `back`, both included.
    pub line: Vec<Square>,
}

#[derive(Debug, Default)]
pub struct Lines {
    pub pins: Vec<Pin>,
    pub skewers: Vec<Skewer>,
}

/// First occupied square from `from` in `dir`.
fn first_blocker(from: Square, dir: Direction, occupied: Bitboard) -> Option<Square> {
    (ray_attacks(from, dir, occupied) & occupied).lsb()
}

fn line(from: Square, to: Square, dir: Direction) -> Vec<Square> {
    let (df, dr) = dir.delta();
    std::iter::successors(Some(from), |&sq| {
        if sq == to {
            None
        } else {
            sq.offset(df, dr)
        }
    })
    .collect()
}

fn is_pin(front: Piece, back: Piece, include_pawns: bool) -> bool {
    if front.kind == PieceKind::King || (front.kind == PieceKind::Pawn && !include_pawns) {
        return false;
    }
    back.kind == PieceKind::King || back.value() >= front.value()
}

fn is_skewer(front: Piece, back: Piece) -> bool {
    let target = |p: Piece| !matches!(p.kind, PieceKind::King | PieceKind::Pawn);
    target(front) && target(back) && front.value() >= back.value()
}

/// Every pin and skewer on the board, for both colours.
///
/// Lines holding two equally valuable pieces are both: the front piece is
/// pinned, and moving it loses the one behind.
pub fn find_lines(board: &Board, include_pawn_pins: bool) -> Lines {
    let occupied = board.occupied();
    let mut found = Lines::default();

    for (attacker, piece) in board.pieces() {
        if !piece.kind.is_slider() {
            continue;
        }
        for dir in Direction::ALL {
            if !dir.moved_along_by(piece.kind) {
                continue;
            }
            let Some(front) = first_blocker(attacker, dir, occupied) else {
                continue;
            };
            let Some(front_piece) = board.piece_at(front).filter(|p| p.color != piece.color)
            else {
                continue;
            };
            let Some(back) = first_blocker(front, dir, occupied) else {
                continue;
            };
            let Some(back_piece) = board.piece_at(back).filter(|p| p.color == front_piece.color)
            else {
                continue;
            };

            if is_pin(front_piece, back_piece, include_pawn_pins) {
                found.pins.push(Pin {
                    pinned: front,
                    pinner: attacker,
                    pinned_to: back,
                    line: line(attacker, back, dir),
                    absolute: back_piece.kind == PieceKind::King,
                });
            }
            if is_skewer(front_piece, back_piece) {
                found.skewers.push(Skewer {
                    front,
                    back,
                    attacker,
                    line: line(attacker, back, dir),
                });
            }
        }
    }
    found
}
