//! Fork detection: one move that attacks two or more valuable enemy pieces.

use crate::movegen::attacks::{attacks_from, is_square_attacked, pawn_attacks, piece_attacks};
use crate::{Bitboard, Board};
use chesslens_core::{Piece, PieceKind, Square};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fork {
    pub origin: Square,
    pub destination: Square,
    /// Enemy non-pawn pieces attacked from `destination`, kings included.
    pub targets: Vec<Square>,
}

/// Squares the piece could reach, ignoring king safety and whose turn it is.
fn destinations(board: &Board, origin: Square, piece: Piece) -> Bitboard {
    let reachable = if piece.kind == PieceKind::Pawn {
        let empty = !board.occupied();
        let forward = piece.color.forward();
        let mut pushes = Bitboard::EMPTY;
        if let Some(one) = origin.offset(0, forward).filter(|sq| empty.contains(*sq)) {
            pushes.set(one);
            if origin.rank() == piece.color.pawn_rank() {
                if let Some(two) = one.offset(0, forward).filter(|sq| empty.contains(*sq)) {
                    pushes.set(two);
                }
            }
        }
        let mut targets = board.occupied();
        if let Some(ep) = board.en_passant() {
            targets.set(ep);
        }
        pushes | (pawn_attacks(origin, piece.color) & targets)
    } else {
        attacks_from(board, origin)
    };
    reachable & !board.color_pieces(piece.color)
}

/// Every fork available to either side.
///
/// A destination the enemy attacks after the move is not counted, except
/// for pawns: a pawn fork wins material even when the pawn is taken.
pub fn find_forks(board: &Board) -> Vec<Fork> {
    let mut forks = Vec::new();
    for (origin, piece) in board.pieces() {
        let enemy = piece.color.opposite();
        for destination in destinations(board, origin, piece) {
            let after = board.with_piece_moved(origin, destination);
            if piece.kind != PieceKind::Pawn && is_square_attacked(&after, destination, enemy) {
                continue;
            }
            let valuable = after.color_pieces(enemy) & !after.pieces_of(PieceKind::Pawn, enemy);
            let hit = piece_attacks(piece, destination, after.occupied()) & valuable;
            if hit.count() >= 2 {
                forks.push(Fork {
                    origin,
                    destination,
                    targets: hit.into_iter().collect(),
                });
            }
        }
    }
    forks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forks(fen: &str) -> Vec<Fork> {
        find_forks(&Board::from_fen(fen).unwrap())
    }

    #[test]
    fn knight_forks_king_and_rook() {
        assert_eq!(
            forks("r3k3/8/8/1N6/8/8/8/4K3 w - - 0 1"),
            vec![Fork {
                origin: Square::B5,
                destination: Square::C7,
                targets: vec![Square::A8, Square::E8],
            }]
        );
    }

    #[test]
    fn pawn_fork_counts_even_when_pawn_is_attacked() {
        // d3-d4 hits the c5 knight and the e5 bishop, which guards d4
        assert_eq!(
            forks("4k3/8/8/2n1b3/8/3P4/8/4K3 w - - 0 1"),
            vec![Fork {
                origin: Square::D3,
                destination: Square::D4,
                targets: vec![Square::C5, Square::E5],
            }]
        );
    }

    #[test]
    fn guarded_destination_is_skipped() {
        // Same knight fork, but the d8 bishop covers c7
        assert!(forks("r2bk3/8/8/1N6/8/8/8/4K3 w - - 0 1")
            .iter()
            .all(|f| f.destination != Square::C7));
    }

    #[test]
    fn pawns_are_not_fork_targets() {
        assert!(forks("4k3/8/2p1p3/8/3N4/8/8/4K3 w - - 0 1").is_empty());
    }

    #[test]
    fn start_position_has_no_forks() {
        assert!(find_forks(&Board::startpos()).is_empty());
    }
}
