//! Piece activity, development and lost material for one side.

use crate::movegen::{attacks, legal_moves};
use crate::{Bitboard, Board};
use chesslens_core::{Color, PieceKind, Square};

/// Piece counts of the initial position, king excluded.
const STARTING_SET: [(PieceKind, u32); 5] = [
    (PieceKind::Queen, 1),
    (PieceKind::Rook, 2),
    (PieceKind::Bishop, 2),
    (PieceKind::Knight, 2),
    (PieceKind::Pawn, 8),
];

/// Number of distinct squares the non-pawn pieces of `color` can legally
/// move to, as if it were `color`'s turn.
pub fn activity(board: &Board, color: Color) -> u32 {
    let pawns = board.pieces_of(PieceKind::Pawn, color);
    let turn = board.with_side_to_move(color);
    legal_moves(&turn)
        .iter()
        .filter(|m| !pawns.contains(m.from()))
        .map(|m| m.to())
        .collect::<Bitboard>()
        .count()
}

/// Pieces of `color` that have left their starting posts.
///
/// Minor pieces and queens count once they are off the back rank, the king
/// once it has left its home square. A rook counts when it is off the back
/// rank, or when it is one of exactly two rooks that see each other along
/// it.
pub fn development(board: &Board, color: Color) -> u32 {
    let home = Bitboard::rank(color.home_rank());

    let minors = [PieceKind::Knight, PieceKind::Bishop, PieceKind::Queen]
        .into_iter()
        .map(|kind| (board.pieces_of(kind, color) & !home).count())
        .sum::<u32>();

    let king_home = Square::from_coords(4, color.home_rank());
    let king = u32::from(board.king_square(color) != king_home);

    let rooks = board.pieces_of(PieceKind::Rook, color);
    let home_rooks: Vec<Square> = (rooks & home).into_iter().collect();
    let connected = rooks.count() == 2
        && matches!(
            home_rooks[..],
            [a, b] if (attacks::between(a, b) & board.occupied()).is_empty()
        );
    let rook_count = if connected {
        2
    } else {
        (rooks & !home).count()
    };

    minors + king + rook_count
}

/// Pieces of `color` missing from the initial set, strongest first.
///
/// Promoted pieces make up for the kind they became, so a second queen
/// hides a lost one.
pub fn captured(board: &Board, color: Color) -> Vec<PieceKind> {
    STARTING_SET
        .into_iter()
        .flat_map(|(kind, start)| {
            let missing = start.saturating_sub(board.pieces_of(kind, color).count());
            std::iter::repeat(kind).take(missing as usize)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn start_position_only_has_knight_hops() {
        let b = Board::startpos();
        assert_eq!(activity(&b, Color::White), 4);
        assert_eq!(activity(&b, Color::Black), 4);
        assert_eq!(development(&b, Color::White), 0);
        assert_eq!(development(&b, Color::Black), 0);
        assert!(captured(&b, Color::White).is_empty());
        assert!(captured(&b, Color::Black).is_empty());
    }

    #[test]
    fn activity_counts_distinct_squares_without_pawns() {
        // Rook a1: a2-a8 and b1-d1. King e1: d1 d2 e2 f2 f1. d1 is shared.
        let fen = "4k3/8/8/8/8/8/7P/R3K3 w - - 0 1";
        assert_eq!(activity(&board(fen), Color::White), 14);
        assert_eq!(activity(&board(fen), Color::Black), 5);

        // Same answer when the other side is to move
        let flipped = board("4k3/8/8/8/8/8/7P/R3K3 b - - 0 1");
        assert_eq!(activity(&flipped, Color::White), 14);
    }

    #[test]
    fn activity_respects_pins() {
        // The d7 knight is pinned and adds nothing; the king has four squares
        let b = board("4k3/3n4/8/1B6/8/8/8/4K3 b - - 0 1");
        assert_eq!(activity(&b, Color::Black), 4);
    }

    #[test]
    fn development_after_castling() {
        let b = board("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 5 4");
        // Nf3, Bc4 and the castled king; the b1 knight keeps the rooks apart
        assert_eq!(development(&b, Color::White), 3);
        assert_eq!(development(&b, Color::Black), 1);
    }

    #[test]
    fn connected_rooks_count_on_the_back_rank() {
        let b = board("r3k2r/8/8/8/8/8/8/2KR3R w kq - 0 1");
        assert_eq!(development(&b, Color::White), 3);
        assert_eq!(development(&b, Color::Black), 0);

        let lifted = board("4k3/8/8/8/8/8/R7/4K3 w - - 0 1");
        assert_eq!(development(&lifted, Color::White), 1);
    }

    #[test]
    fn captured_material_is_sorted_strongest_first() {
        let b = board("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(captured(&b, Color::Black), vec![PieceKind::Queen]);
        assert!(captured(&b, Color::White).is_empty());

        let bare = captured(&board("4k3/8/8/8/8/8/8/4K3 w - - 0 1"), Color::White);
        assert_eq!(bare.len(), 15);
        assert_eq!(
            bare[..5],
            [
                PieceKind::Queen,
                PieceKind::Rook,
                PieceKind::Rook,
                PieceKind::Bishop,
                PieceKind::Bishop
            ]
        );
        assert!(bare[7..].iter().all(|&k| k == PieceKind::Pawn));
    }

    #[test]
    fn promoted_pieces_cover_their_kind() {
        let b = board("4k3/8/8/8/8/8/8/QQ2K3 w - - 0 1");
        let lost = captured(&b, Color::White);
        assert!(!lost.contains(&PieceKind::Queen));
        assert_eq!(lost.len(), 14);
    }
}
