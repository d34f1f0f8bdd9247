//! Static exchange evaluation and square inspection.

use crate::movegen::attacks::{attackers_mask, attackers_of_xray};
use crate::{Bitboard, Board};
use chesslens_core::{Color, Piece, Square};
use serde::{Deserialize, Serialize};

/// Least valuable piece of `side` attacking `target` with the given occupancy.
fn least_valuable_attacker(
    board: &Board,
    target: Square,
    side: Color,
    occupied: Bitboard,
) -> Option<(Square, i32)> {
    attackers_mask(board, target, side, occupied)
        .into_iter()
        .filter_map(|sq| board.piece_at(sq).map(|p| (sq, p.value())))
        .min_by_key(|&(sq, value)| (value, sq))
}

/// Material result for `side` of capturing on `target` and letting both
/// sides recapture with their cheapest piece for as long as it pays.
///
/// The first capture is forced; every later one is optional, so a negative
/// result means the opening capture loses material. Pieces behind a
/// capturer join in as soon as it leaves the line. Returns 0 when the
/// square is empty or `side` has no attacker.
pub fn static_exchange(board: &Board, target: Square, side: Color) -> i32 {
    let Some(victim) = board.piece_at(target) else {
        return 0;
    };
    let mut occupied = board.occupied();
    let Some((first, first_value)) = least_valuable_attacker(board, target, side, occupied) else {
        return 0;
    };

    let mut gains = vec![victim.value()];
    let mut on_square = first_value;
    let mut to_move = side.opposite();
    occupied.clear(first);

    while let Some((sq, value)) = least_valuable_attacker(board, target, to_move, occupied) {
        let previous = gains[gains.len() - 1];
        gains.push(on_square - previous);
        on_square = value;
        occupied.clear(sq);
        to_move = to_move.opposite();
    }

    // Fold back: each side may stand pat instead of recapturing.
    while gains.len() > 1 {
        let last = gains.pop().unwrap_or(0);
        let idx = gains.len() - 1;
        gains[idx] = -(-gains[idx]).max(last);
    }
    gains[0]
}

/// Direct and x-ray pressure of one side on a square.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// Pieces attacking the square now, least valuable first.
    pub direct: Vec<Square>,
    /// Pieces that would attack it once every direct attacker has left.
    pub xray: Vec<Square>,
}

impl Coverage {
    fn of(board: &Board, target: Square, side: Color) -> Self {
        let cleared = Bitboard::from_square(target);
        let direct = attackers_of_xray(board, target, side, cleared);
        let removed = direct.iter().fold(cleared, |acc, &sq| {
            acc | Bitboard::from_square(sq)
        });
        let xray = attackers_of_xray(board, target, side, removed);
        Coverage { direct, xray }
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.xray.is_empty()
    }
}

/// Everything bearing on one square, as shown when hovering over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareInspection {
    pub square: Square,
    pub piece: Option<Piece>,
    pub white: Coverage,
    pub black: Coverage,
    /// Static exchange result for the side attacking the piece, if it is
    /// attacked at all.
    pub exchange_value: Option<i32>,
}

impl SquareInspection {
    /// Coverage of the given side.
    pub fn coverage(&self, color: Color) -> &Coverage {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Enemy coverage of the piece on the square.
    pub fn attackers(&self) -> Option<&Coverage> {
        self.piece.map(|p| self.coverage(p.color.opposite()))
    }

    /// Friendly coverage of the piece on the square, computed as if the
    /// square were empty so recaptures are counted.
    pub fn defenders(&self) -> Option<&Coverage> {
        self.piece.map(|p| self.coverage(p.color))
    }
}

/// Inspects `square` on `board`.
pub fn inspect(board: &Board, square: Square) -> SquareInspection {
    let piece = board.piece_at(square);
    let white = Coverage::of(board, square, Color::White);
    let black = Coverage::of(board, square, Color::Black);
    let exchange_value = piece.and_then(|p| {
        let enemy = p.color.opposite();
        let attacked = match enemy {
            Color::White => !white.direct.is_empty(),
            Color::Black => !black.direct.is_empty(),
        };
        attacked.then(|| static_exchange(board, square, enemy))
    });
    SquareInspection {
        square,
        piece,
        white,
        black,
        exchange_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn undefended_piece_wins_its_value() {
        // Rook on e1 takes the undefended knight on e5
        let b = board("4k3/8/8/4n3/8/8/8/4R1K1 w - - 0 1");
        assert_eq!(static_exchange(&b, Square::E5, Color::White), 3);
    }

    #[test]
    fn defended_piece_costs_the_capturer() {
        // Queen takes a pawn defended by a pawn
        let b = board("4k3/8/3p4/4p3/8/8/8/4Q1K1 w - - 0 1");
        assert_eq!(static_exchange(&b, Square::E5, Color::White), 1 - 9);
    }

    #[test]
    fn cheap_attacker_wins_despite_defender() {
        // Pawn takes a knight defended by a pawn: +3 then -1
        let b = board("4k3/8/3p4/4n3/3P4/8/8/4K3 w - - 0 1");
        assert_eq!(static_exchange(&b, Square::E5, Color::White), 2);
    }

    #[test]
    fn second_attacker_decides_the_outcome() {
        // Knight on e5 defended once by the d6 pawn; attacked by the c3
        // bishop and the e1 rook. BxN PxB RxP nets 3 - 3 + 1.
        let winning = board("4k3/8/3p4/4n3/8/2B5/8/4R1K1 w - - 0 1");
        assert_eq!(static_exchange(&winning, Square::E5, Color::White), 1);

        // Rook on e5 defended once by the d6 pawn, attacked by the c3 bishop
        // and the e1 queen: BxR PxB QxP nets 5 - 3 + 1.
        let rook = board("4k3/8/3p4/4r3/8/2B5/8/4Q1K1 w - - 0 1");
        assert_eq!(static_exchange(&rook, Square::E5, Color::White), 3);

        // A queen defended by a pawn and attacked by two rooks:
        // RxQ PxR RxP nets 9 - 5 + 1.
        let queen = board("4k3/8/3p4/4q3/8/8/4R3/4R1K1 w - - 0 1");
        assert_eq!(static_exchange(&queen, Square::E5, Color::White), 5);
    }

    #[test]
    fn losing_exchange_is_negative() {
        // Pawn on e5 defended by the d6 pawn and the c6 knight; attacked by
        // the f3 knight and the e1 queen. NxP PxN is already two down and
        // QxP would lose the queen to the knight.
        let b = board("4k3/8/2np4/4p3/8/5N2/8/4Q1K1 w - - 0 1");
        assert_eq!(static_exchange(&b, Square::E5, Color::White), -2);
    }

    #[test]
    fn battery_counts_pieces_behind() {
        // Doubled rooks against a rook defended once by a rook behind it
        let b = board("4r1k1/8/8/4r3/8/8/4R3/4R1K1 w - - 0 1");
        // RxR RxR RxR: +5 -5 +5
        assert_eq!(static_exchange(&b, Square::E5, Color::White), 5);
    }

    #[test]
    fn king_never_walks_into_a_defended_square() {
        // Only the king attacks the pawn, which the rook defends
        let b = board("3rk3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        assert!(static_exchange(&b, Square::D2, Color::White) < 0);
    }

    #[test]
    fn empty_or_unattacked_square_is_zero() {
        let b = Board::startpos();
        assert_eq!(static_exchange(&b, Square::E4, Color::White), 0);
        assert_eq!(static_exchange(&b, Square::E7, Color::White), 0);
    }

    #[test]
    fn inspection_splits_direct_and_xray() {
        // Queen e2 with rook e1 behind it, against the e5 pawn defended by
        // the d6 pawn, with a black rook on e8 behind the pawn.
        let b = board("4r1k1/8/3p4/4p3/8/8/4Q3/4R1K1 w - - 0 1");
        let info = inspect(&b, Square::E5);
        assert_eq!(info.piece.map(|p| p.color), Some(Color::Black));

        let attackers = info.attackers().unwrap();
        assert_eq!(attackers.direct, vec![Square::E2]);
        assert_eq!(attackers.xray, vec![Square::E1]);

        let defenders = info.defenders().unwrap();
        assert_eq!(defenders.direct, vec![Square::D6, Square::E8]);
        assert!(defenders.xray.is_empty());

        assert_eq!(info.exchange_value, Some(1 - 9));
    }

    #[test]
    fn inspecting_an_empty_square() {
        let info = inspect(&Board::startpos(), Square::F3);
        assert_eq!(info.piece, None);
        assert_eq!(info.white.direct, vec![Square::E2, Square::G2, Square::G1]);
        // The queen looks through e2 once the pawn has gone
        assert_eq!(info.white.xray, vec![Square::D1]);
        assert!(info.black.is_empty());
        assert_eq!(info.exchange_value, None);
        assert!(info.attackers().is_none());
    }
}
