//! Attack geometry.
//!
//! Leaper attacks (knight, king, pawn) come from tables computed at compile
//! time. Slider attacks walk precomputed rays and stop at the first blocker in
//! the occupancy mask, so callers can ask "what would this piece see if these
//! squares were empty" by clearing bits before the lookup. That is how x-ray
//! queries work: they never touch the board itself.

use crate::{Bitboard, Board};
use chesslens_core::{Color, Piece, PieceKind, Square};

/// The eight compass directions a slider can move along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// (file, rank) step.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthEast | Direction::SouthEast | Direction::SouthWest | Direction::NorthWest
        )
    }

    /// True if a piece of `kind` slides along this direction.
    #[inline]
    pub const fn moved_along_by(self, kind: PieceKind) -> bool {
        match kind {
            PieceKind::Queen => true,
            PieceKind::Bishop => self.is_diagonal(),
            PieceKind::Rook => !self.is_diagonal(),
            _ => false,
        }
    }

    /// Squares along a ray increase in index when walking this way.
    #[inline]
    const fn is_ascending(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest
        )
    }

    /// Direction from `from` towards `to` when they share a line.
    pub fn between(from: Square, to: Square) -> Option<Direction> {
        if from == to {
            return None;
        }
        let df = to.file() as i8 - from.file() as i8;
        let dr = to.rank() as i8 - from.rank() as i8;
        if df != 0 && dr != 0 && df.abs() != dr.abs() {
            return None;
        }
        let step = (df.signum(), dr.signum());
        Direction::ALL.into_iter().find(|d| d.delta() == step)
    }
}

const KNIGHT_ATTACKS: [Bitboard; 64] = compute_knight_attacks();

const KING_ATTACKS: [Bitboard; 64] = compute_king_attacks();

/// Pawn capture squares [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = compute_pawn_attacks();

/// Open-board rays [direction][square], excluding the origin.
const RAYS: [[Bitboard; 64]; 8] = compute_rays();

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of `color` on `sq` captures on (never its push squares).
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// All squares from `sq` to the edge of the board in `dir`.
#[inline]
pub fn ray(sq: Square, dir: Direction) -> Bitboard {
    RAYS[dir as usize][sq.index() as usize]
}

/// Squares seen from `sq` in `dir`, up to and including the first occupied one.
#[inline]
pub fn ray_attacks(sq: Square, dir: Direction, occupied: Bitboard) -> Bitboard {
    let ray = ray(sq, dir);
    let blockers = ray & occupied;
    let first = if dir.is_ascending() {
        blockers.lsb()
    } else {
        blockers.msb()
    };
    match first {
        Some(blocker) => ray & !self::ray(blocker, dir),
        None => ray,
    }
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Direction::DIAGONAL
        .into_iter()
        .fold(Bitboard::EMPTY, |acc, dir| acc | ray_attacks(sq, dir, occupied))
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Direction::ORTHOGONAL
        .into_iter()
        .fold(Bitboard::EMPTY, |acc, dir| acc | ray_attacks(sq, dir, occupied))
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Squares strictly between two squares on a shared line, or empty.
pub fn between(a: Square, b: Square) -> Bitboard {
    match Direction::between(a, b) {
        Some(dir) => ray(a, dir) & !ray(b, dir) & !Bitboard::from_square(b),
        None => Bitboard::EMPTY,
    }
}

/// Attack set of `piece` standing on `sq` with the given occupancy.
pub fn piece_attacks(piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(sq, piece.color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

/// Squares the piece on `sq` attacks, or an empty set if the square is empty.
pub fn attacks_from(board: &Board, sq: Square) -> Bitboard {
    board
        .piece_at(sq)
        .map_or(Bitboard::EMPTY, |piece| piece_attacks(piece, sq, board.occupied()))
}

/// Pieces of `by` attacking `sq`, treating only `occupied` as present.
///
/// Pieces outside `occupied` neither attack nor block.
pub fn attackers_mask(board: &Board, sq: Square, by: Color, occupied: Bitboard) -> Bitboard {
    let theirs = board.color_pieces(by) & occupied;
    let queens = board.pieces_of(PieceKind::Queen, by);
    let diagonal = board.pieces_of(PieceKind::Bishop, by) | queens;
    let orthogonal = board.pieces_of(PieceKind::Rook, by) | queens;

    let attackers = (pawn_attacks(sq, by.opposite()) & board.pieces_of(PieceKind::Pawn, by))
        | (knight_attacks(sq) & board.pieces_of(PieceKind::Knight, by))
        | (king_attacks(sq) & board.pieces_of(PieceKind::King, by))
        | (bishop_attacks(sq, occupied) & diagonal)
        | (rook_attacks(sq, occupied) & orthogonal);
    attackers & theirs
}

/// Orders a set of attackers by ascending piece value, then by square.
fn by_value(board: &Board, attackers: Bitboard) -> Vec<Square> {
    let mut squares: Vec<Square> = attackers.into_iter().collect();
    squares.sort_by_key(|&sq| (board.piece_at(sq).map_or(0, |p| p.value()), sq));
    squares
}

/// Every piece of `by` attacking `sq`, least valuable first.
pub fn attackers_of(board: &Board, sq: Square, by: Color) -> Vec<Square> {
    by_value(board, attackers_mask(board, sq, by, board.occupied()))
}

/// Attackers of `sq` once the pieces in `removed` are taken off the board.
///
/// Pieces in `removed` are excluded from the result. The board is not
/// modified.
pub fn attackers_of_xray(board: &Board, sq: Square, by: Color, removed: Bitboard) -> Vec<Square> {
    let occupied = board.occupied() & !removed;
    by_value(board, attackers_mask(board, sq, by, occupied))
}

/// True if any piece of `by` attacks `sq`.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    attackers_mask(board, sq, by, board.occupied()).is_not_empty()
}

/// True if the king of `color` is attacked.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

/// Every square attacked by at least one piece of `by`.
pub fn attacked_squares(board: &Board, by: Color) -> Bitboard {
    let occupied = board.occupied();
    board
        .color_pieces(by)
        .into_iter()
        .filter_map(|sq| board.piece_at(sq).map(|p| piece_attacks(p, sq, occupied)))
        .fold(Bitboard::EMPTY, |acc, bb| acc | bb)
}

const fn leaper_table(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bb = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let f = file + offsets[i].0;
            let r = rank + offsets[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        table[sq as usize] = Bitboard(bb);
        sq += 1;
    }
    table
}

const fn compute_knight_attacks() -> [Bitboard; 64] {
    leaper_table(&[
        (1, 2),
        (2, 1),
        (2, -1),
        (1, -2),
        (-1, -2),
        (-2, -1),
        (-2, 1),
        (-1, 2),
    ])
}

const fn compute_king_attacks() -> [Bitboard; 64] {
    leaper_table(&[
        (0, 1),
        (1, 1),
        (1, 0),
        (1, -1),
        (0, -1),
        (-1, -1),
        (-1, 0),
        (-1, 1),
    ])
}

const fn compute_pawn_attacks() -> [[Bitboard; 64]; 2] {
    [
        leaper_table(&[(-1, 1), (1, 1)]),
        leaper_table(&[(-1, -1), (1, -1)]),
    ]
}

const fn compute_rays() -> [[Bitboard; 64]; 8] {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut d = 0;
    while d < 8 {
        let (df, dr) = Direction::ALL[d].delta();
        let mut sq = 0u8;
        while sq < 64 {
            let mut f = (sq % 8) as i8 + df;
            let mut r = (sq / 8) as i8 + dr;
            let mut bb = 0u64;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << (r * 8 + f);
                f += df;
                r += dr;
            }
            rays[d][sq as usize] = Bitboard(bb);
            sq += 1;
        }
        d += 1;
    }
    rays
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn leaper_counts() {
        assert_eq!(knight_attacks(Square::D4).count(), 8);
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(Square::A4).count(), 4);
        assert_eq!(king_attacks(Square::D4).count(), 8);
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(Square::A4).count(), 5);
    }

    #[test]
    fn pawns_attack_diagonally_forward() {
        let white = pawn_attacks(Square::D4, Color::White);
        assert_eq!(white, Bitboard::from_square(Square::C5) | Bitboard::from_square(Square::E5));
        let black = pawn_attacks(Square::D4, Color::Black);
        assert_eq!(black, Bitboard::from_square(Square::C3) | Bitboard::from_square(Square::E3));
        assert_eq!(pawn_attacks(Square::A4, Color::White).count(), 1);
        assert!(pawn_attacks(Square::D8, Color::White).is_empty());
    }

    #[test]
    fn sliders_stop_at_first_blocker() {
        let occupied: Bitboard = [Square::D6, Square::F4].into_iter().collect();
        let attacks = rook_attacks(Square::D4, occupied);
        assert!(attacks.contains(Square::D5));
        assert!(attacks.contains(Square::D6));
        assert!(!attacks.contains(Square::D7));
        assert!(attacks.contains(Square::F4));
        assert!(!attacks.contains(Square::G4));
        assert!(attacks.contains(Square::A4));
        assert!(attacks.contains(Square::D1));
        assert_eq!(rook_attacks(Square::A1, Bitboard::EMPTY).count(), 14);
        assert_eq!(bishop_attacks(Square::D4, Bitboard::EMPTY).count(), 13);
        assert_eq!(queen_attacks(Square::D4, Bitboard::EMPTY).count(), 27);
    }

    #[test]
    fn descending_rays_use_nearest_blocker() {
        let occupied: Bitboard = [Square::B2, Square::C3].into_iter().collect();
        let attacks = ray_attacks(Square::E5, Direction::SouthWest, occupied);
        assert_eq!(
            attacks,
            [Square::D4, Square::C3].into_iter().collect::<Bitboard>()
        );
    }

    #[test]
    fn between_squares() {
        assert_eq!(
            between(Square::A1, Square::D4),
            [Square::B2, Square::C3].into_iter().collect::<Bitboard>()
        );
        assert_eq!(
            between(Square::E8, Square::E5),
            [Square::E7, Square::E6].into_iter().collect::<Bitboard>()
        );
        assert!(between(Square::A1, Square::B3).is_empty());
        assert!(between(Square::A1, Square::B2).is_empty());
        assert_eq!(Direction::between(Square::H1, Square::A8), Some(Direction::NorthWest));
        assert_eq!(Direction::between(Square::C3, Square::C3), None);
    }

    #[test]
    fn attackers_sorted_by_value() {
        // e5 is hit by the d4 pawn, the d3 knight, the e1 rook and the h2 queen
        let b = board("k7/8/8/8/3P4/3N4/7Q/4R1K1 w - - 0 1");
        let attackers = attackers_of(&b, Square::E5, Color::White);
        assert_eq!(
            attackers,
            vec![Square::D4, Square::D3, Square::E1, Square::H2]
        );
        assert!(attackers_of(&b, Square::E5, Color::Black).is_empty());
    }

    #[test]
    fn xray_reveals_battery() {
        // Rook e1 stands behind the queen on e2
        let b = board("4k3/8/8/4p3/8/8/4Q3/4R1K1 w - - 0 1");
        assert_eq!(attackers_of(&b, Square::E5, Color::White), vec![Square::E2]);
        let removed = Bitboard::from_square(Square::E2);
        assert_eq!(
            attackers_of_xray(&b, Square::E5, Color::White, removed),
            vec![Square::E1]
        );
        // The real board still has the queen in front
        assert!(b.piece_at(Square::E2).is_some());
    }

    #[test]
    fn attacks_from_empty_square() {
        let b = Board::startpos();
        assert!(attacks_from(&b, Square::E4).is_empty());
        assert_eq!(attacks_from(&b, Square::G1).count(), 3);
        assert!(is_square_attacked(&b, Square::E3, Color::White));
        assert!(!is_square_attacked(&b, Square::E4, Color::White));
        assert!(!is_king_attacked(&b, Color::White));
    }
}
