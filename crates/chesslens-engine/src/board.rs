//! Board representation.
//!
//! A [`Board`] is an immutable-by-convention snapshot: every move produces a
//! new board and leaves the old one untouched, which is what lets the history
//! keep plain snapshots and the tactical cache key on content.

use crate::error::{IllegalMoveError, MalformedPositionError};
use crate::movegen::{self, attacks, MoveList};
use crate::{zobrist, Bitboard, Move};
use chesslens_core::{
    CastleSide, CastlingRights, Color, FenFields, MoveRequest, Piece, PieceKind, Square,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome state of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        };
        f.write_str(text)
    }
}

/// Complete position state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Occupancy per piece kind, indexed by [`PieceKind::index`].
    pieces: [Bitboard; 6],
    /// Occupancy per side.
    colors: [Bitboard; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Board {
    fn empty() -> Self {
        Board {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        Board {
            pieces: [
                Bitboard(0x00FF_0000_0000_FF00),
                Bitboard(0x4200_0000_0000_0042),
                Bitboard(0x2400_0000_0000_0024),
                Bitboard(0x8100_0000_0000_0081),
                Bitboard(0x0800_0000_0000_0008),
                Bitboard(0x1000_0000_0000_0010),
            ],
            colors: [
                Bitboard(0x0000_0000_0000_FFFF),
                Bitboard(0xFFFF_0000_0000_0000),
            ],
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parses and validates a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, MalformedPositionError> {
        Self::from_fields(&FenFields::parse(fen)?)
    }

    /// Builds a board from decoded FEN fields, rejecting positions that could
    /// not arise in a game.
    ///
    /// Nothing is corrected: a castling right without its king and rook, or an
    /// en passant square that does not follow a double push, is an error.
    pub fn from_fields(fields: &FenFields) -> Result<Self, MalformedPositionError> {
        let mut board = Board::empty();
        for sq in Square::all() {
            if let Some(piece) = fields.placement[sq.index() as usize] {
                board.put(sq, piece);
            }
        }
        board.side_to_move = fields.side_to_move;
        board.castling = fields.castling;
        board.en_passant = fields.en_passant;
        board.halfmove_clock = fields.halfmove_clock;
        board.fullmove_number = fields.fullmove_number;

        board.validate()?;
        Ok(board)
    }

    fn validate(&self) -> Result<(), MalformedPositionError> {
        for color in Color::ALL {
            let count = self.pieces_of(PieceKind::King, color).count();
            if count != 1 {
                return Err(MalformedPositionError::KingCount { color, count });
            }
        }

        if let Some(sq) = (self.pieces[PieceKind::Pawn.index()] & Bitboard::BACK_RANKS).lsb() {
            return Err(MalformedPositionError::PawnOnBackRank(sq));
        }

        if attacks::is_king_attacked(self, self.side_to_move.opposite()) {
            return Err(MalformedPositionError::OpponentInCheck);
        }

        if let Some(ep) = self.en_passant {
            if !self.en_passant_is_consistent(ep) {
                return Err(MalformedPositionError::InvalidEnPassant(ep));
            }
        }

        for (letter, color, side) in self.castling.letters() {
            let king_home = Square::from_coords(4, color.home_rank());
            let rook_home = Square::from_coords(side.rook_file(), color.home_rank());
            let king_ok = king_home.and_then(|sq| self.piece_at(sq))
                == Some(Piece::new(PieceKind::King, color));
            let rook_ok = rook_home.and_then(|sq| self.piece_at(sq))
                == Some(Piece::new(PieceKind::Rook, color));
            if !king_ok || !rook_ok {
                return Err(MalformedPositionError::InconsistentCastling(letter));
            }
        }

        Ok(())
    }

    /// The en passant square must sit directly behind a pawn of the side that
    /// just moved, with both it and the pawn's origin square empty.
    fn en_passant_is_consistent(&self, ep: Square) -> bool {
        let mover = self.side_to_move.opposite();
        if ep.rank() as i8 != mover.pawn_rank() as i8 + mover.forward() {
            return false;
        }
        let pushed = ep.offset(0, mover.forward());
        let origin = ep.offset(0, -mover.forward());
        let pawn_there = pushed.and_then(|sq| self.piece_at(sq))
            == Some(Piece::new(PieceKind::Pawn, mover));
        let origin_empty = origin.is_some_and(|sq| self.piece_at(sq).is_none());
        pawn_there && origin_empty && self.piece_at(ep).is_none()
    }

    /// Decodes the board into FEN fields.
    pub fn fields(&self) -> FenFields {
        let mut placement = [None; 64];
        for (sq, piece) in self.pieces() {
            placement[sq.index() as usize] = Some(piece);
        }
        FenFields {
            placement,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    pub fn to_fen(&self) -> String {
        self.fields().to_fen()
    }

    /// Returns the piece on `sq`, if any.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else if self.colors[Color::Black.index()].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.pieces[kind.index()].contains(sq))
            .map(|kind| Piece::new(kind, color))
    }

    /// Every occupied square with its piece, in square order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .into_iter()
            .filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// All pieces of one side.
    #[inline]
    pub fn color_pieces(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn pieces_of(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pieces[kind.index()] & self.colors[color.index()]
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(PieceKind::King, color).lsb()
    }

    /// Content hash, equal for boards that differ only in their clocks.
    pub fn zobrist(&self) -> u64 {
        zobrist::hash(self)
    }

    fn put(&mut self, sq: Square, piece: Piece) {
        self.pieces[piece.kind.index()].set(sq);
        self.colors[piece.color.index()].set(sq);
    }

    fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.pieces[piece.kind.index()].clear(sq);
        self.colors[piece.color.index()].clear(sq);
        Some(piece)
    }

    /// Copy of the board with one piece relocated and nothing else updated.
    ///
    /// Whatever stood on `to` is removed. Used for what-if queries that only
    /// care about occupancy.
    pub(crate) fn with_piece_moved(&self, from: Square, to: Square) -> Board {
        let mut next = self.clone();
        if let Some(piece) = next.remove(from) {
            next.remove(to);
            next.put(to, piece);
        }
        next
    }

    /// Copy of the board with `color` to move.
    ///
    /// The en passant square only survives when the side does not change.
    pub(crate) fn with_side_to_move(&self, color: Color) -> Board {
        let mut next = self.clone();
        if next.side_to_move != color {
            next.side_to_move = color;
            next.en_passant = None;
        }
        next
    }

    /// Applies a pseudo-legal move and returns the resulting board.
    ///
    /// # Errors
    ///
    /// Fails if `from` is empty, holds a piece of the side not to move, or if
    /// the move is not among that piece's pseudo-legal moves on this board.
    /// King safety is not checked here; see [`Board::try_apply`].
    pub fn apply(&self, mv: Move) -> Result<Board, IllegalMoveError> {
        self.check_mover(mv.from())?;
        if !movegen::pseudo_legal_moves(self).contains(mv) {
            return Err(IllegalMoveError::NotPseudoLegal(mv.to_uci()));
        }
        Ok(self.apply_unchecked(mv))
    }

    /// Applies a move only if it is fully legal.
    pub fn try_apply(&self, mv: Move) -> Result<Board, IllegalMoveError> {
        let next = self.apply(mv)?;
        if attacks::is_king_attacked(&next, self.side_to_move) {
            return Err(IllegalMoveError::LeavesKingInCheck(mv.to_uci()));
        }
        Ok(next)
    }

    /// Matches an external request against the legal moves of this board.
    ///
    /// A pawn request reaching the back rank without a promotion piece is
    /// given `default_promotion`.
    pub fn resolve(
        &self,
        request: MoveRequest,
        default_promotion: PieceKind,
    ) -> Result<Move, IllegalMoveError> {
        let piece = self.check_mover(request.from)?;
        let promotion = match request.promotion {
            None if piece.kind == PieceKind::Pawn
                && request.to.rank() == piece.color.promotion_rank() =>
            {
                Some(default_promotion)
            }
            promotion => promotion,
        };
        let wanted = MoveRequest {
            promotion,
            ..request
        };

        let mv = movegen::pseudo_legal_moves(self)
            .iter()
            .copied()
            .find(|mv| *mv == wanted)
            .ok_or_else(|| IllegalMoveError::NotPseudoLegal(wanted.to_coordinate()))?;
        if attacks::is_king_attacked(&self.apply_unchecked(mv), self.side_to_move) {
            return Err(IllegalMoveError::LeavesKingInCheck(mv.to_uci()));
        }
        Ok(mv)
    }

    fn check_mover(&self, from: Square) -> Result<Piece, IllegalMoveError> {
        let piece = self
            .piece_at(from)
            .ok_or(IllegalMoveError::EmptySquare(from))?;
        if piece.color != self.side_to_move {
            return Err(IllegalMoveError::WrongColor(from));
        }
        Ok(piece)
    }

    /// Plays a move produced by the generator for this board.
    pub(crate) fn apply_unchecked(&self, mv: Move) -> Board {
        let mut next = self.clone();
        let us = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());

        let Some(piece) = next.remove(from) else {
            return next;
        };
        if let Some(captured) = mv.captured_square() {
            next.remove(captured);
        }
        next.put(
            to,
            Piece::new(mv.promotion().unwrap_or(piece.kind), us),
        );

        if mv.is_castle() {
            let side = if to.file() > from.file() {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            };
            let rook_to_file = match side {
                CastleSide::Kingside => 5,
                CastleSide::Queenside => 3,
            };
            let rank = us.home_rank();
            if let (Some(rook_from), Some(rook_to)) = (
                Square::from_coords(side.rook_file(), rank),
                Square::from_coords(rook_to_file, rank),
            ) {
                if let Some(rook) = next.remove(rook_from) {
                    next.put(rook_to, rook);
                }
            }
        }

        if piece.kind == PieceKind::King {
            next.castling.revoke_all(us);
        }
        for sq in [from, to] {
            if let Some((color, side)) = corner_right(sq) {
                next.castling.revoke(color, side);
            }
        }

        next.en_passant = if mv.is_double_push() {
            from.offset(0, us.forward())
        } else {
            None
        };

        if piece.kind == PieceKind::Pawn || mv.is_capture() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }
        if us == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = us.opposite();
        next
    }

    /// All fully legal moves for the side to move.
    pub fn legal_moves(&self) -> MoveList {
        movegen::legal_moves(self)
    }

    pub fn is_check(&self) -> bool {
        attacks::is_king_attacked(self, self.side_to_move)
    }

    pub fn is_checkmate(&self) -> bool {
        self.status() == GameStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.status() == GameStatus::Stalemate
    }

    pub fn status(&self) -> GameStatus {
        let no_moves = self.legal_moves().is_empty();
        match (self.is_check(), no_moves) {
            (true, true) => GameStatus::Checkmate,
            (false, true) => GameStatus::Stalemate,
            (true, false) => GameStatus::Check,
            (false, false) => GameStatus::Ongoing,
        }
    }
}

/// The castling right tied to a rook's home corner.
fn corner_right(sq: Square) -> Option<(Color, CastleSide)> {
    match sq {
        Square::A1 => Some((Color::White, CastleSide::Queenside)),
        Square::H1 => Some((Color::White, CastleSide::Kingside)),
        Square::A8 => Some((Color::Black, CastleSide::Queenside)),
        Square::H8 => Some((Color::Black, CastleSide::Kingside)),
        _ => None,
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = Square::from_coords(file, rank)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('.', Piece::to_fen_char);
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uci: &str) -> MoveRequest {
        uci.parse().unwrap()
    }

    fn play(board: &Board, uci: &str) -> Board {
        let mv = board.resolve(request(uci), PieceKind::Queen).unwrap();
        board.try_apply(mv).unwrap()
    }

    #[test]
    fn startpos_matches_fen() {
        let parsed = Board::from_fen(FenFields::STARTPOS).unwrap();
        assert_eq!(parsed, Board::startpos());
        assert_eq!(Board::startpos().to_fen(), FenFields::STARTPOS);
        assert_eq!(Board::default().occupied().count(), 32);
    }

    #[test]
    fn piece_queries() {
        let board = Board::startpos();
        assert_eq!(
            board.piece_at(Square::E1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(board.piece_at(Square::E4), None);
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(board.pieces_of(PieceKind::Pawn, Color::White).count(), 8);
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn apply_returns_new_board() {
        let board = Board::startpos();
        let next = play(&board, "e2e4");
        assert_eq!(board, Board::startpos());
        assert_eq!(next.side_to_move(), Color::Black);
        assert_eq!(next.en_passant(), Some(Square::E3));
        assert_eq!(
            next.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        let after = play(&next, "g8f6");
        assert_eq!(after.en_passant(), None);
        assert_eq!(after.halfmove_clock(), 1);
        assert_eq!(after.fullmove_number(), 2);
    }

    #[test]
    fn apply_rejects_foreign_moves() {
        let board = Board::startpos();
        assert_eq!(
            board.resolve(request("e4e5"), PieceKind::Queen),
            Err(IllegalMoveError::EmptySquare(Square::E4))
        );
        assert_eq!(
            board.resolve(request("e7e5"), PieceKind::Queen),
            Err(IllegalMoveError::WrongColor(Square::E7))
        );
        assert!(matches!(
            board.resolve(request("e2e5"), PieceKind::Queen),
            Err(IllegalMoveError::NotPseudoLegal(_))
        ));

        // A move generated on another board does not carry over.
        let other = Board::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let mv = other.resolve(request("e1d1"), PieceKind::Queen).unwrap();
        assert!(matches!(
            board.apply(mv),
            Err(IllegalMoveError::NotPseudoLegal(_))
        ));
    }

    #[test]
    fn pinned_piece_cannot_expose_king() {
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(matches!(
            board.resolve(request("e2c3"), PieceKind::Queen),
            Err(IllegalMoveError::LeavesKingInCheck(_))
        ));
        // apply checks geometry only
        let mv = movegen::pseudo_legal_moves(&board)
            .iter()
            .copied()
            .find(|m| m.to_uci() == "e2c3")
            .unwrap();
        assert!(board.apply(mv).is_ok());
        assert!(matches!(
            board.try_apply(mv),
            Err(IllegalMoveError::LeavesKingInCheck(_))
        ));
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let next = play(&board, "e1g1");
        assert_eq!(
            next.piece_at(Square::G1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            next.piece_at(Square::F1),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert_eq!(next.piece_at(Square::H1), None);
        assert!(!next.castling_rights().has(Color::White, CastleSide::Kingside));
        assert!(!next.castling_rights().has(Color::White, CastleSide::Queenside));
        assert!(next.castling_rights().has(Color::Black, CastleSide::Queenside));

        let black = play(&next, "e8c8");
        assert_eq!(
            black.piece_at(Square::D8),
            Some(Piece::new(PieceKind::Rook, Color::Black))
        );
        assert_eq!(black.castling_rights(), CastlingRights::NONE);
    }

    #[test]
    fn capturing_a_rook_revokes_its_right() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let next = play(&board, "a1a8");
        assert!(!next.castling_rights().has(Color::Black, CastleSide::Queenside));
        assert!(!next.castling_rights().has(Color::White, CastleSide::Queenside));
        assert!(next.castling_rights().has(Color::Black, CastleSide::Kingside));
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3P4/8/8/PPP1PPPP/RNBQKBNR b KQkq - 0 2").unwrap();
        let pushed = play(&board, "e7e5");
        assert_eq!(pushed.en_passant(), Some(Square::E6));
        let taken = play(&pushed, "d5e6");
        assert_eq!(
            taken.piece_at(Square::E6),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(taken.piece_at(Square::E5), None);
        assert_eq!(taken.piece_at(Square::D5), None);
    }

    #[test]
    fn promotion_uses_requested_or_default_piece() {
        let board = Board::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let queen = play(&board, "a7a8");
        assert_eq!(
            queen.piece_at(Square::A8),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        let knight_default = board.resolve(request("a7a8"), PieceKind::Knight).unwrap();
        assert_eq!(knight_default.promotion(), Some(PieceKind::Knight));
        let rook = play(&board, "a7a8r");
        assert_eq!(
            rook.piece_at(Square::A8),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(matches!(
            board.resolve(request("e1e2q"), PieceKind::Queen),
            Err(IllegalMoveError::NotPseudoLegal(_))
        ));
    }

    #[test]
    fn status_detection() {
        let mate = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert_eq!(mate.status(), GameStatus::Checkmate);
        assert!(mate.is_checkmate());
        assert!(!mate.is_stalemate());

        let stalemate = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(stalemate.status(), GameStatus::Stalemate);
        assert!(!stalemate.is_check());

        let check = Board::from_fen("4k3/8/8/8/8/8/8/4K2R b - - 0 1").unwrap();
        assert_eq!(check.status(), GameStatus::Ongoing);
        let check = Board::from_fen("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1").unwrap();
        assert_eq!(check.status(), GameStatus::Check);
        assert_eq!(Board::startpos().status(), GameStatus::Ongoing);
    }

    #[test]
    fn rejects_malformed_positions() {
        use MalformedPositionError as E;
        assert!(matches!(Board::from_fen("bad"), Err(E::Fen(_))));
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/8 w - - 0 1"),
            Err(E::KingCount {
                color: Color::White,
                count: 0
            })
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/2K1K3 w - - 0 1"),
            Err(E::KingCount {
                color: Color::White,
                count: 2
            })
        );
        assert_eq!(
            Board::from_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(E::PawnOnBackRank(Square::A8))
        );
        // White to move while the black king is attacked
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1"),
            Err(E::OpponentInCheck)
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - e6 0 1"),
            Err(E::InvalidEnPassant(Square::E6))
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1"),
            Err(E::InconsistentCastling('K'))
        );
        assert_eq!(
            Board::from_fen("4k2r/8/8/8/8/8/8/4K3 w q - 0 1"),
            Err(E::InconsistentCastling('q'))
        );
    }

    #[test]
    fn display_draws_the_board() {
        let text = Board::startpos().to_string();
        assert!(text.starts_with("8 r n b q k b n r"));
        assert!(text.ends_with("  a b c d e f g h"));
    }
}
