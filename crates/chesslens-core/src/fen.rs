//! FEN (Forsyth-Edwards Notation) fields.
//!
//! This is the text boundary of position import. Parsing here checks syntax
//! only; whether the described position is legal (king counts, checks,
//! consistent castling and en passant state) is decided by the engine.

use crate::{CastlingRights, Color, Piece, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// The six fields of a FEN record, decoded into typed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenFields {
    /// Piece on each square, indexed by [`Square::index`].
    pub placement: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenFields {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let placement = Self::parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = CastlingRights::from_fen(fields[2])
            .ok_or_else(|| FenError::InvalidCastlingRights(fields[2].to_string()))?;

        let en_passant = match fields[3] {
            "-" => None,
            text => {
                let sq = Square::from_algebraic(text)
                    .filter(|sq| sq.rank() == 2 || sq.rank() == 5)
                    .ok_or_else(|| FenError::InvalidEnPassantSquare(text.to_string()))?;
                Some(sq)
            }
        };

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(fields[4].to_string()))?;

        let fullmove_number = fields[5]
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(fields[5].to_string()))?;

        Ok(FenFields {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(text: &str) -> Result<[Option<Piece>; 64], FenError> {
        let ranks: Vec<&str> = text.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut placement = [None; 64];
        // FEN lists rank 8 first.
        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - row as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += run as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if let Some(sq) = Square::from_coords(file, rank) {
                        placement[sq.index() as usize] = Some(piece);
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }
        Ok(placement)
    }

    /// Serializes the fields back to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = Square::from_coords(file, rank)
                    .and_then(|sq| self.placement[sq.index() as usize]);
                match piece {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        format!(
            "{} {} {} {} {} {}",
            fen,
            self.side_to_move.to_fen_char(),
            self.castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
