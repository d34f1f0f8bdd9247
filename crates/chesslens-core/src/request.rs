//! Move requests arriving from outside the engine.

use crate::{PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing coordinate notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("invalid move length: expected 4 or 5 characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid square in move: {0:?}")]
    InvalidSquare(String),

    #[error("invalid promotion piece: {0:?}")]
    InvalidPromotion(char),
}

/// A move as requested by a caller: source, destination and an optional
/// promotion piece.
///
/// A request carries no flags and is not known to be legal. The engine
/// resolves it against the current position before anything is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        MoveRequest {
            from,
            to,
            promotion: None,
        }
    }

    /// Returns a copy of the request promoting to `kind`.
    #[inline]
    pub const fn promoting_to(self, kind: PieceKind) -> Self {
        MoveRequest {
            promotion: Some(kind),
            ..self
        }
    }

    /// Parses coordinate notation such as `e2e4` or `e7e8q`.
    pub fn from_coordinate(s: &str) -> Result<Self, RequestError> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(RequestError::InvalidLength(s.chars().count()));
        }
        let from = Square::from_algebraic(&s[0..2])
            .ok_or_else(|| RequestError::InvalidSquare(s[0..2].to_string()))?;
        let to = Square::from_algebraic(&s[2..4])
            .ok_or_else(|| RequestError::InvalidSquare(s[2..4].to_string()))?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_char(c) {
                Some(kind) if kind.is_promotable() => Some(kind),
                _ => return Err(RequestError::InvalidPromotion(c)),
            },
        };
        Ok(MoveRequest {
            from,
            to,
            promotion,
        })
    }

    /// Coordinate notation for the request.
    pub fn to_coordinate(self) -> String {
        let mut s = format!("{}{}", self.from, self.to);
        if let Some(kind) = self.promotion {
            s.push(kind.to_char());
        }
        s
    }
}

impl FromStr for MoveRequest {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveRequest::from_coordinate(s)
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_move() {
        let req: MoveRequest = "e2e4".parse().unwrap();
        assert_eq!(req, MoveRequest::new(Square::E2, Square::E4));
        assert_eq!(req.to_string(), "e2e4");
    }

    #[test]
    fn parses_promotion_in_either_case() {
        let lower = MoveRequest::from_coordinate("a7a8n").unwrap();
        let upper = MoveRequest::from_coordinate("a7a8N").unwrap();
        assert_eq!(lower.promotion, Some(PieceKind::Knight));
        assert_eq!(lower, upper);
        assert_eq!(
            MoveRequest::new(Square::A7, Square::A8)
                .promoting_to(PieceKind::Rook)
                .to_coordinate(),
            "a7a8r"
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            MoveRequest::from_coordinate("e2"),
            Err(RequestError::InvalidLength(2))
        );
        assert_eq!(
            MoveRequest::from_coordinate("e2e4qq"),
            Err(RequestError::InvalidLength(6))
        );
        assert!(matches!(
            MoveRequest::from_coordinate("e2e9"),
            Err(RequestError::InvalidSquare(_))
        ));
        assert_eq!(
            MoveRequest::from_coordinate("e7e8k"),
            Err(RequestError::InvalidPromotion('k'))
        );
        assert_eq!(
            MoveRequest::from_coordinate("e7e8x"),
            Err(RequestError::InvalidPromotion('x'))
        );
    }
}
