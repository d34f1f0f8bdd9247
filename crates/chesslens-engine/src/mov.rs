//! Move representation.

use chesslens_core::{MoveRequest, PieceKind, Square};
use serde::Serialize;
use std::fmt;

const CAPTURE: u8 = 1;
const EN_PASSANT: u8 = 1 << 1;
const CASTLE: u8 = 1 << 2;
const DOUBLE_PUSH: u8 = 1 << 3;

/// A fully described move.
///
/// Moves are only produced by the move generator, either directly or by
/// resolving a [`MoveRequest`] against the legal moves of a position, so a
/// `Move` always carries flags that agree with the board it came from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    flags: u8,
}

impl Move {
    #[inline]
    pub(crate) const fn quiet(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags: 0,
        }
    }

    #[inline]
    pub(crate) const fn capture(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags: CAPTURE,
        }
    }

    #[inline]
    pub(crate) const fn double_push(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags: DOUBLE_PUSH,
        }
    }

    #[inline]
    pub(crate) const fn en_passant(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags: CAPTURE | EN_PASSANT,
        }
    }

    #[inline]
    pub(crate) const fn castle(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags: CASTLE,
        }
    }

    #[inline]
    pub(crate) const fn promote(from: Square, to: Square, kind: PieceKind, capture: bool) -> Self {
        Move {
            from,
            to,
            promotion: Some(kind),
            flags: if capture { CAPTURE } else { 0 },
        }
    }

    /// Placeholder for fixed-size buffers; never a legal move.
    pub(crate) const NULL: Move = Move::quiet(Square::A1, Square::A1);

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags & CAPTURE != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flags & EN_PASSANT != 0
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.flags & CASTLE != 0
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.flags & DOUBLE_PUSH != 0
    }

    /// Square of the captured piece, which differs from `to` for en passant.
    pub fn captured_square(self) -> Option<Square> {
        if !self.is_capture() {
            None
        } else if self.is_en_passant() {
            Square::from_coords(self.to.file(), self.from.rank())
        } else {
            Some(self.to)
        }
    }

    /// Drops the flags, keeping what a caller would have asked for.
    #[inline]
    pub const fn request(self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// Coordinate notation (e.g. "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        self.request().to_coordinate()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}", self.to_uci())?;
        if self.is_castle() {
            write!(f, ", castle")?;
        }
        if self.is_en_passant() {
            write!(f, ", en passant")?;
        } else if self.is_capture() {
            write!(f, ", capture")?;
        }
        if self.is_double_push() {
            write!(f, ", double push")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

impl Serialize for Move {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_uci())
    }
}

impl PartialEq<MoveRequest> for Move {
    fn eq(&self, other: &MoveRequest) -> bool {
        self.request() == *other
    }
}
