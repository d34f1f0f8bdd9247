//! Castling rights.

use crate::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which wing a castling move goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

    /// File index of the rook's starting square on this wing.
    #[inline]
    pub const fn rook_file(self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }
}

/// The four independent castling rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => 0b0001,
            (Color::White, CastleSide::Queenside) => 0b0010,
            (Color::Black, CastleSide::Kingside) => 0b0100,
            (Color::Black, CastleSide::Queenside) => 0b1000,
        }
    }

    /// Returns true if `color` still holds the right on `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side) != 0
    }

    /// Returns a copy with the right granted.
    #[inline]
    pub const fn with(self, color: Color, side: CastleSide) -> Self {
        CastlingRights(self.0 | Self::flag(color, side))
    }

    /// Revokes a single right.
    #[inline]
    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        self.0 &= !Self::flag(color, side);
    }

    /// Revokes both rights of a side.
    #[inline]
    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::Kingside);
        self.revoke(color, CastleSide::Queenside);
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw four-bit encoding (white kingside is bit 0).
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Parses the FEN castling field (`KQkq` subset or `-`).
    pub fn from_fen(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(CastlingRights::NONE);
        }
        if field.is_empty() {
            return None;
        }
        let mut rights = CastlingRights::NONE;
        for c in field.chars() {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::Kingside),
                'Q' => (Color::White, CastleSide::Queenside),
                'k' => (Color::Black, CastleSide::Kingside),
                'q' => (Color::Black, CastleSide::Queenside),
                _ => return None,
            };
            rights = rights.with(color, side);
        }
        Some(rights)
    }

    /// Letters for each held right, in `KQkq` order.
    pub fn letters(self) -> impl Iterator<Item = (char, Color, CastleSide)> {
        [
            ('K', Color::White, CastleSide::Kingside),
            ('Q', Color::White, CastleSide::Queenside),
            ('k', Color::Black, CastleSide::Kingside),
            ('q', Color::Black, CastleSide::Queenside),
        ]
        .into_iter()
        .filter(move |&(_, color, side)| self.has(color, side))
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (c, _, _) in self.letters() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
