//! Tactical annotations for a position.
//!
//! Nothing here decides legality. The detectors describe what is on the
//! board for a viewer: loose and attacked pieces, exchange outcomes, pins,
//! skewers, forks and pawn weaknesses. [`analyze`] runs them all;
//! [`TacticalCache`] keeps the result for the position on screen.

mod activity;
mod cache;
mod exchange;
mod forks;
mod lines;
mod pawns;

pub use activity::{activity, captured, development};
pub use cache::{CacheStats, TacticalCache};
pub use exchange::{inspect, static_exchange, Coverage, SquareInspection};
pub use forks::{find_forks, Fork};
pub use lines::{find_lines, Lines, Pin, Skewer};
pub use pawns::{pawn_structure, PawnStructure};

use crate::config::TacticsConfig;
use crate::movegen::attacks::attackers_mask;
use crate::Board;
use chesslens_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Findings about the pieces of one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideReport {
    /// Pieces attacked by at least one enemy piece, king included.
    pub attacked: Vec<Square>,
    /// Attacked pieces the enemy wins material by capturing.
    pub hanging: Vec<Square>,
    pub pawns: PawnStructure,
    /// Distinct squares the side's non-pawn pieces can legally reach.
    pub activity: u32,
    /// Pieces off their starting posts, see [`development`].
    pub developed: u32,
    /// Pieces missing from the initial set, strongest first.
    pub captured: Vec<PieceKind>,
}

/// Everything the detectors found on one board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticalReport {
    pub white: SideReport,
    pub black: SideReport,
    /// Exchange result for the attacker on every attacked non-king piece.
    pub exchanges: BTreeMap<Square, i32>,
    pub pins: Vec<Pin>,
    pub skewers: Vec<Skewer>,
    pub forks: Vec<Fork>,
}

impl TacticalReport {
    pub fn side(&self, color: Color) -> &SideReport {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn side_mut(&mut self, color: Color) -> &mut SideReport {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Hanging pieces of both sides, white first.
    pub fn hanging(&self) -> impl Iterator<Item = Square> + '_ {
        self.white.hanging.iter().chain(&self.black.hanging).copied()
    }

    pub fn is_hanging(&self, sq: Square) -> bool {
        self.hanging().any(|h| h == sq)
    }

    pub fn pin_on(&self, sq: Square) -> Option<&Pin> {
        self.pins.iter().find(|p| p.pinned == sq)
    }
}

/// Runs every detector on `board`.
pub fn analyze(board: &Board, config: &TacticsConfig) -> TacticalReport {
    let mut report = TacticalReport::default();
    let occupied = board.occupied();

    for (sq, piece) in board.pieces() {
        let enemy = piece.color.opposite();
        if attackers_mask(board, sq, enemy, occupied).is_empty() {
            continue;
        }
        report.side_mut(piece.color).attacked.push(sq);
        if piece.kind == PieceKind::King {
            continue;
        }
        let gain = static_exchange(board, sq, enemy);
        report.exchanges.insert(sq, gain);
        if gain > 0 {
            report.side_mut(piece.color).hanging.push(sq);
        }
    }

    let Lines { pins, skewers } = find_lines(board, config.include_pawn_pins);
    report.pins = pins;
    report.skewers = skewers;

    if config.detect_forks {
        report.forks = find_forks(board);
    }
    for color in [Color::White, Color::Black] {
        let side = report.side_mut(color);
        side.activity = activity(board, color);
        side.developed = development(board, color);
        side.captured = captured(board, color);
    }

    if config.detect_pawn_structure {
        report.white.pawns = pawn_structure(board, Color::White);
        report.black.pawns = pawn_structure(board, Color::Black);
    }
    report
}
