//! Single-position memo for tactical analysis.
//!
//! The cache holds results for one board at a time. Entries are keyed by the
//! board's zobrist hash and confirmed by full equality, so a report can never
//! be served for a different position even on a hash collision.

use super::exchange::{inspect, SquareInspection};
use super::{analyze, TacticalReport};
use crate::config::TacticsConfig;
use crate::Board;
use chesslens_core::Square;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Report lookups served from memory versus computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
struct Entry {
    key: u64,
    board: Board,
    report: Option<Arc<TacticalReport>>,
    inspections: HashMap<Square, Arc<SquareInspection>>,
}

impl Entry {
    fn matches(&self, key: u64, board: &Board) -> bool {
        self.key == key && self.board == *board
    }
}

#[derive(Debug, Default)]
pub struct TacticalCache {
    entry: Option<Entry>,
    stats: CacheStats,
}

impl TacticalCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_for<'a>(slot: &'a mut Option<Entry>, board: &Board) -> &'a mut Entry {
        let key = board.zobrist();
        if !slot.as_ref().is_some_and(|e| e.matches(key, board)) {
            *slot = None;
        }
        slot.get_or_insert_with(|| Entry {
            key,
            board: board.clone(),
            report: None,
            inspections: HashMap::new(),
        })
    }

    /// Report for `board`, computed on the first request after a change.
    pub fn report(&mut self, board: &Board, config: &TacticsConfig) -> Arc<TacticalReport> {
        let entry = Self::entry_for(&mut self.entry, board);
        if let Some(report) = &entry.report {
            self.stats.hits += 1;
            tracing::trace!("tactical cache hit for {:016x}", entry.key);
            return Arc::clone(report);
        }

        self.stats.misses += 1;
        tracing::trace!("tactical cache miss for {:016x}", entry.key);
        let report = Arc::new(analyze(board, config));
        entry.report = Some(Arc::clone(&report));
        report
    }

    /// Inspection of one square of `board`, memoized per square.
    pub fn inspection(&mut self, board: &Board, square: Square) -> Arc<SquareInspection> {
        let entry = Self::entry_for(&mut self.entry, board);
        Arc::clone(
            entry
                .inspections
                .entry(square)
                .or_insert_with(|| Arc::new(inspect(board, square))),
        )
    }

    /// Drops everything held for the current board.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
