//! Bounded undo/redo history.
//!
//! Every entry is an immutable board snapshot together with the move that
//! produced it. A cursor marks the entry on screen; playing a move while the
//! cursor is behind the newest entry discards everything after it.

use crate::error::{HistoryDirection, NoHistoryError};
use crate::{Board, Move};
use std::collections::VecDeque;

/// A board snapshot and the move that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub board: Board,
    /// `None` for the position the history was started from.
    pub move_applied: Option<Move>,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Starts a history at `board` retaining at most `limit` entries.
    pub fn new(board: Board, limit: usize) -> Self {
        let mut entries = VecDeque::with_capacity(limit.min(64));
        entries.push_back(HistoryEntry {
            board,
            move_applied: None,
        });
        History {
            entries,
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Board at the cursor.
    pub fn current(&self) -> &Board {
        &self.entries[self.cursor].board
    }

    pub fn current_entry(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    /// Oldest retained board.
    pub fn oldest(&self) -> &Board {
        &self.entries[0].board
    }

    /// Records `board`, reached by playing `mv` from the current board.
    ///
    /// Entries after the cursor are dropped first. Returns the number of
    /// entries evicted from the front to stay within the limit.
    pub fn push(&mut self, board: Board, mv: Move) -> usize {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(HistoryEntry {
            board,
            move_applied: Some(mv),
        });

        let mut evicted = 0;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            evicted += 1;
        }
        self.cursor = self.entries.len() - 1;
        evicted
    }

    pub fn undo(&mut self) -> Result<&Board, NoHistoryError> {
        if !self.can_undo() {
            return Err(NoHistoryError {
                direction: HistoryDirection::Undo,
            });
        }
        self.cursor -= 1;
        Ok(self.current())
    }

    pub fn redo(&mut self) -> Result<&Board, NoHistoryError> {
        if !self.can_redo() {
            return Err(NoHistoryError {
                direction: HistoryDirection::Redo,
            });
        }
        self.cursor += 1;
        Ok(self.current())
    }

    pub fn jump_to_start(&mut self) -> &Board {
        self.cursor = 0;
        self.current()
    }

    pub fn jump_to_end(&mut self) -> &Board {
        self.cursor = self.entries.len() - 1;
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of retained entries, the starting one included.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Moves leading from the oldest retained board to the newest one.
    pub fn moves(&self) -> Vec<Move> {
        self.entries
            .iter()
            .skip(1)
            .filter_map(|e| e.move_applied)
            .collect()
    }
}
