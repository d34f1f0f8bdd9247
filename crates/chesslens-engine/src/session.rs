//! The engine a viewer talks to.
//!
//! [`Engine`] owns the history of board snapshots and the tactical cache for
//! the board at the history cursor. Every operation either succeeds
//! completely or leaves the engine exactly as it was.

use crate::error::{IllegalMoveError, MalformedPositionError, NoHistoryError};
use crate::history::History;
use crate::movegen::{destinations_from, MoveList};
use crate::tactics::{CacheStats, SquareInspection, TacticalCache, TacticalReport};
use crate::{Bitboard, Board, EngineConfig, GameStatus, Move};
use chesslens_core::{MoveRequest, Square};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A game as exchanged with the outside: where it starts and what was played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub start_fen: String,
    pub moves: Vec<MoveRequest>,
}

#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    history: History,
    cache: TacticalCache,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine at the standard starting position with default settings.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::from_board(Board::startpos(), config)
    }

    /// Engine starting from an already validated board.
    pub fn from_board(board: Board, config: EngineConfig) -> Self {
        let history = History::new(board, config.history_limit);
        Engine {
            config,
            history,
            cache: TacticalCache::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_board(&self) -> &Board {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn legal_moves(&self) -> MoveList {
        self.current_board().legal_moves()
    }

    /// Squares the piece on `from` may legally move to.
    pub fn legal_destinations(&self, from: Square) -> Bitboard {
        destinations_from(&self.legal_moves(), from)
    }

    pub fn status(&self) -> GameStatus {
        self.current_board().status()
    }

    /// Plays a legal move, discarding any redo entries.
    pub fn try_apply(&mut self, mv: Move) -> Result<&Board, IllegalMoveError> {
        let next = self.current_board().try_apply(mv)?;
        self.commit(next, mv);
        Ok(self.current_board())
    }

    /// Resolves an external request against the current board and plays it.
    pub fn play(&mut self, request: MoveRequest) -> Result<&Board, IllegalMoveError> {
        let mv = self
            .current_board()
            .resolve(request, self.config.default_promotion)?;
        self.try_apply(mv)
    }

    fn commit(&mut self, next: Board, mv: Move) {
        self.cache.invalidate();
        let evicted = self.history.push(next, mv);
        tracing::debug!("played {} -> {}", mv, self.current_board().to_fen());
        if evicted > 0 {
            tracing::debug!(
                "history limit {} reached, dropped {} oldest entries",
                self.history.limit(),
                evicted
            );
        }
    }

    pub fn undo(&mut self) -> Result<&Board, NoHistoryError> {
        self.history.undo()?;
        self.cache.invalidate();
        tracing::debug!("undo to entry {}", self.history.cursor());
        Ok(self.current_board())
    }

    pub fn redo(&mut self) -> Result<&Board, NoHistoryError> {
        self.history.redo()?;
        self.cache.invalidate();
        tracing::debug!("redo to entry {}", self.history.cursor());
        Ok(self.current_board())
    }

    pub fn jump_to_start(&mut self) -> &Board {
        self.history.jump_to_start();
        self.cache.invalidate();
        tracing::debug!("jumped to the oldest entry");
        self.current_board()
    }

    pub fn jump_to_end(&mut self) -> &Board {
        self.history.jump_to_end();
        self.cache.invalidate();
        tracing::debug!("jumped to entry {}", self.history.cursor());
        self.current_board()
    }

    /// Tactical annotations for the current board, computed at most once
    /// per position.
    pub fn tactical_report(&mut self) -> Arc<TacticalReport> {
        let board = self.history.current();
        self.cache.report(board, &self.config.tactics)
    }

    pub fn inspect_square(&mut self, square: Square) -> Arc<SquareInspection> {
        let board = self.history.current();
        self.cache.inspection(board, square)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Replaces the game with a single position.
    pub fn import_position(&mut self, fen: &str) -> Result<(), MalformedPositionError> {
        let board = Board::from_fen(fen).inspect_err(|e| {
            tracing::warn!("rejected position {:?}: {}", fen, e);
        })?;
        self.reset(History::new(board, self.config.history_limit));
        tracing::debug!("imported position {}", fen);
        Ok(())
    }

    /// Replaces the game with `moves` replayed from `start_fen`.
    ///
    /// The cursor ends on the last move. If any move fails to replay the
    /// current game is kept untouched.
    pub fn import_game(
        &mut self,
        start_fen: &str,
        moves: &[MoveRequest],
    ) -> Result<(), MalformedPositionError> {
        let history = self.replay(start_fen, moves).inspect_err(|e| {
            tracing::warn!("rejected game from {:?}: {}", start_fen, e);
        })?;
        self.reset(history);
        tracing::debug!("imported game of {} moves from {}", moves.len(), start_fen);
        Ok(())
    }

    fn replay(
        &self,
        start_fen: &str,
        moves: &[MoveRequest],
    ) -> Result<History, MalformedPositionError> {
        let mut history = History::new(Board::from_fen(start_fen)?, self.config.history_limit);
        let mut board = history.current().clone();
        for (ply, &request) in moves.iter().enumerate() {
            let (mv, next) = board
                .resolve(request, self.config.default_promotion)
                .and_then(|mv| board.try_apply(mv).map(|next| (mv, next)))
                .map_err(|reason| MalformedPositionError::IllegalGameMove {
                    ply: ply + 1,
                    mv: request.to_coordinate(),
                    reason,
                })?;
            history.push(next.clone(), mv);
            board = next;
        }
        Ok(history)
    }

    fn reset(&mut self, history: History) {
        self.history = history;
        self.cache.invalidate();
    }

    /// The retained game: the oldest board and every move after it, up to
    /// the newest entry regardless of the cursor.
    pub fn export_game(&self) -> GameRecord {
        GameRecord {
            start_fen: self.history.oldest().to_fen(),
            moves: self.history.moves().iter().map(|m| m.request()).collect(),
        }
    }
}
