//! Error kinds reported by the engine.
//!
//! Every failing operation leaves the engine exactly as it was, so all of
//! these are recoverable by the caller.

use crate::ConfigError;
use chesslens_core::{Color, FenError, RequestError, Square};
use std::fmt;
use thiserror::Error;

/// A move was rejected against the current board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalMoveError {
    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("the piece on {0} belongs to the side not to move")]
    WrongColor(Square),

    #[error("{0} is not a legal move for that piece")]
    NotPseudoLegal(String),

    #[error("{0} would leave the king in check")]
    LeavesKingInCheck(String),
}

/// Which way a history step was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryDirection::Undo => f.write_str("undo"),
            HistoryDirection::Redo => f.write_str("redo"),
        }
    }
}

/// The history cursor is already at the end being stepped towards.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("nothing to {direction}")]
pub struct NoHistoryError {
    pub direction: HistoryDirection,
}

/// An imported position or game cannot be installed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedPositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{color} has {count} kings, expected exactly one")]
    KingCount { color: Color, count: u32 },

    #[error("pawn on back rank square {0}")]
    PawnOnBackRank(Square),

    #[error("the side not to move is in check")]
    OpponentInCheck,

    #[error("en passant square {0} does not follow a double pawn push")]
    InvalidEnPassant(Square),

    #[error("castling right '{0}' without king and rook on their home squares")]
    InconsistentCastling(char),

    #[error("move {ply} ({mv}) cannot be replayed: {reason}")]
    IllegalGameMove {
        ply: usize,
        mv: String,
        reason: IllegalMoveError,
    },
}

/// Any error the engine facade can return.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    IllegalMove(#[from] IllegalMoveError),

    #[error(transparent)]
    NoHistory(#[from] NoHistoryError),

    #[error(transparent)]
    MalformedPosition(#[from] MalformedPositionError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
