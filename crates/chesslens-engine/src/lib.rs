//! Position state and tactical analysis for an interactive chess viewer.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit set of squares
//! - [`Board`] - immutable position snapshots with functional `apply`
//! - Attack geometry, including x-ray queries ([`movegen::attacks`])
//! - Legal move generation with a self-check filter ([`movegen`])
//! - Tactical annotations: hanging pieces, exchanges, pins, skewers, forks
//!   and pawn structure ([`tactics`])
//! - Bounded undo/redo [`History`]
//! - The [`Engine`] facade tying them together behind a tactical cache
//!
//! # Example
//!
//! ```
//! use chesslens_engine::Engine;
//!
//! let mut engine = Engine::new();
//! engine.play("e2e4".parse().unwrap()).unwrap();
//! engine.play("d7d5".parse().unwrap()).unwrap();
//!
//! let report = engine.tactical_report();
//! println!("{} pieces hanging", report.hanging().count());
//! engine.undo().unwrap();
//! ```

mod bitboard;
mod board;
pub mod config;
pub mod error;
pub mod history;
mod mov;
pub mod movegen;
pub mod session;
pub mod tactics;
mod zobrist;

pub use bitboard::Bitboard;
pub use board::{Board, GameStatus};
pub use config::{ConfigError, EngineConfig, TacticsConfig};
pub use error::{
    EngineError, HistoryDirection, IllegalMoveError, MalformedPositionError, NoHistoryError,
};
pub use history::{History, HistoryEntry};
pub use mov::Move;
pub use movegen::attacks::{attackers_of, attackers_of_xray, attacks_from};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{legal_moves, MoveList};
pub use session::{Engine, GameRecord};
pub use tactics::{
    CacheStats, Fork, PawnStructure, Pin, SideReport, Skewer, SquareInspection, TacticalReport,
};
