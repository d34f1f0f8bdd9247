//! Core types for chesslens.
//!
//! This crate provides the value types shared by the engine and its front ends:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates
//! - [`CastlingRights`] for the four castling flags
//! - [`MoveRequest`] for moves arriving from outside the engine
//! - FEN parsing and serialization ([`FenFields`])

mod castling;
mod color;
mod fen;
mod piece;
mod request;
mod square;

pub use castling::{CastleSide, CastlingRights};
pub use color::Color;
pub use fen::{FenError, FenFields};
pub use piece::{Piece, PieceKind};
pub use request::{MoveRequest, RequestError};
pub use square::{ParseSquareError, Square};
