//! Zobrist hashing for board identity.
//!
//! A board's hash is the XOR of one key per (kind, colour, square) occupant,
//! plus keys for the side to move, each held castling right and the en
//! passant file. The tactical cache uses it as the content-derived key for a
//! position.

use crate::Board;
use chesslens_core::{CastleSide, Color, PieceKind, Square};

/// Zobrist hash keys, generated from a fixed seed.
pub struct ZobristKeys {
    /// [kind][color][square]
    pieces: [[[u64; 64]; 2]; 6],
    black_to_move: u64,
    castling: [u64; 4],
    en_passant: [u64; 8],
}

impl ZobristKeys {
    const fn new() -> Self {
        // xorshift64
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut kind = 0;
        while kind < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[kind][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            kind += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    const fn piece_key(&self, kind: PieceKind, color: Color, square: Square) -> u64 {
        self.pieces[kind.index()][color.index()][square.index() as usize]
    }
}

static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Computes the hash of a board from scratch.
pub fn hash(board: &Board) -> u64 {
    let mut h = 0u64;
    for (sq, piece) in board.pieces() {
        h ^= ZOBRIST.piece_key(piece.kind, piece.color, sq);
    }
    if board.side_to_move() == Color::Black {
        h ^= ZOBRIST.black_to_move;
    }
    let rights = board.castling_rights();
    for (i, (color, side)) in [
        (Color::White, CastleSide::Kingside),
        (Color::White, CastleSide::Queenside),
        (Color::Black, CastleSide::Kingside),
        (Color::Black, CastleSide::Queenside),
    ]
    .into_iter()
    .enumerate()
    {
        if rights.has(color, side) {
            h ^= ZOBRIST.castling[i];
        }
    }
    if let Some(ep) = board.en_passant() {
        h ^= ZOBRIST.en_passant[ep.file() as usize];
    }
    h
}
