//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a given depth; the
//! counts for well-known positions are published, so any generator bug shows
//! up as a mismatch.

use super::legal_moves;
use crate::Board;

/// Counts the leaf nodes at the given depth.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|m| perft(&board.apply_unchecked(*m), depth - 1))
        .sum()
}

/// Node count below each root move, sorted by move text.
pub fn perft_divide(board: &Board, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = legal_moves(board)
        .iter()
        .map(|m| {
            let nodes = if depth > 1 {
                perft(&board.apply_unchecked(*m), depth - 1)
            } else {
                1
            };
            (m.to_uci(), nodes)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1";

    #[test]
    fn perft_startpos() {
        let board = Board::startpos();
        assert_eq!(perft(&board, 1), 20);
        assert_eq!(perft(&board, 2), 400);
        assert_eq!(perft(&board, 3), 8902);
    }

    #[test]
    #[ignore]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&Board::startpos(), 4), 197_281);
    }

    // Castling, en passant and pins all at once
    #[test]
    fn perft_kiwipete() {
        let board = Board::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&board, 1), 48);
        assert_eq!(perft(&board, 2), 2039);
    }

    // Check evasion, en passant and rank pins
    #[test]
    fn perft_position3() {
        let board = Board::from_fen(POSITION_3).unwrap();
        assert_eq!(perft(&board, 1), 14);
        assert_eq!(perft(&board, 2), 191);
        assert_eq!(perft(&board, 3), 2812);
    }

    // Promotions and captures under check
    #[test]
    fn perft_position4() {
        let board = Board::from_fen(POSITION_4).unwrap();
        assert_eq!(perft(&board, 1), 6);
        assert_eq!(perft(&board, 2), 264);
        assert_eq!(perft(&board, 3), 9467);
    }

    #[test]
    fn perft_position5() {
        let board = Board::from_fen(POSITION_5).unwrap();
        assert_eq!(perft(&board, 1), 44);
        assert_eq!(perft(&board, 2), 1486);
    }

    #[test]
    fn divide_sums_to_perft() {
        let board = Board::startpos();
        let results = perft_divide(&board, 2);
        assert_eq!(results.len(), 20);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 400);
        assert_eq!(results[0].0, "a2a3");
    }
}
