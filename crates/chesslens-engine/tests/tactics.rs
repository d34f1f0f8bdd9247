//! Tactical report through the engine facade.

use chesslens_core::{Color, MoveRequest, Square};
use chesslens_engine::tactics::{analyze, static_exchange};
use chesslens_engine::{Board, Engine, EngineConfig, TacticsConfig};
use proptest::prelude::*;

fn req(s: &str) -> MoveRequest {
    s.parse().unwrap()
}

fn engine_at(fen: &str) -> Engine {
    let mut engine = Engine::new();
    engine.import_position(fen).unwrap();
    engine
}

#[test]
fn exchange_depends_on_the_second_attacker() {
    // Knight e5 defended once by the d6 pawn. A bishop leads; the follow-up
    // rook makes the trade pay.
    let winning = Board::from_fen("4k3/8/3p4/4n3/8/2B5/8/4R1K1 w - - 0 1").unwrap();
    assert!(static_exchange(&winning, Square::E5, Color::White) > 0);

    // Pawn e5 defended by the d6 pawn and the c6 knight. The knight leads and
    // the queen behind it cannot recapture safely.
    let losing = Board::from_fen("4k3/8/2np4/4p3/8/5N2/8/4Q1K1 w - - 0 1").unwrap();
    assert!(static_exchange(&losing, Square::E5, Color::White) < 0);

    // Nothing defends the rook
    let free = Board::from_fen("4k3/8/8/4r3/8/2B5/8/4Q1K1 w - - 0 1").unwrap();
    assert_eq!(static_exchange(&free, Square::E5, Color::White), 5);
}

#[test]
fn report_lists_pins_and_skewers() {
    let mut engine = engine_at("4k3/3n4/8/1B6/8/r1q4R/8/4K3 w - - 0 1");
    let report = engine.tactical_report();

    let pin = report.pin_on(Square::D7).unwrap();
    assert_eq!(pin.pinner, Square::B5);
    assert_eq!(pin.pinned_to, Square::E8);
    assert!(pin.absolute);

    // The h3 rook hits the queen with the a3 rook behind it
    assert_eq!(report.skewers.len(), 1);
    let skewer = &report.skewers[0];
    assert_eq!(
        (skewer.attacker, skewer.front, skewer.back),
        (Square::H3, Square::C3, Square::A3)
    );
}

#[test]
fn a_checked_king_is_never_skewered() {
    // The h1 queen checks along the first rank with the a1 rook behind
    let mut engine = engine_at("4k3/8/8/8/8/8/8/R3K2q w - - 0 1");
    assert!(engine.tactical_report().skewers.is_empty());
}

#[test]
fn report_never_describes_the_previous_board() {
    let mut engine = engine_at("4k3/8/8/4n3/8/8/8/4R1K1 w - - 0 1");
    assert_eq!(engine.tactical_report().black.hanging, vec![Square::E5]);

    // Rook takes the knight: nothing hangs any more
    engine.play(req("e1e5")).unwrap();
    let after = engine.tactical_report();
    assert!(after.black.hanging.is_empty());
    assert_eq!(*after, analyze(engine.current_board(), &TacticsConfig::default()));

    // And undo brings the old picture back
    engine.undo().unwrap();
    assert_eq!(engine.tactical_report().black.hanging, vec![Square::E5]);
    assert_eq!(engine.cache_stats().misses, 3);
}

#[test]
fn inspection_follows_the_board() {
    let mut engine = Engine::new();
    let before = engine.inspect_square(Square::E5);
    assert!(before.white.direct.is_empty());

    engine.play(req("d2d4")).unwrap();
    let after = engine.inspect_square(Square::E5);
    assert_eq!(after.white.direct, vec![Square::D4]);
}

#[test]
fn pawn_pins_follow_the_config() {
    let fen = "4k3/8/8/8/4p3/8/8/4R1K1 w - - 0 1";
    assert_eq!(engine_at(fen).tactical_report().pins.len(), 1);

    let config = EngineConfig::from_toml_str("[tactics]\ninclude_pawn_pins = false\n").unwrap();
    let mut engine = Engine::with_config(config);
    engine.import_position(fen).unwrap();
    assert!(engine.tactical_report().pins.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The cached report always equals a fresh analysis of the current board.
    #[test]
    fn cached_report_is_always_fresh(choices in prop::collection::vec(any::<u16>(), 0..30)) {
        let mut engine = Engine::new();
        let config = TacticsConfig::default();
        for choice in choices {
            let report = engine.tactical_report();
            prop_assert_eq!(&*report, &analyze(engine.current_board(), &config));

            let moves = engine.legal_moves();
            if moves.is_empty() {
                break;
            }
            if choice % 5 == 0 && engine.history().can_undo() {
                engine.undo().unwrap();
            } else {
                engine.try_apply(moves[choice as usize % moves.len()]).unwrap();
            }
        }
    }

    /// Asking twice without a change never recomputes.
    #[test]
    fn repeated_queries_hit_the_cache(choices in prop::collection::vec(any::<u16>(), 1..20)) {
        let mut engine = Engine::new();
        for choice in choices {
            let moves = engine.legal_moves();
            if moves.is_empty() {
                break;
            }
            engine.try_apply(moves[choice as usize % moves.len()]).unwrap();
            let misses = engine.cache_stats().misses;
            let first = engine.tactical_report();
            let second = engine.tactical_report();
            prop_assert_eq!(first, second);
            prop_assert_eq!(engine.cache_stats().misses, misses + 1);
        }
    }
}
