//! chesslens - describe a chess position from the command line.
//!
//! Imports a position and an optional move list, then prints the game status,
//! the legal moves and the tactical report, as text or JSON.

use anyhow::Context;
use chesslens_core::{Color, FenFields, MoveRequest, Square};
use chesslens_engine::{
    perft_divide, Engine, EngineConfig, GameStatus, Move, SquareInspection, TacticalReport,
};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Legal moves and tactical annotations for a chess position.
#[derive(Parser)]
#[command(name = "chesslens")]
#[command(about = "Legal moves and tactical annotations for a chess position")]
struct Cli {
    /// Starting position in FEN (defaults to the initial position)
    #[arg(long)]
    fen: Option<String>,

    /// Moves to play from the starting position, e.g. `e2e4 e7e5 g1f3`
    #[arg(short, long, num_args = 1..)]
    moves: Vec<MoveRequest>,

    /// Path to a TOML config file (defaults to ./chesslens.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also show attackers and defenders of this square
    #[arg(short, long)]
    square: Option<Square>,

    /// Count leaf nodes below each legal move to this depth
    #[arg(long)]
    perft: Option<u32>,

    /// Log engine activity at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    fen: String,
    status: GameStatus,
    legal_moves: Vec<Move>,
    report: &'a TacticalReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    inspection: Option<&'a SquareInspection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    perft: Option<Vec<(String, u64)>>,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => EngineConfig::load_or_default(EngineConfig::config_path())
            .context("failed to load chesslens.toml"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_ref())?;
    tracing::debug!("Config: {:?}", config);

    let mut engine = Engine::with_config(config);
    let fen = cli.fen.as_deref().unwrap_or(FenFields::STARTPOS);
    engine
        .import_game(fen, &cli.moves)
        .context("failed to set up the position")?;

    let report = engine.tactical_report();
    let inspection = cli.square.map(|sq| engine.inspect_square(sq));
    let board = engine.current_board();
    let perft = cli.perft.map(|depth| perft_divide(board, depth));

    let output = Output {
        fen: board.to_fen(),
        status: board.status(),
        legal_moves: board.legal_moves().to_vec(),
        report: &report,
        inspection: inspection.as_deref(),
        perft,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}\n", board);
        print_text(&output);
    }
    Ok(())
}

fn squares(list: &[Square]) -> String {
    if list.is_empty() {
        return "-".to_string();
    }
    list.iter()
        .map(|sq| sq.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_text(out: &Output<'_>) {
    let report = out.report;
    println!("FEN:      {}", out.fen);
    println!("Status:   {}", out.status);
    let moves: Vec<String> = out.legal_moves.iter().map(|m| m.to_uci()).collect();
    println!("Moves:    ({}) {}", moves.len(), moves.join(" "));

    for color in [Color::White, Color::Black] {
        let side = report.side(color);
        println!();
        println!("{}:", color);
        println!("  attacked  {}", squares(&side.attacked));
        println!("  hanging   {}", squares(&side.hanging));
        println!("  isolated  {}", squares(&side.pawns.isolated));
        println!("  doubled   {}", squares(&side.pawns.doubled));
        println!("  passed    {}", squares(&side.pawns.passed));
        println!("  backward  {}", squares(&side.pawns.backward));
        println!("  activity  {}", side.activity);
        println!("  developed {}", side.developed);
        let lost: String = side.captured.iter().map(|k| k.to_char()).collect();
        println!("  captured  {}", if lost.is_empty() { "-" } else { lost.as_str() });
    }

    if !report.exchanges.is_empty() {
        println!();
        println!("Exchanges:");
        for (sq, gain) in &report.exchanges {
            println!("  {} {:+}", sq, gain);
        }
    }
    if !report.pins.is_empty() {
        println!();
        println!("Pins:");
        for pin in &report.pins {
            let kind = if pin.absolute { "absolute" } else { "relative" };
            println!(
                "  {} pinned to {} by {} ({})",
                pin.pinned, pin.pinned_to, pin.pinner, kind
            );
        }
    }
    if !report.skewers.is_empty() {
        println!();
        println!("Skewers:");
        for skewer in &report.skewers {
            println!(
                "  {} skewers {} through {}",
                skewer.attacker, skewer.back, skewer.front
            );
        }
    }
    if !report.forks.is_empty() {
        println!();
        println!("Forks:");
        for fork in &report.forks {
            println!(
                "  {}{} hits {}",
                fork.origin,
                fork.destination,
                squares(&fork.targets)
            );
        }
    }

    if let Some(info) = out.inspection {
        println!();
        match info.piece {
            Some(piece) => println!("Square {} ({}):", info.square, piece),
            None => println!("Square {} (empty):", info.square),
        }
        for color in [Color::White, Color::Black] {
            let coverage = info.coverage(color);
            println!(
                "  {:<5} direct {}  x-ray {}",
                color.to_string(),
                squares(&coverage.direct),
                squares(&coverage.xray)
            );
        }
        if let Some(value) = info.exchange_value {
            println!("  exchange {:+}", value);
        }
    }

    if let Some(divide) = &out.perft {
        println!();
        println!("Perft:");
        for (mv, nodes) in divide {
            println!("  {}: {}", mv, nodes);
        }
        println!("  total: {}", divide.iter().map(|(_, n)| n).sum::<u64>());
    }
}
