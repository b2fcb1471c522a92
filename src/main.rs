//! gomoku-worker: the decision engine as a process.
//!
//! ## Usage
//!
//! - `gomoku-worker serve` - JSON-lines worker on stdin/stdout
//! - `gomoku-worker analyze --board pos.txt --computer white` - decide one position
//! - `gomoku-worker demo` - run the built-in scenarios

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use gomoku::protocol::Outbound;
use gomoku::{Board, DecisionRequest, Difficulty, Engine, EngineConfig, Pos, Stone, Worker};

/// Gomoku move-decision engine
#[derive(Parser)]
#[command(name = "gomoku-worker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file overriding engine thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer JSON messages, one per line, on stdin/stdout
    Serve,
    /// Decide a single position read from a text file
    Analyze {
        /// 15 lines of `.`, `X` (black) and `O` (white)
        #[arg(long)]
        board: PathBuf,
        /// Color the engine plays
        #[arg(long, default_value = "white")]
        computer: Stone,
        #[arg(long, default_value = "hard")]
        difficulty: Difficulty,
    },
    /// Run the built-in scenarios
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Some(Commands::Serve) => serve(config),
        Some(Commands::Analyze {
            board,
            computer,
            difficulty,
        }) => analyze(config, &board, computer, difficulty),
        Some(Commands::Demo) | None => {
            run_demo(config);
            Ok(())
        }
    }
}

fn serve(config: EngineConfig) -> Result<()> {
    let (events, outbox) = channel::<Outbound>();
    let worker = Worker::with_events(config, events);

    let writer = thread::spawn(move || -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for event in outbox {
            writeln!(out, "{}", event.to_json()?)?;
            out.flush()?;
        }
        Ok(())
    });

    info!("serving on stdin");
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = worker.send_json(&line) {
            warn!("ignoring message: {err}");
        }
    }

    worker.shutdown();
    match writer.join() {
        Ok(result) => result,
        Err(_) => anyhow::bail!("output thread panicked"),
    }
}

fn analyze(config: EngineConfig, path: &Path, computer: Stone, difficulty: Difficulty) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading board {}", path.display()))?;
    let board: Board = text.parse().context("parsing board")?;

    let engine = Engine::new(config);
    let request = DecisionRequest::new(board, computer, difficulty);
    let result = engine.best_move(&request);

    match result.best_move {
        Some(pos) => println!(
            "{computer} plays {pos} via {:?} (score {}, {} nodes, {} ms)",
            result.tier, result.score, result.nodes, result.time_ms
        ),
        None => println!("no move ({:?})", result.tier),
    }
    Ok(())
}

fn run_demo(config: EngineConfig) {
    println!("Gomoku decision engine\n");
    let engine = Engine::new(config);

    println!("=== Empty board ===");
    show(&engine, Board::new(), Stone::Black, Difficulty::Hard);

    println!("=== Forced win ===");
    let mut board = Board::new();
    for col in 3..7 {
        board.place_stone(Pos::new(7, col), Stone::Black);
    }
    for col in [0, 2, 4] {
        board.place_stone(Pos::new(0, col), Stone::White);
    }
    show(&engine, board, Stone::Black, Difficulty::Medium);

    println!("=== Forced block ===");
    let mut board = Board::new();
    for col in 5..8 {
        board.place_stone(Pos::new(5, col), Stone::Black);
    }
    board.place_stone(Pos::new(9, 9), Stone::White);
    show(&engine, board, Stone::White, Difficulty::Easy);
}

fn show(engine: &Engine, board: Board, computer: Stone, difficulty: Difficulty) {
    print!("{board}");
    let request = DecisionRequest::new(board, computer, difficulty);
    let result = engine.best_move(&request);
    match result.best_move {
        Some(pos) => println!("{computer} ({difficulty}) plays {pos} via {:?}\n", result.tier),
        None => println!("{computer} ({difficulty}) has no move\n"),
    }
}
