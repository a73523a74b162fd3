//! Headless match runner: plays AI-vs-AI matches, records every result in a
//! ledger and prints the leaderboard.
//!
//! Usage:
//!   pong-sim --matches 20 --mode BEST_OF_3 --difficulty HARD
//!   RUST_LOG=game_core=debug pong-sim --ledger ledger.json

mod runner;

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use clap::Parser;
use game_core::{Difficulty, GameMode, MatchConfig, MatchSession, Params};
use match_store::{BackgroundSink, FileStore, LeaderboardEntry, MatchStore, MemoryStore};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "pong-sim")]
#[command(about = "Play headless AI-vs-AI ping-pong matches and print the leaderboard")]
struct Args {
    /// Number of matches to play
    #[arg(short = 'n', long, default_value_t = 10)]
    matches: u32,

    /// FIRST_TO_5, FIRST_TO_10 or BEST_OF_3
    #[arg(long, default_value = "FIRST_TO_5")]
    mode: GameMode,

    /// Strength of the built-in AI on the right
    #[arg(long, default_value = "MEDIUM")]
    difficulty: Difficulty,

    /// Strength of the autopilot playing the left paddle
    #[arg(long, default_value = "MEDIUM")]
    left_difficulty: Difficulty,

    /// Leaderboard name for the left paddle
    #[arg(long, default_value = "Bot")]
    name: String,

    /// Match config JSON; overrides --mode, --difficulty and --name
    #[arg(long)]
    config: Option<PathBuf>,

    /// Persist the ledger to this JSON file instead of memory
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Seed of the first match; later matches count up from it
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Give up on a match after this much simulated time
    #[arg(long, default_value_t = 600)]
    max_seconds: u32,

    /// Print the leaderboard as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let settings = load_settings(&args)?;

    match &args.ledger {
        Some(path) => {
            let store = FileStore::open(path)
                .with_context(|| format!("opening ledger {}", path.display()))?;
            run(&args, &settings, store)
        }
        None => run(&args, &settings, MemoryStore::new()),
    }
}

fn load_settings(args: &Args) -> anyhow::Result<MatchConfig> {
    let settings = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MatchConfig::from_json(&raw)?
        }
        None => MatchConfig::against_ai(args.mode, args.difficulty, &args.name),
    };
    settings.validate()?;
    Ok(settings)
}

fn run<S: MatchStore + 'static>(
    args: &Args,
    settings: &MatchConfig,
    store: S,
) -> anyhow::Result<()> {
    let store = Arc::new(Mutex::new(store));
    let max_frames = (args.max_seconds as f32 / Params::FIXED_DT) as u64;

    for i in 0..args.matches {
        let seed = args.seed.wrapping_add(u64::from(i));
        let mut session = MatchSession::new(settings.clone(), seed)?;
        session.set_result_sink(Box::new(BackgroundSink::spawn(store.clone())?));
        let mut pilots = runner::pilots_for(settings, args.left_difficulty, seed);

        let outcome = runner::play_match(&mut session, &mut pilots, max_frames);
        match &outcome.result {
            Some(result) => {
                let score = session.score();
                println!(
                    "match {:>3}: {} beat {}  {}-{} ({}-{} games)  +{} sats  [{:.1}s]",
                    i + 1,
                    result.winner_name(),
                    result.loser_name(),
                    score.left_points,
                    score.right_points,
                    score.left_games,
                    score.right_games,
                    result.winner_reward(),
                    outcome.frames as f32 * Params::FIXED_DT,
                );
            }
            None => warn!(seed, frames = outcome.frames, "match hit the time limit"),
        }
        // Dropping the session joins its writer thread
        drop(session);
    }

    let board = store
        .lock()
        .map_err(|_| anyhow!("store lock poisoned"))?
        .leaderboard();
    info!(players = board.len(), "simulation finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print_leaderboard(&board);
    }
    Ok(())
}

fn print_leaderboard(board: &[LeaderboardEntry]) {
    println!();
    println!(
        "{:<5} {:<20} {:>5} {:>7} {:>8} {:>8}",
        "rank", "player", "wins", "losses", "win %", "sats"
    );
    println!("{}", "=".repeat(58));
    for entry in board {
        println!(
            "{:<5} {:<20} {:>5} {:>7} {:>7.1}% {:>8}",
            entry.rank, entry.username, entry.wins, entry.losses, entry.win_rate, entry.sats
        );
    }
}
