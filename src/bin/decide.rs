use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use arena_combat_bot::config::log_filter;
use arena_combat_bot::constants::{DEFAULT_HIGH_SCORING_PERCENTILE, DEFAULT_MAX_THROW_DISTANCE};
use arena_combat_bot::engine::{DecisionEngine, EngineOptions};
use arena_combat_bot::leaderboard::RankedLeaderboard;
use arena_combat_bot::leaderboard_store::parse_document;
use arena_combat_bot::protocol::parse_snapshot;
use clap::Parser;
use serde_json::json;
use tracing::warn;

/// Runs a single turn decision offline and prints the action token.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Turn request JSON; reads stdin when omitted.
    input: Option<PathBuf>,
    /// Leaderboard document to target high scorers from.
    #[arg(long)]
    leaderboard: Option<PathBuf>,
    /// Rank the turn's own players when no leaderboard is given.
    #[arg(long)]
    rank_locally: bool,
    #[arg(long, default_value_t = DEFAULT_HIGH_SCORING_PERCENTILE, value_parser = parse_percentile)]
    percentile: f64,
    #[arg(long, default_value_t = DEFAULT_MAX_THROW_DISTANCE)]
    max_throw_distance: usize,
    /// Print the full decision as JSON instead of the bare token.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref(), "warn"))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let raw = match read_input(cli.input.as_deref()) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("failed to read turn request: {error}");
            std::process::exit(2);
        }
    };
    let snapshot = match parse_snapshot(&raw) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            eprintln!("malformed turn request: {error}");
            std::process::exit(2);
        }
    };

    let leaderboard = cli.leaderboard.as_deref().and_then(load_leaderboard);
    let engine = DecisionEngine::new(EngineOptions {
        max_throw_distance: cli.max_throw_distance,
        high_scoring_percentile: cli.percentile,
        rank_locally: cli.rank_locally,
    });
    let decision = match engine.decide(&snapshot, leaderboard.as_ref()) {
        Ok(decision) => decision,
        Err(error) => {
            eprintln!("malformed turn request: {error}");
            std::process::exit(2);
        }
    };

    if cli.json {
        println!(
            "{}",
            json!({
                "action": decision.action,
                "reason": decision.reason,
                "leaderboard": leaderboard.is_some(),
            })
        );
    } else {
        println!("{}", decision.action);
    }
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn load_leaderboard(path: &Path) -> Option<RankedLeaderboard> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            warn!(path = %path.display(), %error, "leaderboard unreadable, ignoring");
            return None;
        }
    };
    match parse_document(&text) {
        Ok(document) => Some(document.entries),
        Err(error) => {
            warn!(path = %path.display(), %error, "leaderboard malformed, ignoring");
            None
        }
    }
}

fn parse_percentile(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!("percentile must be in (0, 1], got {value}"))
    }
}
