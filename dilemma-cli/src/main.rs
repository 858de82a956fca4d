//! Dilemma CLI - Command-line interface
//!
//! Commands:
//! - match: Play a series between two strategies
//! - tournament: Round-robin over the catalog (or a chosen field)
//! - list: Show the strategy catalog

mod list_cmd;
mod match_cmd;
mod report;
mod tournament_cmd;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dilemma_core::game::{DEFAULT_BEAT, DEFAULT_BEATEN, DEFAULT_LLOST, DEFAULT_WWIN};
use dilemma_core::GameConfig;
use dilemma_tournament::{TournamentConfig, DEFAULT_MATCHES_PER_PAIR, DEFAULT_ROUNDS};

#[derive(Parser)]
#[command(name = "dilemma")]
#[command(version)]
#[command(about = "Iterated prisoner's dilemma arena")]
struct Cli {
    #[command(flatten)]
    game: GameArgs,

    /// Random seed for reproducibility (default 42)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE", global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a series of matches between two strategies
    Match(match_cmd::MatchArgs),
    /// Run a round-robin tournament
    Tournament(tournament_cmd::TournamentArgs),
    /// List available strategies
    List(list_cmd::ListArgs),
}

/// Payoffs and match sizing shared by every command
#[derive(Args, Clone, Debug)]
struct GameArgs {
    /// Payoff for defecting against a cooperator
    #[arg(long, default_value_t = DEFAULT_BEAT, allow_negative_numbers = true, global = true)]
    beat: i64,

    /// Payoff for mutual cooperation
    #[arg(long, default_value_t = DEFAULT_WWIN, allow_negative_numbers = true, global = true)]
    wwin: i64,

    /// Payoff for mutual defection
    #[arg(long, default_value_t = DEFAULT_LLOST, allow_negative_numbers = true, global = true)]
    llost: i64,

    /// Payoff for cooperating against a defector
    #[arg(long, default_value_t = DEFAULT_BEATEN, allow_negative_numbers = true, global = true)]
    beaten: i64,

    /// Rounds per match
    #[arg(long, default_value_t = DEFAULT_ROUNDS, global = true)]
    rounds: usize,

    /// Matches per pair
    #[arg(long, default_value_t = DEFAULT_MATCHES_PER_PAIR, global = true)]
    matches: usize,
}

impl GameArgs {
    /// Validated payoff and tournament settings
    fn settings(&self, seed: Option<u64>) -> Result<(GameConfig, TournamentConfig)> {
        let game = GameConfig::new(self.beat, self.wwin, self.llost, self.beaten)
            .context("Invalid payoff configuration")?;

        let mut config = TournamentConfig::new(self.rounds, self.matches);
        config.seed = seed;
        config.validate().context("Invalid match configuration")?;

        Ok((game, config))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log.as_deref())?;

    match cli.command {
        Commands::Match(args) => {
            let (game, config) = cli.game.settings(cli.seed)?;
            match_cmd::run(args, &game, &config)
        }
        Commands::Tournament(args) => {
            let (game, config) = cli.game.settings(cli.seed)?;
            tournament_cmd::run(args, &game, &config)
        }
        Commands::List(args) => list_cmd::run(args),
    }
}

/// Install the tracing subscriber; `RUST_LOG` overrides the `info` default
fn init_logging(log: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
