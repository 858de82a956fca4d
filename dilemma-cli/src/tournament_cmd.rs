//! Tournament command - round-robin over the catalog or a chosen field
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: select_agents(), execute(), report_results()
//! - Level 3: render_text(), render_json(), progress_bar()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use dilemma_core::{all_agents, create_agent, Agent, GameConfig};
use dilemma_tournament::{
    run_tournament_with_callback, SeriesResult, TournamentConfig, TournamentResult,
};

use crate::report::{self, Format};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct TournamentArgs {
    /// Comma-separated strategies to enter (default: the whole catalog)
    #[arg(long, value_delimiter = ',')]
    pub agents: Vec<String>,

    /// Play pairs one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the report to this file
    #[arg(long, value_name = "FILE", conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Save the report to a timestamped `tournament_results_*` file
    #[arg(long)]
    pub save: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run tournament command
///
/// 1. Build the field
/// 2. Play every pair
/// 3. Report standings
pub fn run(args: TournamentArgs, game: &GameConfig, config: &TournamentConfig) -> Result<()> {
    let agents = select_agents(&args.agents)?;

    let mut config = config.clone();
    if args.sequential {
        config = config.sequential();
    }

    let result = execute(&agents, game, &config, !args.no_progress)?;

    if let Some(winner) = result.winner() {
        tracing::info!("Winner: {} ({:.2})", winner.name, winner.score);
    }

    report_results(&result, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build the field from names; unknown names are skipped with a warning
///
/// An empty list enters every catalog strategy.
fn select_agents(names: &[String]) -> Result<Vec<Box<dyn Agent>>> {
    if names.is_empty() {
        return Ok(all_agents());
    }

    let mut agents = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        match create_agent(name) {
            Ok(agent) => agents.push(agent),
            Err(e) => tracing::warn!("Skipping agent: {}", e),
        }
    }

    if agents.len() < 2 {
        anyhow::bail!(
            "Need at least two known agents for a tournament, got {} (see `dilemma list`)",
            agents.len()
        );
    }

    Ok(agents)
}

/// Play the tournament with an optional progress bar
fn execute(
    agents: &[Box<dyn Agent>],
    game: &GameConfig,
    config: &TournamentConfig,
    show_progress: bool,
) -> Result<TournamentResult> {
    let pair_count = agents.len() * (agents.len() - 1) / 2;
    let pb = if show_progress {
        progress_bar(pair_count)?
    } else {
        ProgressBar::hidden()
    };

    let result = run_tournament_with_callback(agents, game, config, |_: &SeriesResult| pb.inc(1))
        .context("Tournament failed")?;

    pb.finish_and_clear();
    Ok(result)
}

/// Render, print, and optionally save the report
fn report_results(result: &TournamentResult, args: &TournamentArgs) -> Result<()> {
    let now = Local::now();
    let format = Format::from_json_flag(args.json);
    let rendered = match format {
        Format::Json => render_json(result, now)?,
        Format::Text => render_text(result, now),
    };

    let output = if args.save {
        Some(report::default_results_path("tournament", format, now))
    } else {
        args.output.clone()
    };

    report::emit(&rendered, output.as_deref())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} pairs ({eta})")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

/// Render standings as JSON
fn render_json(result: &TournamentResult, now: DateTime<Local>) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonPair<'a> {
        a: &'a str,
        b: &'a str,
        contributions: &'a [i64],
        pair_contribution: f64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        generated_at: DateTime<Local>,
        payoffs: &'a GameConfig,
        rounds: usize,
        matches_per_pair: usize,
        seed: u64,
        pairs_played: usize,
        standings: &'a dilemma_tournament::Standings,
        pairs: Vec<JsonPair<'a>>,
    }

    let output = JsonOutput {
        generated_at: now,
        payoffs: &result.game,
        rounds: result.config.rounds,
        matches_per_pair: result.config.matches_per_pair,
        seed: result.config.base_seed(),
        pairs_played: result.pairs.len(),
        standings: &result.standings,
        pairs: result
            .pairs
            .iter()
            .map(|p| JsonPair {
                a: &p.name_a,
                b: &p.name_b,
                contributions: &p.contributions,
                pair_contribution: p.pair_contribution,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&output).context("Failed to serialize tournament results")
}

/// Render standings as text
fn render_text(result: &TournamentResult, now: DateTime<Local>) -> String {
    let game = &result.game;
    let mut lines = vec![
        "Tournament Results".to_string(),
        format!("Time: {}", report::display_time(now)),
        String::new(),
        "Game Parameters:".to_string(),
        format!("beat (defect vs cooperate): {}", game.beat()),
        format!("wwin (both cooperate): {}", game.wwin()),
        format!("llost (both defect): {}", game.llost()),
        format!("beaten (cooperate vs defect): {}", game.beaten()),
        String::new(),
        format!("Rounds per match: {}", result.config.rounds),
        format!("Matches per pair: {}", result.config.matches_per_pair),
        format!("Seed: {}", result.config.base_seed()),
        String::new(),
        "Final Rankings:".to_string(),
    ];

    lines.extend(result.standings.iter().map(standing_line));
    lines.join("\n")
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn standing_line(standing: &dilemma_tournament::Standing) -> String {
    format!("{}. {}: {:.2}", standing.rank, standing.name, standing.score)
}

// ============================================================================
// TESTS
// ============================================================================
