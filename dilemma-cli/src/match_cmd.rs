//! Match command - play a series between two strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_agents(), play(), report_results()
//! - Level 3: render_text(), render_json()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Args;

use dilemma_core::{create_agent, history_string, Agent, GameConfig};
use dilemma_tournament::{play_series, SeriesResult, TournamentConfig};

use crate::report::{self, Format};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// First strategy (see `dilemma list`)
    #[arg(long, default_value = "tit-for-tat")]
    pub agent1: String,

    /// Second strategy
    #[arg(long, default_value = "random")]
    pub agent2: String,

    /// Include each match's move history in the text report
    #[arg(long)]
    pub histories: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the report to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve both strategies by name
/// 2. Play the series
/// 3. Report results
pub fn run(args: MatchArgs, game: &GameConfig, config: &TournamentConfig) -> Result<()> {
    let (mut a, mut b) = load_agents(&args)?;

    tracing::info!(
        "Starting match: {} vs {} ({} matches of {} rounds, {})",
        a.name(),
        b.name(),
        config.matches_per_pair,
        config.rounds,
        game
    );

    let series = play(a.as_mut(), b.as_mut(), game, config);

    report_results(&series, game, config, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Resolve both strategies; a repeated strategy gets a suffixed name
fn load_agents(args: &MatchArgs) -> Result<(Box<dyn Agent>, Box<dyn Agent>)> {
    let a = create_agent(&args.agent1)
        .with_context(|| format!("Failed to resolve agent1: {}", args.agent1))?;
    let mut b = create_agent(&args.agent2)
        .with_context(|| format!("Failed to resolve agent2: {}", args.agent2))?;

    if a.name() == b.name() {
        let renamed = format!("{}_1", b.name());
        b.set_name(renamed);
    }

    Ok((a, b))
}

/// Play the configured number of matches
fn play(
    a: &mut dyn Agent,
    b: &mut dyn Agent,
    game: &GameConfig,
    config: &TournamentConfig,
) -> SeriesResult {
    let series = play_series(a, b, game, config, (0, 1), 0);

    for (i, m) in series.matches.iter().enumerate() {
        tracing::info!("Match {}: {} - {}", i + 1, m.total_a, m.total_b);
    }

    series
}

/// Render and emit the report
fn report_results(
    series: &SeriesResult,
    game: &GameConfig,
    config: &TournamentConfig,
    args: &MatchArgs,
) -> Result<()> {
    let now = Local::now();
    let rendered = match Format::from_json_flag(args.json) {
        Format::Json => render_json(series, game, config, now)?,
        Format::Text => render_text(series, game, config, args.histories, now),
    };
    report::emit(&rendered, args.output.as_deref())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Render results as JSON
fn render_json(
    series: &SeriesResult,
    game: &GameConfig,
    config: &TournamentConfig,
    now: DateTime<Local>,
) -> Result<String> {
    #[derive(serde::Serialize)]
    struct JsonSide<'a> {
        name: &'a str,
        scores: Vec<i64>,
        mean: f64,
        min: i64,
        median: i64,
        wins: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        generated_at: DateTime<Local>,
        payoffs: &'a GameConfig,
        rounds: usize,
        matches: usize,
        seed: u64,
        a: JsonSide<'a>,
        b: JsonSide<'a>,
        draws: u32,
        contributions: &'a [i64],
        pair_contribution: f64,
    }

    let (mean_a, mean_b) = series.mean_scores();
    let (min_a, min_b) = series.min_scores();
    let (median_a, median_b) = series.median_scores();
    let wins = series.win_counts();

    let output = JsonOutput {
        generated_at: now,
        payoffs: game,
        rounds: config.rounds,
        matches: config.matches_per_pair,
        seed: config.base_seed(),
        a: JsonSide {
            name: &series.name_a,
            scores: series.scores_a(),
            mean: mean_a,
            min: min_a,
            median: median_a,
            wins: wins.a_wins,
        },
        b: JsonSide {
            name: &series.name_b,
            scores: series.scores_b(),
            mean: mean_b,
            min: min_b,
            median: median_b,
            wins: wins.b_wins,
        },
        draws: wins.draws,
        contributions: &series.contributions,
        pair_contribution: series.pair_contribution,
    };

    serde_json::to_string_pretty(&output).context("Failed to serialize match results")
}

/// Render results as text
fn render_text(
    series: &SeriesResult,
    game: &GameConfig,
    config: &TournamentConfig,
    histories: bool,
    now: DateTime<Local>,
) -> String {
    let (mean_a, mean_b) = series.mean_scores();
    let (min_a, min_b) = series.min_scores();
    let (median_a, median_b) = series.median_scores();
    let wins = series.win_counts();

    let mut lines = vec![
        "=== Match Results ===".to_string(),
        format!("Time:     {}", report::display_time(now)),
        format!("Payoffs:  {}", game),
        format!(
            "Matches:  {} x {} rounds (seed {})",
            config.matches_per_pair,
            config.rounds,
            config.base_seed()
        ),
        String::new(),
        side_line("A", &series.name_a, &series.scores_a(), mean_a, min_a, median_a),
        side_line("B", &series.name_b, &series.scores_b(), mean_b, min_b, median_b),
        format!(
            "Outcome:  A wins {}, B wins {}, draws {}",
            wins.a_wins, wins.b_wins, wins.draws
        ),
        format!("Pair contribution: {:.2}", series.pair_contribution),
    ];

    if histories {
        lines.push(String::new());
        for (i, m) in series.matches.iter().enumerate() {
            lines.push(format!("Match {}:", i + 1));
            lines.push(format!("  A {}", history_string(&m.history_a())));
            lines.push(format!("  B {}", history_string(&m.history_b())));
        }
    }

    lines.join("\n")
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn side_line(label: &str, name: &str, scores: &[i64], mean: f64, min: i64, median: i64) -> String {
    format!(
        "{} {}: scores {:?}, mean {:.2}, min {}, median {}",
        label, name, scores, mean, min, median
    )
}

// ============================================================================
// TESTS
// ============================================================================
