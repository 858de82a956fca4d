//! Dilemma Tournament - Matches, series and round-robin ranking
//!
//! This crate provides tournament infrastructure:
//! - Match play between two agents
//! - Repeated-match series with deterministic per-match seeding
//! - Round-robin tournaments with min-of-match scoring
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_tournament (orchestration)
//! - Level 2: play_series, play_match (phases)
//! - Level 3: pairings, standings (steps)
//! - Level 4: utilities, configuration

mod config;
mod match_play;
mod tournament;

pub use config::{derive_seed, Side, TournamentConfig, DEFAULT_MATCHES_PER_PAIR, DEFAULT_ROUNDS};
pub use match_play::{play_match, play_series, MatchOutcome, MatchResult, SeriesResult, WinCounts};
pub use tournament::{
    generate_round_robin_pairings, run_tournament, run_tournament_with_callback, Standing,
    Standings, TournamentResult,
};
