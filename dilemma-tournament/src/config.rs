//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use dilemma_core::{DilemmaError, Result, DEFAULT_SEED};
use serde::{Deserialize, Serialize};

/// Rounds in one match unless configured otherwise
pub const DEFAULT_ROUNDS: usize = 300;
/// Matches played per pair unless configured otherwise
pub const DEFAULT_MATCHES_PER_PAIR: usize = 3;

/// Which side of a pairing an agent plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// Tournament configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Rounds per match
    pub rounds: usize,
    /// Independent matches per pair; the pair score is their mean contribution
    pub matches_per_pair: usize,
    /// Whether to run pairs in parallel
    pub parallel: bool,
    /// Base seed for every agent's random stream (None = 42)
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            matches_per_pair: DEFAULT_MATCHES_PER_PAIR,
            parallel: true,
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Create config with the given match length and repetitions
    pub fn new(rounds: usize, matches_per_pair: usize) -> Self {
        Self {
            rounds,
            matches_per_pair,
            ..Default::default()
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run pairs one after another on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Seed the per-match seeds are derived from
    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Reject configurations that would play nothing
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(DilemmaError::InvalidRounds);
        }
        if self.matches_per_pair == 0 {
            return Err(DilemmaError::InvalidMatchCount);
        }
        Ok(())
    }
}

/// Seed for one agent in one match
///
/// Depends only on the pair's position in the pairing list, the match index
/// and the side, so results do not depend on which worker runs the pair.
pub fn derive_seed(base_seed: u64, pair: usize, match_index: usize, side: Side) -> u64 {
    const PAIR_STRIDE: u64 = 1_000_003;
    let side = match side {
        Side::A => 0,
        Side::B => 1,
    };
    base_seed
        .wrapping_add((pair as u64).wrapping_mul(PAIR_STRIDE))
        .wrapping_add((match_index as u64) * 2)
        .wrapping_add(side)
}
