//! Agent trait and helpers shared by the strategies

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::game::Choice;

/// Seed used by probabilistic agents until they are reseeded
pub const DEFAULT_SEED: u64 = 42;

/// A decision-making participant in a match
///
/// `decide` sees only the two past-choice histories, each from the agent's
/// own perspective. Any memory an agent keeps between calls is derived from
/// those histories and must be cleared by `reset`.
pub trait Agent: Send {
    /// Display name of this agent instance
    fn name(&self) -> &str;

    /// Rename this instance (used to disambiguate duplicate entrants)
    fn set_name(&mut self, name: String);

    /// Choose the next move given both histories so far
    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice;

    /// Clear all strategy state so the next match starts fresh
    fn reset(&mut self) {}

    /// Replace the random stream; no-op for deterministic agents
    fn reseed(&mut self, _seed: u64) {}

    /// Clone into a new boxed instance
    fn clone_box(&self) -> Box<dyn Agent>;
}

impl Clone for Box<dyn Agent> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent").field("name", &self.name()).finish()
    }
}

/// Implements the name plumbing and `clone_box` for a `Clone` agent
/// with a `name: String` field
macro_rules! agent_boilerplate {
    () => {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_name(&mut self, name: String) {
            self.name = name;
        }

        fn clone_box(&self) -> Box<dyn $crate::agent::Agent> {
            Box::new(self.clone())
        }
    };
}

pub(crate) use agent_boilerplate;

// ============================================================================
// HISTORY UTILITIES
// ============================================================================

/// Opponent's previous move, or cooperate on the first round
pub fn mirror_last(opponent: &[Choice]) -> Choice {
    opponent.last().copied().unwrap_or(Choice::Cooperate)
}

/// Number of cooperations in a history slice
pub fn count_cooperations(history: &[Choice]) -> usize {
    history.iter().filter(|c| c.is_cooperate()).count()
}

/// Number of defections in a history slice
pub fn count_defections(history: &[Choice]) -> usize {
    history.iter().filter(|c| c.is_defect()).count()
}

/// The last `n` entries of a history (fewer if it is shorter)
pub fn tail(history: &[Choice], n: usize) -> &[Choice] {
    &history[history.len().saturating_sub(n)..]
}

/// Whether the previous round paid at least the mutual-cooperation reward
///
/// Under `beat > wwin > llost > beaten` that is exactly the rounds in which
/// the opponent cooperated.
pub fn won_last_round(opponent: &[Choice]) -> bool {
    opponent.last().is_some_and(|c| c.is_cooperate())
}

// ============================================================================
// RANDOMNESS
// ============================================================================

/// Seeded random source owned by a probabilistic agent
#[derive(Clone, Debug)]
pub struct AgentRng {
    rng: ChaCha8Rng,
}

impl AgentRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Uniform sample in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Cooperate with probability `p`, clamped into `[0, 1]`
    pub fn cooperate_with(&mut self, p: f64) -> Choice {
        if self.unit() < p.clamp(0.0, 1.0) {
            Choice::Cooperate
        } else {
            Choice::Defect
        }
    }

    /// Defect with probability `p`, clamped into `[0, 1]`
    pub fn defect_with(&mut self, p: f64) -> Choice {
        if self.unit() < p.clamp(0.0, 1.0) {
            Choice::Defect
        } else {
            Choice::Cooperate
        }
    }
}

impl Default for AgentRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Choice::{Cooperate as C, Defect as D};

    #[test]
    fn test_mirror_last() {
        assert_eq!(mirror_last(&[]), C);
        assert_eq!(mirror_last(&[C, D]), D);
    }

    #[test]
    fn test_counts_and_tail() {
        let history = [C, D, D, C, D];
        assert_eq!(count_cooperations(&history), 2);
        assert_eq!(count_defections(&history), 3);
        assert_eq!(tail(&history, 2), &[C, D]);
        assert_eq!(tail(&history, 10).len(), 5);
    }

    #[test]
    fn test_won_last_round() {
        assert!(!won_last_round(&[]));
        assert!(won_last_round(&[D, C]));
        assert!(!won_last_round(&[C, D]));
    }

    #[test]
    fn test_agent_rng_reseed_reproduces_stream() {
        let mut a = AgentRng::new(7);
        let first: Vec<f64> = (0..5).map(|_| a.unit()).collect();
        a.reseed(7);
        let second: Vec<f64> = (0..5).map(|_| a.unit()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_agent_rng_probability_bounds() {
        let mut rng = AgentRng::new(1);
        for _ in 0..100 {
            assert_eq!(rng.cooperate_with(1.5), C);
            assert_eq!(rng.cooperate_with(-0.5), D);
            assert_eq!(rng.defect_with(1.0), D);
            assert_eq!(rng.defect_with(0.0), C);
        }
    }
}
