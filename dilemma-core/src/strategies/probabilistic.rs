//! Probabilistic strategies
//!
//! Each agent maps a summary statistic of the history (recent cooperation,
//! trust, drift) to a cooperation probability and samples from its own
//! seeded random stream. `reset` clears the statistic but keeps the stream;
//! `reseed` replaces it.

use crate::agent::{
    agent_boilerplate, count_cooperations, mirror_last, tail, Agent, AgentRng, DEFAULT_SEED,
};
use crate::game::Choice;

/// Probability band `floor..=floor + span` scaled by a cooperation ratio
fn scaled_probability(cooperations: usize, window: usize, floor: f64, span: f64) -> f64 {
    if window == 0 {
        return floor;
    }
    floor + (cooperations as f64 / window as f64) * span
}

// ============================================================================
// RANDOM
// ============================================================================

/// Cooperate or defect with equal probability
#[derive(Clone, Debug)]
pub struct RandomChoice {
    name: String,
    rng: AgentRng,
}

impl RandomChoice {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "random".to_string(),
            rng: AgentRng::new(seed),
        }
    }
}

impl Default for RandomChoice {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomChoice {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], _opponent: &[Choice]) -> Choice {
        self.rng.cooperate_with(0.5)
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

// ============================================================================
// DRIFTING RATES
// ============================================================================

/// Creep the defection rate up while the opponent cooperates, cut it
/// sharply when they defect
#[derive(Clone, Debug)]
pub struct Inching {
    name: String,
    defect_rate: f64,
    rng: AgentRng,
}

impl Inching {
    const STEP_UP: f64 = 0.05;
    const STEP_DOWN: f64 = 0.2;
    const MAX_RATE: f64 = 0.7;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "inching".to_string(),
            defect_rate: 0.0,
            rng: AgentRng::new(seed),
        }
    }

    pub fn defect_rate(&self) -> f64 {
        self.defect_rate
    }
}

impl Default for Inching {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Inching {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        let Some(&last) = opponent.last() else {
            return Choice::Cooperate;
        };

        self.defect_rate = match last {
            Choice::Cooperate => (self.defect_rate + Self::STEP_UP).min(Self::MAX_RATE),
            Choice::Defect => (self.defect_rate - Self::STEP_DOWN).max(0.0),
        };

        self.rng.defect_with(self.defect_rate)
    }

    fn reset(&mut self) {
        self.defect_rate = 0.0;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

/// Cooperate for three rounds, then cooperate with probability equal to a
/// trust level that drops on defection and recovers on cooperation
#[derive(Clone, Debug)]
pub struct TrustBuilding {
    name: String,
    trust: f64,
    rng: AgentRng,
}

impl TrustBuilding {
    const WARMUP: usize = 3;
    const BETRAYAL_PENALTY: f64 = 0.3;
    const FORGIVENESS: f64 = 0.1;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "trust-building".to_string(),
            trust: 1.0,
            rng: AgentRng::new(seed),
        }
    }

    pub fn trust(&self) -> f64 {
        self.trust
    }
}

impl Default for TrustBuilding {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for TrustBuilding {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.len() < Self::WARMUP {
            return Choice::Cooperate;
        }

        self.trust = if mirror_last(opponent).is_defect() {
            (self.trust - Self::BETRAYAL_PENALTY).max(0.0)
        } else {
            (self.trust + Self::FORGIVENESS).min(1.0)
        };

        self.rng.cooperate_with(self.trust)
    }

    fn reset(&mut self) {
        self.trust = 1.0;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

/// Tit-for-tat whose willingness to copy a cooperation decays by 1% per
/// round down to 50%
#[derive(Clone, Debug)]
pub struct Probe {
    name: String,
    cooperation_prob: f64,
    rounds: u32,
    rng: AgentRng,
}

impl Probe {
    const DECAY: f64 = 0.01;
    const FLOOR: f64 = 0.5;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "probe".to_string(),
            cooperation_prob: 1.0,
            rounds: 0,
            rng: AgentRng::new(seed),
        }
    }

    pub fn cooperation_prob(&self) -> f64 {
        self.cooperation_prob
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Probe {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        let Some(&mirrored) = opponent.last() else {
            return Choice::Cooperate;
        };

        self.rounds += 1;
        if self.cooperation_prob > Self::FLOOR {
            self.cooperation_prob = (1.0 - Self::DECAY * self.rounds as f64).max(Self::FLOOR);
        }

        if mirrored.is_cooperate() && self.rng.unit() > self.cooperation_prob {
            return Choice::Defect;
        }
        mirrored
    }

    fn reset(&mut self) {
        self.cooperation_prob = 1.0;
        self.rounds = 0;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

// ============================================================================
// ONE-STEP RESPONSES
// ============================================================================

/// Cooperate after matching moves; after mismatched moves cooperate with
/// probability 2/7
#[derive(Clone, Debug)]
pub struct Consensus {
    name: String,
    rng: AgentRng,
}

impl Consensus {
    const MISMATCH_COOPERATION: f64 = 2.0 / 7.0;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "consensus".to_string(),
            rng: AgentRng::new(seed),
        }
    }
}

impl Default for Consensus {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Consensus {
    agent_boilerplate!();

    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice {
        match (own.last(), opponent.last()) {
            (Some(mine), Some(theirs)) if mine != theirs => {
                self.rng.cooperate_with(Self::MISMATCH_COOPERATION)
            }
            _ => Choice::Cooperate,
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

/// Answer cooperation with 90% cooperation, defection with defection
#[derive(Clone, Debug)]
pub struct Capped {
    name: String,
    rng: AgentRng,
}

impl Capped {
    const CAP: f64 = 0.9;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "capped".to_string(),
            rng: AgentRng::new(seed),
        }
    }
}

impl Default for Capped {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Capped {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        match opponent.last() {
            None => Choice::Cooperate,
            Some(Choice::Cooperate) => self.rng.cooperate_with(Self::CAP),
            Some(Choice::Defect) => Choice::Defect,
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

// ============================================================================
// MEMORY WINDOWS
// ============================================================================

const INITIAL_COOPERATION: f64 = 0.7;

/// Cooperation probability from the opponent's last 3 moves, in 0.3..=0.7
#[derive(Clone, Debug)]
pub struct ShortMemory {
    name: String,
    cooperation_prob: f64,
    rng: AgentRng,
}

impl ShortMemory {
    const WINDOW: usize = 3;
    const FLOOR: f64 = 0.3;
    const SPAN: f64 = 0.4;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "short-memory".to_string(),
            cooperation_prob: INITIAL_COOPERATION,
            rng: AgentRng::new(seed),
        }
    }

    pub fn cooperation_prob(&self) -> f64 {
        self.cooperation_prob
    }
}

impl Default for ShortMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for ShortMemory {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.len() >= Self::WINDOW {
            let recent = tail(opponent, Self::WINDOW);
            self.cooperation_prob = scaled_probability(
                count_cooperations(recent),
                Self::WINDOW,
                Self::FLOOR,
                Self::SPAN,
            );
        }
        self.rng.cooperate_with(self.cooperation_prob)
    }

    fn reset(&mut self) {
        self.cooperation_prob = INITIAL_COOPERATION;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

/// Cooperation probability from up to the last 15 moves, in 0.2..=0.8
#[derive(Clone, Debug)]
pub struct MediumMemory {
    name: String,
    cooperation_prob: f64,
    rng: AgentRng,
}

impl MediumMemory {
    pub const WINDOW: usize = 15;
    const FLOOR: f64 = 0.2;
    const SPAN: f64 = 0.6;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "medium-memory".to_string(),
            cooperation_prob: INITIAL_COOPERATION,
            rng: AgentRng::new(seed),
        }
    }

    pub fn cooperation_prob(&self) -> f64 {
        self.cooperation_prob
    }

    /// Probability implied by the recent window, or `None` before any history
    fn windowed_probability(opponent: &[Choice]) -> Option<f64> {
        if opponent.is_empty() {
            return None;
        }
        let recent = tail(opponent, Self::WINDOW);
        Some(scaled_probability(
            count_cooperations(recent),
            recent.len(),
            Self::FLOOR,
            Self::SPAN,
        ))
    }
}

impl Default for MediumMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for MediumMemory {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if let Some(p) = Self::windowed_probability(opponent) {
            self.cooperation_prob = p;
        }
        self.rng.cooperate_with(self.cooperation_prob)
    }

    fn reset(&mut self) {
        self.cooperation_prob = INITIAL_COOPERATION;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

/// Cooperation probability from the whole history, in 0.2..=0.8
#[derive(Clone, Debug)]
pub struct LongMemory {
    name: String,
    cooperation_prob: f64,
    rng: AgentRng,
}

impl LongMemory {
    const FLOOR: f64 = 0.2;
    const SPAN: f64 = 0.6;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "long-memory".to_string(),
            cooperation_prob: INITIAL_COOPERATION,
            rng: AgentRng::new(seed),
        }
    }

    pub fn cooperation_prob(&self) -> f64 {
        self.cooperation_prob
    }
}

impl Default for LongMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for LongMemory {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if !opponent.is_empty() {
            self.cooperation_prob = scaled_probability(
                count_cooperations(opponent),
                opponent.len(),
                Self::FLOOR,
                Self::SPAN,
            );
        }
        self.rng.cooperate_with(self.cooperation_prob)
    }

    fn reset(&mut self) {
        self.cooperation_prob = INITIAL_COOPERATION;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

/// Tit-for-tat for the first five rounds, medium memory afterwards
#[derive(Clone, Debug)]
pub struct TitForTatThenMediumMemory {
    name: String,
    cooperation_prob: f64,
    rng: AgentRng,
}

impl TitForTatThenMediumMemory {
    const OPENING: usize = 5;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "tit-for-tat-then-medium-memory".to_string(),
            cooperation_prob: INITIAL_COOPERATION,
            rng: AgentRng::new(seed),
        }
    }
}

impl Default for TitForTatThenMediumMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for TitForTatThenMediumMemory {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.len() < Self::OPENING {
            return mirror_last(opponent);
        }
        if let Some(p) = MediumMemory::windowed_probability(opponent) {
            self.cooperation_prob = p;
        }
        self.rng.cooperate_with(self.cooperation_prob)
    }

    fn reset(&mut self) {
        self.cooperation_prob = INITIAL_COOPERATION;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}
