//! Escalation and de-escalation strategies
//!
//! Each agent keeps a punishment counter that grows with the opponent's
//! defections and is spent (or decays) as consecutive defections are issued.

use crate::agent::{agent_boilerplate, Agent, AgentRng, DEFAULT_SEED};
use crate::game::Choice;

/// Opponent defected last round while we cooperated
fn betrayed(own: &[Choice], opponent: &[Choice]) -> bool {
    opponent.last() == Some(&Choice::Defect) && own.last() == Some(&Choice::Cooperate)
}

/// Answer the n-th betrayal with n consecutive defections
#[derive(Clone, Debug)]
pub struct Gradual {
    name: String,
    revenge: u32,
    betrayals: u32,
}

impl Gradual {
    pub fn new() -> Self {
        Self {
            name: "gradual".to_string(),
            revenge: 0,
            betrayals: 0,
        }
    }

    pub fn betrayals(&self) -> u32 {
        self.betrayals
    }
}

impl Default for Gradual {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Gradual {
    agent_boilerplate!();

    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice {
        if betrayed(own, opponent) {
            self.betrayals += 1;
            self.revenge = self.betrayals;
        }

        if self.revenge > 0 {
            self.revenge -= 1;
            Choice::Defect
        } else {
            Choice::Cooperate
        }
    }

    fn reset(&mut self) {
        self.revenge = 0;
        self.betrayals = 0;
    }
}

/// Reward cooperation, punish defection; the punishment counter rises by 2
/// per defection (capped at 5) and decays by 1 per cooperation
#[derive(Clone, Debug)]
pub struct RewardPunishment {
    name: String,
    punishment: u32,
}

impl RewardPunishment {
    const RAISE: u32 = 2;
    const CAP: u32 = 5;

    pub fn new() -> Self {
        Self {
            name: "reward-punishment".to_string(),
            punishment: 0,
        }
    }

    pub fn punishment(&self) -> u32 {
        self.punishment
    }
}

impl Default for RewardPunishment {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RewardPunishment {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        match opponent.last() {
            None => Choice::Cooperate,
            Some(Choice::Cooperate) => {
                self.punishment = self.punishment.saturating_sub(1);
                Choice::Cooperate
            }
            Some(Choice::Defect) => {
                self.punishment = (self.punishment + Self::RAISE).min(Self::CAP);
                Choice::Defect
            }
        }
    }

    fn reset(&mut self) {
        self.punishment = 0;
    }
}

/// Tit-for-tat whose retaliation streak lengthens with the opponent's
/// total defections (one extra round per two defections, at most five)
#[derive(Clone, Debug)]
pub struct PunishmentEscalation {
    name: String,
    defections_seen: u32,
    streak: u32,
}

impl PunishmentEscalation {
    const MAX_STREAK: u32 = 5;

    pub fn new() -> Self {
        Self {
            name: "punishment-escalation".to_string(),
            defections_seen: 0,
            streak: 0,
        }
    }
}

impl Default for PunishmentEscalation {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for PunishmentEscalation {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.is_empty() {
            return Choice::Cooperate;
        }

        if self.streak > 0 {
            self.streak -= 1;
            return Choice::Defect;
        }

        if opponent.last() == Some(&Choice::Defect) {
            self.defections_seen += 1;
            self.streak = (self.defections_seen / 2).min(Self::MAX_STREAK);
            return Choice::Defect;
        }

        Choice::Cooperate
    }

    fn reset(&mut self) {
        self.defections_seen = 0;
        self.streak = 0;
    }
}

/// Punishment length scales with the opponent's defection rate:
/// 3 rounds above 50%, 2 above 30%, otherwise 1
#[derive(Clone, Debug)]
pub struct AdaptivePunishment {
    name: String,
    level: u32,
    defections_seen: u32,
    rounds: u32,
    streak: u32,
}

impl AdaptivePunishment {
    pub fn new() -> Self {
        Self {
            name: "adaptive-punishment".to_string(),
            level: 1,
            defections_seen: 0,
            rounds: 0,
            streak: 0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    fn level_for(defect_rate: f64) -> u32 {
        if defect_rate > 0.5 {
            3
        } else if defect_rate > 0.3 {
            2
        } else {
            1
        }
    }
}

impl Default for AdaptivePunishment {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for AdaptivePunishment {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.is_empty() {
            return Choice::Cooperate;
        }

        self.rounds += 1;

        if self.streak > 0 {
            self.streak -= 1;
            return Choice::Defect;
        }

        if opponent.last() == Some(&Choice::Defect) {
            self.defections_seen += 1;
            let defect_rate = self.defections_seen as f64 / self.rounds as f64;
            self.level = Self::level_for(defect_rate);
            self.streak = self.level;
            return Choice::Defect;
        }

        Choice::Cooperate
    }

    fn reset(&mut self) {
        self.level = 1;
        self.defections_seen = 0;
        self.rounds = 0;
        self.streak = 0;
    }
}

/// Punish a betrayal with two defections, then forgive gradually: inside
/// the five-round forgiveness window cooperation probability grows by 0.1
/// per quiet round from 0.5 up to 0.9
#[derive(Clone, Debug)]
pub struct GradualForgiving {
    name: String,
    revenge: u32,
    forgiveness_window: u32,
    rounds_since_defect: u32,
    rng: AgentRng,
}

impl GradualForgiving {
    const REVENGE: u32 = 2;
    const WINDOW: u32 = 5;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "gradual-forgiving".to_string(),
            revenge: 0,
            forgiveness_window: 0,
            rounds_since_defect: 0,
            rng: AgentRng::new(seed),
        }
    }
}

impl Default for GradualForgiving {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for GradualForgiving {
    agent_boilerplate!();

    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice {
        let Some(&theirs) = opponent.last() else {
            return Choice::Cooperate;
        };

        if theirs.is_defect() {
            self.rounds_since_defect = 0;
        } else {
            self.rounds_since_defect += 1;
        }

        if betrayed(own, opponent) {
            self.revenge = Self::REVENGE;
            self.forgiveness_window = Self::WINDOW;
        }

        if self.revenge > 0 {
            self.revenge -= 1;
            return Choice::Defect;
        }

        if self.rounds_since_defect >= self.forgiveness_window {
            self.forgiveness_window = 0;
            return Choice::Cooperate;
        }

        let p = (0.5 + self.rounds_since_defect as f64 * 0.1).min(0.9);
        self.rng.cooperate_with(p)
    }

    fn reset(&mut self) {
        self.revenge = 0;
        self.forgiveness_window = 0;
        self.rounds_since_defect = 0;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}
