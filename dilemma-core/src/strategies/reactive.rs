//! Reactive-memory strategies
//!
//! Deterministic agents whose choice is a count or threshold over a window
//! of the opponent's history.

use crate::agent::{
    agent_boilerplate, count_cooperations, count_defections, mirror_last, tail, Agent,
};
use crate::game::Choice;

/// Cooperate first, then copy the opponent's previous move
#[derive(Clone, Debug)]
pub struct TitForTat {
    name: String,
}

impl TitForTat {
    pub fn new() -> Self {
        Self {
            name: "tit-for-tat".to_string(),
        }
    }
}

impl Default for TitForTat {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for TitForTat {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        mirror_last(opponent)
    }
}

/// Always defect
#[derive(Clone, Debug)]
pub struct AlwaysDefect {
    name: String,
}

impl AlwaysDefect {
    pub fn new() -> Self {
        Self {
            name: "always-defect".to_string(),
        }
    }
}

impl Default for AlwaysDefect {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for AlwaysDefect {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], _opponent: &[Choice]) -> Choice {
        Choice::Defect
    }
}

/// Always cooperate
#[derive(Clone, Debug)]
pub struct AlwaysCooperate {
    name: String,
}

impl AlwaysCooperate {
    pub fn new() -> Self {
        Self {
            name: "always-cooperate".to_string(),
        }
    }
}

impl Default for AlwaysCooperate {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for AlwaysCooperate {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], _opponent: &[Choice]) -> Choice {
        Choice::Cooperate
    }
}

/// Defect only when at least 2 of the opponent's last 3 moves were defections
#[derive(Clone, Debug)]
pub struct ForgivingTitForTat {
    name: String,
}

impl ForgivingTitForTat {
    const WINDOW: usize = 3;
    const THRESHOLD: usize = 2;

    pub fn new() -> Self {
        Self {
            name: "forgiving-tit-for-tat".to_string(),
        }
    }
}

impl Default for ForgivingTitForTat {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for ForgivingTitForTat {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.len() < Self::WINDOW {
            return Choice::Cooperate;
        }
        if count_defections(tail(opponent, Self::WINDOW)) >= Self::THRESHOLD {
            Choice::Defect
        } else {
            Choice::Cooperate
        }
    }
}

/// Cooperate until the opponent defects once, then defect forever
#[derive(Clone, Debug)]
pub struct Grudge {
    name: String,
    grudge: bool,
}

impl Grudge {
    pub fn new() -> Self {
        Self {
            name: "grudge".to_string(),
            grudge: false,
        }
    }

    /// Whether the opponent has been caught defecting this match
    pub fn holds_grudge(&self) -> bool {
        self.grudge
    }
}

impl Default for Grudge {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Grudge {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.iter().any(|c| c.is_defect()) {
            self.grudge = true;
        }
        if self.grudge {
            Choice::Defect
        } else {
            Choice::Cooperate
        }
    }

    fn reset(&mut self) {
        self.grudge = false;
    }
}

/// Follow the opponent's overall cooperation rate: cooperate above 70%,
/// defect below 30%, tit-for-tat in between
#[derive(Clone, Debug)]
pub struct Adaptive {
    name: String,
    cooperation_rate: f64,
}

impl Adaptive {
    const HIGH: f64 = 0.7;
    const LOW: f64 = 0.3;

    pub fn new() -> Self {
        Self {
            name: "adaptive".to_string(),
            cooperation_rate: 0.0,
        }
    }

    pub fn cooperation_rate(&self) -> f64 {
        self.cooperation_rate
    }
}

impl Default for Adaptive {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Adaptive {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.is_empty() {
            return Choice::Cooperate;
        }

        self.cooperation_rate = count_cooperations(opponent) as f64 / opponent.len() as f64;

        if self.cooperation_rate >= Self::HIGH {
            Choice::Cooperate
        } else if self.cooperation_rate <= Self::LOW {
            Choice::Defect
        } else {
            mirror_last(opponent)
        }
    }

    fn reset(&mut self) {
        self.cooperation_rate = 0.0;
    }
}

/// Fixed three-step cycle driven by an internal counter: cooperate,
/// defect, cooperate, repeat
#[derive(Clone, Debug)]
pub struct TwoCooperateOneDefect {
    name: String,
    counter: u8,
}

impl TwoCooperateOneDefect {
    pub fn new() -> Self {
        Self {
            name: "two-cooperate-one-defect".to_string(),
            counter: 0,
        }
    }
}

impl Default for TwoCooperateOneDefect {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for TwoCooperateOneDefect {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], _opponent: &[Choice]) -> Choice {
        self.counter = (self.counter + 1) % 3;
        if self.counter < 2 {
            Choice::Cooperate
        } else {
            Choice::Defect
        }
    }

    fn reset(&mut self) {
        self.counter = 0;
    }
}
