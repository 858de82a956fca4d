//! Choices, payoff configuration and round records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DilemmaError, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default payoff for defecting against a cooperator
pub const DEFAULT_BEAT: i64 = 5;
/// Default payoff for mutual cooperation
pub const DEFAULT_WWIN: i64 = 3;
/// Default payoff for mutual defection
pub const DEFAULT_LLOST: i64 = 1;
/// Default payoff for cooperating against a defector
pub const DEFAULT_BEATEN: i64 = 0;

/// Score type used for payoffs and match totals
pub type Score = i64;

// ============================================================================
// CORE TYPES
// ============================================================================

/// One of the two admissible moves in a round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Defect,
    Cooperate,
}

impl Choice {
    pub fn flip(self) -> Self {
        match self {
            Choice::Defect => Choice::Cooperate,
            Choice::Cooperate => Choice::Defect,
        }
    }

    pub fn is_defect(self) -> bool {
        self == Choice::Defect
    }

    pub fn is_cooperate(self) -> bool {
        self == Choice::Cooperate
    }

    /// Single-letter form used in compact history strings
    pub fn as_char(self) -> char {
        match self {
            Choice::Defect => 'D',
            Choice::Cooperate => 'C',
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Defect => write!(f, "defect"),
            Choice::Cooperate => write!(f, "cooperate"),
        }
    }
}

impl FromStr for Choice {
    type Err = DilemmaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "defect" | "beat" | "d" => Ok(Choice::Defect),
            "cooperate" | "still" | "c" => Ok(Choice::Cooperate),
            _ => Err(DilemmaError::InvalidChoice(s.to_string())),
        }
    }
}

/// Render a history as a compact string such as `CCDC`
pub fn history_string(history: &[Choice]) -> String {
    history.iter().map(|c| c.as_char()).collect()
}

/// Payoff quadruple for one run
///
/// The ordering `beat > wwin > llost > beaten` is checked on construction
/// and on deserialization, so every value of this type is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    beat: Score,
    wwin: Score,
    llost: Score,
    beaten: Score,
}

#[derive(Deserialize)]
struct RawGameConfig {
    beat: Score,
    wwin: Score,
    llost: Score,
    beaten: Score,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = DilemmaError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        GameConfig::new(raw.beat, raw.wwin, raw.llost, raw.beaten)
    }
}

impl GameConfig {
    /// Create a payoff configuration, rejecting any quadruple that breaks
    /// `beat > wwin > llost > beaten`
    pub fn new(beat: Score, wwin: Score, llost: Score, beaten: Score) -> Result<Self> {
        if !(beat > wwin && wwin > llost && llost > beaten) {
            return Err(DilemmaError::InvalidPayoffs {
                beat,
                wwin,
                llost,
                beaten,
            });
        }
        Ok(Self {
            beat,
            wwin,
            llost,
            beaten,
        })
    }

    pub fn beat(&self) -> Score {
        self.beat
    }

    pub fn wwin(&self) -> Score {
        self.wwin
    }

    pub fn llost(&self) -> Score {
        self.llost
    }

    pub fn beaten(&self) -> Score {
        self.beaten
    }

    /// Payoffs `(a, b)` for a joint choice
    pub fn payoff(&self, a: Choice, b: Choice) -> (Score, Score) {
        match (a, b) {
            (Choice::Defect, Choice::Defect) => (self.llost, self.llost),
            (Choice::Cooperate, Choice::Cooperate) => (self.wwin, self.wwin),
            (Choice::Defect, Choice::Cooperate) => (self.beat, self.beaten),
            (Choice::Cooperate, Choice::Defect) => (self.beaten, self.beat),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            beat: DEFAULT_BEAT,
            wwin: DEFAULT_WWIN,
            llost: DEFAULT_LLOST,
            beaten: DEFAULT_BEATEN,
        }
    }
}

impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "beat={} wwin={} llost={} beaten={}",
            self.beat, self.wwin, self.llost, self.beaten
        )
    }
}

/// Both choices of one round and the payoffs they earned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub choice_a: Choice,
    pub choice_b: Choice,
    pub payoff_a: Score,
    pub payoff_b: Score,
}

impl RoundRecord {
    pub fn new(config: &GameConfig, choice_a: Choice, choice_b: Choice) -> Self {
        let (payoff_a, payoff_b) = config.payoff(choice_a, choice_b);
        Self {
            choice_a,
            choice_b,
            payoff_a,
            payoff_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(GameConfig::new(5, 3, 1, 0).unwrap(), config);
    }

    #[test]
    fn test_invalid_orderings_rejected() {
        assert!(GameConfig::new(3, 5, 1, 0).is_err());
        assert!(GameConfig::new(5, 3, 1, 1).is_err());
        assert!(GameConfig::new(5, 5, 1, 0).is_err());
        assert!(GameConfig::new(0, 1, 3, 5).is_err());

        let err = GameConfig::new(5, 1, 3, 0).unwrap_err();
        assert!(matches!(err, DilemmaError::InvalidPayoffs { beat: 5, .. }));
    }

    #[test]
    fn test_negative_payoffs_allowed() {
        let config = GameConfig::new(5, 3, 1, -2).unwrap();
        assert_eq!(config.payoff(Choice::Cooperate, Choice::Defect), (-2, 5));
    }

    #[test]
    fn test_payoff_matrix() {
        let config = GameConfig::default();
        assert_eq!(config.payoff(Choice::Defect, Choice::Defect), (1, 1));
        assert_eq!(config.payoff(Choice::Cooperate, Choice::Cooperate), (3, 3));
        assert_eq!(config.payoff(Choice::Defect, Choice::Cooperate), (5, 0));
        assert_eq!(config.payoff(Choice::Cooperate, Choice::Defect), (0, 5));
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("beat".parse::<Choice>().unwrap(), Choice::Defect);
        assert_eq!("Still".parse::<Choice>().unwrap(), Choice::Cooperate);
        assert_eq!(" D ".parse::<Choice>().unwrap(), Choice::Defect);
        assert_eq!("cooperate".parse::<Choice>().unwrap(), Choice::Cooperate);
        assert!(matches!(
            "maybe".parse::<Choice>(),
            Err(DilemmaError::InvalidChoice(_))
        ));
    }

    #[test]
    fn test_choice_flip_and_history_string() {
        assert_eq!(Choice::Defect.flip(), Choice::Cooperate);
        assert_eq!(Choice::Cooperate.flip(), Choice::Defect);
        let history = [Choice::Cooperate, Choice::Cooperate, Choice::Defect];
        assert_eq!(history_string(&history), "CCD");
    }

    #[test]
    fn test_config_deserialize_validates() {
        let ok: GameConfig =
            serde_json::from_str(r#"{"beat":4,"wwin":3,"llost":2,"beaten":1}"#).unwrap();
        assert_eq!(ok.beat(), 4);

        let bad = serde_json::from_str::<GameConfig>(r#"{"beat":1,"wwin":3,"llost":2,"beaten":1}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_round_record_uses_payoffs() {
        let config = GameConfig::default();
        let record = RoundRecord::new(&config, Choice::Defect, Choice::Cooperate);
        assert_eq!(record.payoff_a, 5);
        assert_eq!(record.payoff_b, 0);
    }

    fn any_choice() -> impl Strategy<Value = Choice> {
        prop_oneof![Just(Choice::Defect), Just(Choice::Cooperate)]
    }

    proptest! {
        #[test]
        fn prop_payoff_is_symmetric(a in any_choice(), b in any_choice()) {
            let config = GameConfig::default();
            let (ab_a, ab_b) = config.payoff(a, b);
            let (ba_b, ba_a) = config.payoff(b, a);
            prop_assert_eq!((ab_a, ab_b), (ba_a, ba_b));
        }

        #[test]
        fn prop_construction_matches_ordering(
            beat in -20i64..20,
            wwin in -20i64..20,
            llost in -20i64..20,
            beaten in -20i64..20,
        ) {
            let ordered = beat > wwin && wwin > llost && llost > beaten;
            prop_assert_eq!(GameConfig::new(beat, wwin, llost, beaten).is_ok(), ordered);
        }
    }
}
