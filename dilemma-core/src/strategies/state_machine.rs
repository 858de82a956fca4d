//! State-machine strategies
//!
//! Agents that move between "repeat" and "switch" (or probe / exploit)
//! states based on how the previous round went.

use crate::agent::{agent_boilerplate, won_last_round, Agent};
use crate::game::Choice;

/// Win-stay, lose-shift: keep the last move after a winning round
/// (own payoff at least `wwin`), flip it after a losing one
#[derive(Clone, Debug)]
pub struct WinStayLoseShift {
    name: String,
}

impl WinStayLoseShift {
    pub fn new() -> Self {
        Self {
            name: "win-stay-lose-shift".to_string(),
        }
    }
}

impl Default for WinStayLoseShift {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for WinStayLoseShift {
    agent_boilerplate!();

    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice {
        let Some(&last) = own.last() else {
            return Choice::Cooperate;
        };
        if won_last_round(opponent) {
            last
        } else {
            last.flip()
        }
    }
}

/// Pavlov: read the joint outcome of the previous round
///
/// Mutual cooperation and a successful defection are kept; being exploited
/// or mutual defection flips the move.
#[derive(Clone, Debug)]
pub struct Pavlov {
    name: String,
}

impl Pavlov {
    pub fn new() -> Self {
        Self {
            name: "pavlov".to_string(),
        }
    }
}

impl Default for Pavlov {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Pavlov {
    agent_boilerplate!();

    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice {
        match (own.last(), opponent.last()) {
            (Some(Choice::Cooperate), Some(Choice::Cooperate)) => Choice::Cooperate,
            (Some(Choice::Defect), Some(Choice::Cooperate)) => Choice::Defect,
            (Some(Choice::Cooperate), Some(Choice::Defect)) => Choice::Defect,
            (Some(Choice::Defect), Some(Choice::Defect)) => Choice::Cooperate,
            _ => Choice::Cooperate,
        }
    }
}

/// Mode of the escape-tiger state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeMode {
    /// Cooperating and counting mutual-cooperation streak
    Cooperating,
    /// Sent one probing defection, waiting to see the response
    Testing,
    /// Probe went unpunished; defecting until the opponent retaliates
    Exploiting,
}

/// After five rounds of mutual cooperation, defect once; if the opponent
/// does not retaliate, keep defecting until they do
#[derive(Clone, Debug)]
pub struct EscapeTiger {
    name: String,
    cooperation_streak: u32,
    mode: EscapeMode,
}

impl EscapeTiger {
    const PROBE_AFTER: u32 = 5;

    pub fn new() -> Self {
        Self {
            name: "escape-tiger".to_string(),
            cooperation_streak: 0,
            mode: EscapeMode::Cooperating,
        }
    }

    pub fn mode(&self) -> EscapeMode {
        self.mode
    }
}

impl Default for EscapeTiger {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for EscapeTiger {
    agent_boilerplate!();

    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice {
        let Some(&theirs) = opponent.last() else {
            return Choice::Cooperate;
        };

        let mutual_cooperation = own.last() == Some(&Choice::Cooperate) && theirs.is_cooperate();
        if mutual_cooperation {
            self.cooperation_streak += 1;
        } else {
            self.cooperation_streak = 0;
        }

        match self.mode {
            EscapeMode::Testing => {
                if theirs.is_cooperate() {
                    self.mode = EscapeMode::Exploiting;
                    Choice::Defect
                } else {
                    self.mode = EscapeMode::Cooperating;
                    Choice::Cooperate
                }
            }
            EscapeMode::Exploiting => {
                if theirs.is_defect() {
                    self.mode = EscapeMode::Cooperating;
                    Choice::Cooperate
                } else {
                    Choice::Defect
                }
            }
            EscapeMode::Cooperating if self.cooperation_streak >= Self::PROBE_AFTER => {
                self.mode = EscapeMode::Testing;
                self.cooperation_streak = 0;
                Choice::Defect
            }
            EscapeMode::Cooperating => Choice::Cooperate,
        }
    }

    fn reset(&mut self) {
        self.cooperation_streak = 0;
        self.mode = EscapeMode::Cooperating;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::replay;
    use Choice::{Cooperate as C, Defect as D};

    #[test]
    fn test_win_stay_lose_shift() {
        let mut agent = WinStayLoseShift::new();
        assert_eq!(agent.decide(&[], &[]), C);
        assert_eq!(agent.decide(&[C], &[C]), C);
        assert_eq!(agent.decide(&[D], &[C]), D);
        assert_eq!(agent.decide(&[C], &[D]), D);
        assert_eq!(agent.decide(&[D], &[D]), C);
    }

    #[test]
    fn test_pavlov_table() {
        let mut agent = Pavlov::new();
        assert_eq!(agent.decide(&[], &[]), C);
        assert_eq!(agent.decide(&[C], &[C]), C);
        assert_eq!(agent.decide(&[D], &[C]), D);
        assert_eq!(agent.decide(&[C], &[D]), D);
        assert_eq!(agent.decide(&[D], &[D]), C);
    }

    #[test]
    fn test_win_stay_lose_shift_matches_pavlov() {
        let opponent = [C, D, D, C, C, D, C, D, D, D, C];
        let mut wsls = WinStayLoseShift::new();
        let mut pavlov = Pavlov::new();
        assert_eq!(replay(&mut wsls, &opponent), replay(&mut pavlov, &opponent));
    }

    #[test]
    fn test_escape_tiger_exploits_pushover() {
        let mut agent = EscapeTiger::new();
        let choices = replay(&mut agent, &[C; 10]);
        // Five mutual cooperations are seen at the sixth decision
        assert_eq!(choices, vec![C, C, C, C, C, D, D, D, D, D]);
        assert_eq!(agent.mode(), EscapeMode::Exploiting);
    }

    #[test]
    fn test_escape_tiger_backs_off_when_punished() {
        let mut agent = EscapeTiger::new();
        let opponent = [C, C, C, C, C, C, D, C];
        let choices = replay(&mut agent, &opponent);
        assert_eq!(choices, vec![C, C, C, C, C, D, D, C]);
        assert_eq!(agent.mode(), EscapeMode::Cooperating);
    }
}
