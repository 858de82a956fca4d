//! Composite strategy that switches between simpler delegates

use crate::agent::{agent_boilerplate, Agent};
use crate::game::{Choice, Score};
use crate::strategies::reactive::{AlwaysCooperate, AlwaysDefect, TitForTat};

/// Payoff used to rate delegates hypothetically
///
/// Fixed table, independent of the match configuration. Being exploited
/// costs 2 here.
fn rating_payoff(mine: Choice, theirs: Choice) -> Score {
    match (mine, theirs) {
        (Choice::Defect, Choice::Cooperate) => 5,
        (Choice::Cooperate, Choice::Cooperate) => 3,
        (Choice::Defect, Choice::Defect) => 1,
        (Choice::Cooperate, Choice::Defect) => -2,
    }
}

/// Play through one of tit-for-tat, always-defect or always-cooperate,
/// re-rating all three against the last ten rounds every ten decisions
#[derive(Clone, Debug)]
pub struct Hybrid {
    name: String,
    delegates: Vec<Box<dyn Agent>>,
    current: usize,
    rounds: u32,
    last_switch: u32,
}

impl Hybrid {
    const PERIOD: u32 = 10;
    const WINDOW: usize = 10;

    pub fn new() -> Self {
        Self {
            name: "hybrid".to_string(),
            delegates: vec![
                Box::new(TitForTat::new()),
                Box::new(AlwaysDefect::new()),
                Box::new(AlwaysCooperate::new()),
            ],
            current: 0,
            rounds: 0,
            last_switch: 0,
        }
    }

    /// Name of the delegate currently choosing moves
    pub fn current_delegate(&self) -> &str {
        self.delegates[self.current].name()
    }

    /// Score a delegate as if it had played the last `WINDOW` rounds
    ///
    /// The delegate only sees the window itself, so its first step is
    /// decided from empty histories.
    fn rate(delegate: &mut dyn Agent, own: &[Choice], opponent: &[Choice]) -> Score {
        let len = own.len().min(opponent.len());
        let start = len - Self::WINDOW;
        delegate.reset();

        let mut score = 0;
        for t in start..len {
            let mine = delegate.decide(&own[start..t], &opponent[start..t]);
            score += rating_payoff(mine, opponent[t]);
        }
        score
    }

    fn reselect(&mut self, own: &[Choice], opponent: &[Choice]) {
        if own.len().min(opponent.len()) < Self::WINDOW {
            return;
        }

        let mut best = (self.current, Score::MIN);
        for (index, delegate) in self.delegates.iter_mut().enumerate() {
            let score = Self::rate(delegate.as_mut(), own, opponent);
            if score > best.1 {
                best = (index, score);
            }
        }

        if best.0 != self.current {
            tracing::trace!(
                from = self.delegates[self.current].name(),
                to = self.delegates[best.0].name(),
                score = best.1,
                "hybrid switching delegate"
            );
        }
        self.current = best.0;
    }
}

impl Default for Hybrid {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Hybrid {
    agent_boilerplate!();

    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice {
        self.rounds += 1;

        if self.rounds - self.last_switch >= Self::PERIOD {
            self.reselect(own, opponent);
            self.last_switch = self.rounds;
        }

        let delegate = &mut self.delegates[self.current];
        delegate.decide(own, opponent)
    }

    fn reset(&mut self) {
        for delegate in &mut self.delegates {
            delegate.reset();
        }
        self.current = 0;
        self.rounds = 0;
        self.last_switch = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::replay;
    use Choice::{Cooperate as C, Defect as D};

    #[test]
    fn test_rating_payoff_table() {
        assert_eq!(rating_payoff(D, C), 5);
        assert_eq!(rating_payoff(C, C), 3);
        assert_eq!(rating_payoff(D, D), 1);
        assert_eq!(rating_payoff(C, D), -2);
    }

    #[test]
    fn test_hybrid_exploits_cooperator() {
        let mut agent = Hybrid::new();
        let choices = replay(&mut agent, &[C; 30]);
        // First re-rating with a full window happens at the 20th decision
        assert!(choices[..19].iter().all(|c| *c == C));
        assert!(choices[19..].iter().all(|c| *c == D));
        assert_eq!(agent.current_delegate(), "always-defect");
    }

    #[test]
    fn test_hybrid_switches_away_from_tit_for_tat_against_defector() {
        let mut agent = Hybrid::new();
        // Window opens with tit-for-tat cooperating: 7 against always-defect's 10
        let choices = replay(&mut agent, &[D; 30]);
        assert_eq!(choices[0], C);
        assert!(choices[1..].iter().all(|c| *c == D));
        assert_eq!(agent.current_delegate(), "always-defect");
    }

    #[test]
    fn test_hybrid_keeps_defecting_after_opponent_turns_cooperative() {
        let mut agent = Hybrid::new();
        let opponent: Vec<Choice> = [D; 20].into_iter().chain([C; 10]).collect();
        let choices = replay(&mut agent, &opponent);
        assert_eq!(choices[0], C);
        assert!(choices[1..].iter().all(|c| *c == D));
        assert_eq!(agent.current_delegate(), "always-defect");
    }

    #[test]
    fn test_rate_uses_window_only() {
        let mut tft = TitForTat::new();
        let own = [D; 12];
        let opponent: Vec<Choice> = [D; 2].into_iter().chain([C; 10]).collect();
        // The defection before the window is not visible to tit-for-tat
        assert_eq!(Hybrid::rate(&mut tft, &own, &opponent), 30);
    }

    #[test]
    fn test_hybrid_reset_restores_default() {
        let mut agent = Hybrid::new();
        replay(&mut agent, &[C; 25]);
        agent.reset();
        assert_eq!(agent.current_delegate(), "tit-for-tat");
        assert_eq!(agent.decide(&[], &[]), C);
    }
}
