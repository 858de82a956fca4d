//! Pattern-recognition strategies
//!
//! These agents look for structure in the opponent's history (repeated
//! windows, conditional defection rates, fixed rhythms) and defect ahead of
//! a predicted defection. Without a usable prediction they fall back to
//! cooperation or tit-for-tat.

use crate::agent::{
    agent_boilerplate, count_defections, mirror_last, tail, Agent, AgentRng, DEFAULT_SEED,
};
use crate::game::Choice;

/// Predict the opponent's next move from earlier occurrences of their
/// latest three-move window
#[derive(Clone, Debug)]
pub struct PatternDetector {
    name: String,
}

impl PatternDetector {
    const WINDOW: usize = 3;

    pub fn new() -> Self {
        Self {
            name: "pattern-detector".to_string(),
        }
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for PatternDetector {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.len() <= Self::WINDOW {
            return Choice::Cooperate;
        }

        let recent = tail(opponent, Self::WINDOW);
        // The two most recent windows are never used as evidence
        let search_end = opponent.len().saturating_sub(Self::WINDOW * 2);
        let predicts_defect = (0..search_end).any(|i| {
            &opponent[i..i + Self::WINDOW] == recent && opponent[i + Self::WINDOW].is_defect()
        });

        if predicts_defect {
            Choice::Defect
        } else {
            Choice::Cooperate
        }
    }
}

/// Tit-for-tat that pre-empts a defection when the opponent's latest
/// four-move window has recurred and was mostly followed by a defection
#[derive(Clone, Debug)]
pub struct PatternMatchingTitForTat {
    name: String,
}

impl PatternMatchingTitForTat {
    const WINDOW: usize = 4;
    const MIN_OCCURRENCES: usize = 2;

    pub fn new() -> Self {
        Self {
            name: "pattern-matching-tit-for-tat".to_string(),
        }
    }

    /// Whether the latest window has recurred often enough to trust
    fn pattern_established(opponent: &[Choice]) -> bool {
        let recent = tail(opponent, Self::WINDOW);
        let last_start = opponent.len() - Self::WINDOW * 2;
        let occurrences = (0..=last_start)
            .filter(|&i| &opponent[i..i + Self::WINDOW] == recent)
            .count();
        occurrences >= Self::MIN_OCCURRENCES
    }

    /// Moves that followed earlier occurrences of the latest window
    fn followers(opponent: &[Choice]) -> Vec<Choice> {
        let recent = tail(opponent, Self::WINDOW);
        (0..opponent.len() - Self::WINDOW)
            .filter(|&i| &opponent[i..i + Self::WINDOW] == recent)
            .map(|i| opponent[i + Self::WINDOW])
            .collect()
    }
}

impl Default for PatternMatchingTitForTat {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for PatternMatchingTitForTat {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.len() >= Self::WINDOW * 3 && Self::pattern_established(opponent) {
            let followers = Self::followers(opponent);
            if !followers.is_empty()
                && count_defections(&followers) as f64 / followers.len() as f64 > 0.5
            {
                return Choice::Defect;
            }
        }
        mirror_last(opponent)
    }
}

/// Track how often the opponent defects right after each of our moves and
/// pick a response from the two conditional rates
#[derive(Clone, Debug)]
pub struct FrequencyAnalysis {
    name: String,
    after_cooperate: ResponseCount,
    after_defect: ResponseCount,
}

/// Opponent defections observed after one kind of own move
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResponseCount {
    pub defections: u32,
    pub total: u32,
}

impl ResponseCount {
    fn record(&mut self, response: Choice) {
        self.total += 1;
        if response.is_defect() {
            self.defections += 1;
        }
    }

    pub fn rate(&self) -> f64 {
        self.defections as f64 / self.total.max(1) as f64
    }
}

impl FrequencyAnalysis {
    const WARMUP: usize = 5;

    pub fn new() -> Self {
        Self {
            name: "frequency-analysis".to_string(),
            after_cooperate: ResponseCount::default(),
            after_defect: ResponseCount::default(),
        }
    }

    pub fn after_cooperate(&self) -> ResponseCount {
        self.after_cooperate
    }

    pub fn after_defect(&self) -> ResponseCount {
        self.after_defect
    }
}

impl Default for FrequencyAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for FrequencyAnalysis {
    agent_boilerplate!();

    fn decide(&mut self, own: &[Choice], opponent: &[Choice]) -> Choice {
        // Pair our move two rounds back with the opponent's latest answer
        if own.len() > 1 {
            if let Some(&response) = opponent.last() {
                match own[own.len() - 2] {
                    Choice::Cooperate => self.after_cooperate.record(response),
                    Choice::Defect => self.after_defect.record(response),
                }
            }
        }

        if opponent.len() < Self::WARMUP {
            return Choice::Cooperate;
        }

        let after_c = self.after_cooperate.rate();
        let after_d = self.after_defect.rate();

        if after_c > 0.6 {
            Choice::Defect
        } else if after_d > after_c + 0.3 {
            Choice::Cooperate
        } else if after_c > 0.4 && after_d > 0.4 {
            Choice::Defect
        } else {
            mirror_last(opponent)
        }
    }

    fn reset(&mut self) {
        self.after_cooperate = ResponseCount::default();
        self.after_defect = ResponseCount::default();
    }
}

const RHYTHMS: [&[Choice]; 5] = [
    &[Choice::Defect],
    &[Choice::Cooperate],
    &[Choice::Defect, Choice::Cooperate],
    &[Choice::Cooperate, Choice::Cooperate, Choice::Defect],
    &[Choice::Cooperate, Choice::Defect, Choice::Defect],
];

/// Fraction of a history that agrees with a repeating rhythm
pub fn rhythm_confidence(history: &[Choice], rhythm: &[Choice]) -> f64 {
    if history.is_empty() || rhythm.is_empty() {
        return 0.0;
    }
    let matches = history
        .iter()
        .enumerate()
        .filter(|(i, c)| **c == rhythm[i % rhythm.len()])
        .count();
    matches as f64 / history.len() as f64
}

/// Lock onto a fixed cooperate/defect rhythm in the opponent's play and
/// defect whenever the rhythm predicts a defection
///
/// Once detected the rhythm is kept until `reset`. Against a pure
/// cooperator the agent sneaks in a defection 10% of the time.
#[derive(Clone, Debug)]
pub struct RhythmDetector {
    name: String,
    rhythm: Option<&'static [Choice]>,
    confidence: f64,
    rng: AgentRng,
}

impl RhythmDetector {
    const WARMUP: usize = 6;
    const MIN_CONFIDENCE: f64 = 0.7;
    const SNEAK_RATE: f64 = 0.1;

    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            name: "rhythm-detector".to_string(),
            rhythm: None,
            confidence: 0.0,
            rng: AgentRng::new(seed),
        }
    }

    pub fn rhythm(&self) -> Option<&'static [Choice]> {
        self.rhythm
    }

    fn detect(&mut self, opponent: &[Choice]) {
        for rhythm in RHYTHMS {
            let confidence = rhythm_confidence(opponent, rhythm);
            if confidence > Self::MIN_CONFIDENCE && confidence > self.confidence {
                self.rhythm = Some(rhythm);
                self.confidence = confidence;
            }
        }
    }
}

impl Default for RhythmDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RhythmDetector {
    agent_boilerplate!();

    fn decide(&mut self, _own: &[Choice], opponent: &[Choice]) -> Choice {
        if opponent.len() < Self::WARMUP {
            return Choice::Cooperate;
        }

        if self.rhythm.is_none() {
            self.detect(opponent);
        }

        match self.rhythm {
            Some(rhythm) => {
                let predicted = rhythm[opponent.len() % rhythm.len()];
                if predicted.is_defect() {
                    Choice::Defect
                } else if rhythm.len() == 1 {
                    self.rng.defect_with(Self::SNEAK_RATE)
                } else {
                    Choice::Cooperate
                }
            }
            None => mirror_last(opponent),
        }
    }

    fn reset(&mut self) {
        self.rhythm = None;
        self.confidence = 0.0;
    }

    fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::test_support::replay;
    use Choice::{Cooperate as C, Defect as D};

    #[test]
    fn test_pattern_detector_predicts_cycle() {
        let mut agent = PatternDetector::new();
        let opponent: Vec<Choice> = [C, C, D].repeat(4);
        let choices = replay(&mut agent, &opponent);
        assert!(choices[..11].iter().all(|c| *c == C));
        assert_eq!(choices[11], D);
    }

    #[test]
    fn test_pattern_matching_pre_empts() {
        let mut agent = PatternMatchingTitForTat::new();
        let opponent: Vec<Choice> = [C, C, C, D].repeat(4);
        let choices = replay(&mut agent, &opponent);
        // Plain tit-for-tat until the window has recurred twice
        assert_eq!(&choices[..12], &[C, C, C, C, D, C, C, C, D, C, C, C]);
        assert_eq!(&choices[12..], &[D, C, C, D]);
        assert_ne!(choices[15], opponent[14]);
    }

    #[test]
    fn test_frequency_analysis_against_defector() {
        let mut agent = FrequencyAnalysis::new();
        let choices = replay(&mut agent, &[D; 10]);
        assert_eq!(&choices[..5], &[C; 5]);
        assert!(choices[5..].iter().all(|c| *c == D));
        assert!(agent.after_cooperate().rate() > 0.6);
    }

    #[test]
    fn test_frequency_analysis_against_cooperator() {
        let mut agent = FrequencyAnalysis::new();
        assert!(replay(&mut agent, &[C; 20]).iter().all(|c| *c == C));
        assert_eq!(agent.after_defect(), ResponseCount::default());
    }

    #[test]
    fn test_rhythm_confidence() {
        assert_eq!(rhythm_confidence(&[], &[C]), 0.0);
        assert_eq!(rhythm_confidence(&[D, C, D, C], &[D, C]), 1.0);
        assert_eq!(rhythm_confidence(&[D, C, D, C], &[D]), 0.5);
    }

    #[test]
    fn test_rhythm_detector_follows_alternation() {
        let mut agent = RhythmDetector::new();
        let opponent: Vec<Choice> = [D, C].repeat(10);
        let choices = replay(&mut agent, &opponent);
        assert_eq!(&choices[..6], &[C; 6]);
        assert_eq!(&choices[6..], &opponent[6..]);
        assert_eq!(agent.rhythm(), Some(&[D, C][..]));

        agent.reset();
        assert_eq!(agent.rhythm(), None);
    }

    #[test]
    fn test_rhythm_detector_mostly_cooperates_with_cooperator() {
        let mut agent = RhythmDetector::new();
        let choices = replay(&mut agent, &[C; 200]);
        assert_eq!(agent.rhythm(), Some(&[C][..]));
        let defections = choices.iter().filter(|c| c.is_defect()).count();
        assert!(defections < 60);
    }
}
