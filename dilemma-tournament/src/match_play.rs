//! Match play - repeated rounds between two agents, and series of matches
//!
//! Level 2 - Phase-level implementation

use dilemma_core::{Agent, Choice, GameConfig, RoundRecord, Score};
use serde::Serialize;

use crate::config::{derive_seed, Side, TournamentConfig};

/// Result of a single match
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Every round in play order
    pub rounds: Vec<RoundRecord>,
    /// Cumulative score of side A
    pub total_a: Score,
    /// Cumulative score of side B
    pub total_b: Score,
}

/// Who came out ahead in a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    AWins,
    BWins,
    Draw,
}

impl MatchResult {
    /// Tournament contribution of this match: the lower of the two totals,
    /// credited to both sides
    pub fn contribution(&self) -> Score {
        self.total_a.min(self.total_b)
    }

    pub fn outcome(&self) -> MatchOutcome {
        match self.total_a.cmp(&self.total_b) {
            std::cmp::Ordering::Greater => MatchOutcome::AWins,
            std::cmp::Ordering::Less => MatchOutcome::BWins,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }

    /// Side A's moves in order
    pub fn history_a(&self) -> Vec<Choice> {
        self.rounds.iter().map(|r| r.choice_a).collect()
    }

    /// Side B's moves in order
    pub fn history_b(&self) -> Vec<Choice> {
        self.rounds.iter().map(|r| r.choice_b).collect()
    }
}

/// Match outcome counts across a series
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WinCounts {
    pub a_wins: u32,
    pub b_wins: u32,
    pub draws: u32,
}

/// All matches played by one unordered pair
#[derive(Clone, Debug, Serialize)]
pub struct SeriesResult {
    /// Entrant index of side A (always the lower index in a tournament)
    pub index_a: usize,
    /// Entrant index of side B
    pub index_b: usize,
    pub name_a: String,
    pub name_b: String,
    /// Individual matches
    pub matches: Vec<MatchResult>,
    /// Per-match contribution, `min(total_a, total_b)`
    pub contributions: Vec<Score>,
    /// Mean of the per-match contributions, credited to both agents
    pub pair_contribution: f64,
}

impl SeriesResult {
    /// Aggregate finished matches for the pair `(index_a, index_b)`
    pub fn new(
        (index_a, index_b): (usize, usize),
        name_a: String,
        name_b: String,
        matches: Vec<MatchResult>,
    ) -> Self {
        let contributions: Vec<Score> = matches.iter().map(MatchResult::contribution).collect();
        let pair_contribution = mean(&contributions);
        Self {
            index_a,
            index_b,
            name_a,
            name_b,
            matches,
            contributions,
            pair_contribution,
        }
    }

    pub fn scores_a(&self) -> Vec<Score> {
        self.matches.iter().map(|m| m.total_a).collect()
    }

    pub fn scores_b(&self) -> Vec<Score> {
        self.matches.iter().map(|m| m.total_b).collect()
    }

    /// Mean match total per side
    pub fn mean_scores(&self) -> (f64, f64) {
        (mean(&self.scores_a()), mean(&self.scores_b()))
    }

    /// Lowest match total per side
    pub fn min_scores(&self) -> (Score, Score) {
        (
            self.scores_a().into_iter().min().unwrap_or(0),
            self.scores_b().into_iter().min().unwrap_or(0),
        )
    }

    /// Median match total per side (upper median for even counts)
    pub fn median_scores(&self) -> (Score, Score) {
        (median(self.scores_a()), median(self.scores_b()))
    }

    pub fn win_counts(&self) -> WinCounts {
        let mut counts = WinCounts::default();
        for m in &self.matches {
            match m.outcome() {
                MatchOutcome::AWins => counts.a_wins += 1,
                MatchOutcome::BWins => counts.b_wins += 1,
                MatchOutcome::Draw => counts.draws += 1,
            }
        }
        counts
    }

    /// Whether this series involves the given entrant
    pub fn involves(&self, index: usize) -> bool {
        self.index_a == index || self.index_b == index
    }
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Play one match of `rounds` rounds (Level 2 phase)
///
/// Both agents are reset first. Each agent sees the histories from its own
/// perspective: its own moves first, then the opponent's. Totals saturate
/// at the `Score` bounds.
pub fn play_match(
    a: &mut dyn Agent,
    b: &mut dyn Agent,
    config: &GameConfig,
    rounds: usize,
) -> MatchResult {
    a.reset();
    b.reset();

    let mut history_a: Vec<Choice> = Vec::with_capacity(rounds);
    let mut history_b: Vec<Choice> = Vec::with_capacity(rounds);
    let mut records = Vec::with_capacity(rounds);
    let mut total_a: Score = 0;
    let mut total_b: Score = 0;

    for round in 0..rounds {
        let choice_a = a.decide(&history_a, &history_b);
        let choice_b = b.decide(&history_b, &history_a);
        let record = RoundRecord::new(config, choice_a, choice_b);

        tracing::trace!(
            round = round + 1,
            a = %choice_a,
            b = %choice_b,
            payoff_a = record.payoff_a,
            payoff_b = record.payoff_b,
            "round played"
        );

        history_a.push(choice_a);
        history_b.push(choice_b);
        total_a = total_a.saturating_add(record.payoff_a);
        total_b = total_b.saturating_add(record.payoff_b);
        records.push(record);
    }

    MatchResult {
        rounds: records,
        total_a,
        total_b,
    }
}

/// Play `matches_per_pair` matches between two agents (Level 2 phase)
///
/// Before each match both agents are reseeded from `(base seed, pair,
/// match, side)`, so a series replays identically wherever it runs.
pub fn play_series(
    a: &mut dyn Agent,
    b: &mut dyn Agent,
    game: &GameConfig,
    config: &TournamentConfig,
    pair: (usize, usize),
    ordinal: usize,
) -> SeriesResult {
    let base_seed = config.base_seed();
    let matches = (0..config.matches_per_pair)
        .map(|match_index| {
            a.reseed(derive_seed(base_seed, ordinal, match_index, Side::A));
            b.reseed(derive_seed(base_seed, ordinal, match_index, Side::B));
            let result = play_match(a, b, game, config.rounds);
            tracing::debug!(
                a = a.name(),
                b = b.name(),
                match_index = match_index + 1,
                total_a = result.total_a,
                total_b = result.total_b,
                "match finished"
            );
            result
        })
        .collect();

    SeriesResult::new(pair, a.name().to_string(), b.name().to_string(), matches)
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

fn mean(values: &[Score]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
    }
}

fn median(mut values: Vec<Score>) -> Score {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    values[values.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use dilemma_core::strategies::{AlwaysCooperate, AlwaysDefect, RandomChoice, TitForTat};

    const N: usize = 50;

    fn totals_only(total_a: Score, total_b: Score) -> MatchResult {
        MatchResult {
            rounds: vec![],
            total_a,
            total_b,
        }
    }

    #[test]
    fn test_always_defect_pair() {
        let config = GameConfig::default();
        let result = play_match(&mut AlwaysDefect::new(), &mut AlwaysDefect::new(), &config, N);
        assert_eq!(result.rounds.len(), N);
        assert!(result
            .rounds
            .iter()
            .all(|r| (r.payoff_a, r.payoff_b) == (config.llost(), config.llost())));
        assert_eq!(result.total_a, N as Score * config.llost());
        assert_eq!(result.total_b, N as Score * config.llost());
    }

    #[test]
    fn test_always_cooperate_pair() {
        let config = GameConfig::default();
        let result = play_match(
            &mut AlwaysCooperate::new(),
            &mut AlwaysCooperate::new(),
            &config,
            N,
        );
        assert_eq!(result.total_a, N as Score * config.wwin());
        assert_eq!(result.total_b, N as Score * config.wwin());
    }

    #[test]
    fn test_tit_for_tat_vs_cooperator() {
        let config = GameConfig::default();
        let result = play_match(&mut TitForTat::new(), &mut AlwaysCooperate::new(), &config, N);
        assert!(result.history_a().iter().all(|c| *c == Choice::Cooperate));
        assert_eq!(result.total_a, N as Score * config.wwin());
        assert_eq!(result.total_b, N as Score * config.wwin());
    }

    #[test]
    fn test_tit_for_tat_vs_defector() {
        let config = GameConfig::new(7, 4, 2, -1).unwrap();
        let result = play_match(&mut TitForTat::new(), &mut AlwaysDefect::new(), &config, N);
        let history = result.history_a();
        assert_eq!(history[0], Choice::Cooperate);
        assert!(history[1..].iter().all(|c| *c == Choice::Defect));
        assert_eq!(result.total_a, config.beaten() + (N as Score - 1) * config.llost());
        assert_eq!(result.total_b, config.beat() + (N as Score - 1) * config.llost());
        assert_eq!(result.contribution(), result.total_a);
        assert_eq!(result.outcome(), MatchOutcome::BWins);
    }

    #[test]
    fn test_zero_rounds() {
        let config = GameConfig::default();
        let result = play_match(&mut TitForTat::new(), &mut AlwaysDefect::new(), &config, 0);
        assert!(result.rounds.is_empty());
        assert_eq!((result.total_a, result.total_b), (0, 0));
    }

    #[test]
    fn test_extreme_payoffs_saturate() {
        let config = GameConfig::new(Score::MAX, 3, 1, Score::MIN).unwrap();
        let (mut a, mut b) = (AlwaysDefect::new(), AlwaysCooperate::new());
        let result = play_match(&mut a, &mut b, &config, 3);
        assert_eq!(result.total_a, Score::MAX);
        assert_eq!(result.total_b, Score::MIN);

        let series = SeriesResult::new(
            (0, 1),
            "a".to_string(),
            "b".to_string(),
            vec![result.clone(), result],
        );
        assert_eq!(series.contributions, vec![Score::MIN; 2]);
        assert_eq!(series.pair_contribution, Score::MIN as f64);
        assert_eq!(series.mean_scores().0, Score::MAX as f64);
    }

    #[test]
    fn test_pair_contribution_is_mean_of_minimums() {
        let series = SeriesResult::new(
            (0, 1),
            "a".to_string(),
            "b".to_string(),
            vec![totals_only(10, 40), totals_only(25, 20)],
        );
        assert_eq!(series.contributions, vec![10, 20]);
        assert_eq!(series.pair_contribution, 15.0);
    }

    #[test]
    fn test_series_statistics() {
        let series = SeriesResult::new(
            (0, 1),
            "a".to_string(),
            "b".to_string(),
            vec![totals_only(10, 12), totals_only(30, 5), totals_only(20, 20)],
        );
        assert_eq!(series.mean_scores(), (20.0, 37.0 / 3.0));
        assert_eq!(series.min_scores(), (10, 5));
        assert_eq!(series.median_scores(), (20, 12));
        assert_eq!(
            series.win_counts(),
            WinCounts {
                a_wins: 1,
                b_wins: 1,
                draws: 1,
            }
        );
        assert!(series.involves(1));
        assert!(!series.involves(2));
    }

    #[test]
    fn test_play_series_resets_between_matches() {
        let game = GameConfig::default();
        let config = TournamentConfig::new(20, 3);
        let series = play_series(
            &mut TitForTat::new(),
            &mut AlwaysDefect::new(),
            &game,
            &config,
            (0, 1),
            0,
        );
        assert_eq!(series.matches.len(), 3);
        assert_eq!(series.name_a, "tit-for-tat");
        // Every match starts fresh, so all three are identical
        assert!(series.matches.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(series.contributions, vec![19; 3]);
    }

    #[test]
    fn test_play_series_reproducible() {
        let game = GameConfig::default();
        let config = TournamentConfig::new(40, 2).with_seed(11);
        let replay = || {
            let (mut a, mut b) = (RandomChoice::new(), RandomChoice::new());
            play_series(&mut a, &mut b, &game, &config, (0, 1), 4)
        };
        let first = replay();
        let second = replay();
        assert_eq!(first.matches, second.matches);
        // Distinct seeds per match
        assert_ne!(first.matches[0], first.matches[1]);
    }
}
