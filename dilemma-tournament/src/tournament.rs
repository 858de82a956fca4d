//! Tournament execution - round-robin over every unordered pair
//!
//! Level 1 - Orchestration and Level 2 - Phases

use std::time::Instant;

use dilemma_core::{Agent, DilemmaError, GameConfig, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::TournamentConfig;
use crate::match_play::{play_series, SeriesResult};

/// Standing of a participant in the tournament
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based position in the ranking
    pub rank: usize,
    /// Index of the agent in the entrant list
    pub index: usize,
    /// Entrant name after duplicate disambiguation
    pub name: String,
    /// Mean pair contribution over all opponents
    pub score: f64,
    /// Number of opponents faced
    pub opponents: usize,
}

/// Final ranking, best first
///
/// Ties keep entrant order, so for a catalog-built field the earlier
/// catalog entry ranks higher.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Standings {
    entries: Vec<Standing>,
}

impl Standings {
    pub fn as_slice(&self) -> &[Standing] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Standing> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get winner (top standing)
    pub fn winner(&self) -> Option<&Standing> {
        self.entries.first()
    }

    /// Get top N performers
    pub fn top_n(&self, n: usize) -> &[Standing] {
        let n = n.min(self.entries.len());
        &self.entries[..n]
    }

    /// Get standing for a specific entrant index
    pub fn standing_for(&self, index: usize) -> Option<&Standing> {
        self.entries.iter().find(|s| s.index == index)
    }
}

impl<'a> IntoIterator for &'a Standings {
    type Item = &'a Standing;
    type IntoIter = std::slice::Iter<'a, Standing>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Result of a tournament
#[derive(Clone, Debug, Serialize)]
pub struct TournamentResult {
    /// Final standings sorted by score (descending)
    pub standings: Standings,
    /// Every pair series, in pairing order
    pub pairs: Vec<SeriesResult>,
    /// Payoffs the tournament was played with
    pub game: GameConfig,
    /// Tournament settings
    pub config: TournamentConfig,
}

impl TournamentResult {
    /// Get winner (top standing)
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.winner()
    }

    /// Get top N performers
    pub fn top_n(&self, n: usize) -> &[Standing] {
        self.standings.top_n(n)
    }

    /// Get standing for a specific entrant index
    pub fn standing_for(&self, index: usize) -> Option<&Standing> {
        self.standings.standing_for(index)
    }

    /// Series played between two entrants, in either order
    pub fn pair(&self, i: usize, j: usize) -> Option<&SeriesResult> {
        let key = (i.min(j), i.max(j));
        self.pairs.iter().find(|p| (p.index_a, p.index_b) == key)
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run a round-robin tournament (Level 1 orchestration)
///
/// # Arguments
/// * `agents` - Entrants; each pair plays on its own clones
/// * `game` - Payoff configuration
/// * `config` - Tournament configuration
///
/// # Returns
/// Tournament results with final standings
pub fn run_tournament(
    agents: &[Box<dyn Agent>],
    game: &GameConfig,
    config: &TournamentConfig,
) -> Result<TournamentResult> {
    run_tournament_with_callback(agents, game, config, |_| {})
}

/// Run a tournament, calling `on_pair` as each pair series finishes
///
/// With `config.parallel` the callback fires from worker threads in
/// completion order; the returned result is in pairing order either way.
pub fn run_tournament_with_callback<F>(
    agents: &[Box<dyn Agent>],
    game: &GameConfig,
    config: &TournamentConfig,
    on_pair: F,
) -> Result<TournamentResult>
where
    F: Fn(&SeriesResult) + Sync,
{
    config.validate()?;
    if agents.len() < 2 {
        return Err(DilemmaError::TooFewAgents(agents.len()));
    }

    let start = Instant::now();
    let entrants = disambiguate_names(agents);
    let names: Vec<String> = entrants.iter().map(|a| a.name().to_string()).collect();
    let pairings = generate_round_robin_pairings(entrants.len());

    tracing::info!(
        entrants = entrants.len(),
        pairs = pairings.len(),
        rounds = config.rounds,
        matches_per_pair = config.matches_per_pair,
        payoffs = %game,
        "Tournament started"
    );

    let pairs = execute_all_pairs(&entrants, &pairings, game, config, &on_pair);
    let standings = compute_standings(&names, &pairs);

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        winner = standings.winner().map(|s| s.name.as_str()).unwrap_or(""),
        "Tournament finished"
    );

    Ok(TournamentResult {
        standings,
        pairs,
        game: *game,
        config: config.clone(),
    })
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// One pair's work item, owning its own agent instances
struct PairJob {
    ordinal: usize,
    pair: (usize, usize),
    a: Box<dyn Agent>,
    b: Box<dyn Agent>,
}

/// Execute all pair series, in parallel when configured
fn execute_all_pairs<F>(
    entrants: &[Box<dyn Agent>],
    pairings: &[(usize, usize)],
    game: &GameConfig,
    config: &TournamentConfig,
    on_pair: &F,
) -> Vec<SeriesResult>
where
    F: Fn(&SeriesResult) + Sync,
{
    let jobs: Vec<PairJob> = pairings
        .iter()
        .enumerate()
        .map(|(ordinal, &(i, j))| PairJob {
            ordinal,
            pair: (i, j),
            a: entrants[i].clone(),
            b: entrants[j].clone(),
        })
        .collect();

    let run = |mut job: PairJob| {
        let series = play_series(
            job.a.as_mut(),
            job.b.as_mut(),
            game,
            config,
            job.pair,
            job.ordinal,
        );
        tracing::debug!(
            a = %series.name_a,
            b = %series.name_b,
            contribution = series.pair_contribution,
            "Pair finished"
        );
        on_pair(&series);
        series
    };

    if config.parallel {
        jobs.into_par_iter().map(run).collect()
    } else {
        jobs.into_iter().map(run).collect()
    }
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Generate all pairings for round-robin
pub fn generate_round_robin_pairings(n: usize) -> Vec<(usize, usize)> {
    let mut pairings = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            pairings.push((i, j));
        }
    }
    pairings
}

/// Clone the field, suffixing repeated names with `_1`, `_2`, ...
///
/// The first holder of a name keeps it unchanged.
fn disambiguate_names(agents: &[Box<dyn Agent>]) -> Vec<Box<dyn Agent>> {
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();
    agents
        .iter()
        .map(|agent| {
            let mut entrant = agent.clone();
            let name = entrant.name().to_string();
            let count = seen.entry(name.clone()).or_insert(0);
            if *count > 0 {
                let renamed = format!("{}_{}", name, count);
                tracing::debug!(from = %name, to = %renamed, "Renamed duplicate entrant");
                entrant.set_name(renamed);
            }
            *count += 1;
            entrant
        })
        .collect()
}

/// Compute final standings from pair results
///
/// Each agent's score is the mean of its pair contributions, one per
/// opponent. The sort is stable, so equal scores keep entrant order.
fn compute_standings(names: &[String], pairs: &[SeriesResult]) -> Standings {
    let n = names.len();
    let mut totals = vec![0.0f64; n];
    let mut opponents = vec![0usize; n];

    for series in pairs {
        for index in [series.index_a, series.index_b] {
            totals[index] += series.pair_contribution;
            opponents[index] += 1;
        }
    }

    let mut entries: Vec<Standing> = (0..n)
        .map(|i| Standing {
            rank: 0,
            index: i,
            name: names[i].clone(),
            score: if opponents[i] > 0 {
                totals[i] / opponents[i] as f64
            } else {
                0.0
            },
            opponents: opponents[i],
        })
        .collect();

    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (position, standing) in entries.iter_mut().enumerate() {
        standing.rank = position + 1;
    }

    Standings { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_play::MatchResult;
    use dilemma_core::strategies::{AlwaysCooperate, AlwaysDefect, RandomChoice, TitForTat};
    use dilemma_core::{all_agents, Score};

    fn series(pair: (usize, usize), contributions: &[Score]) -> SeriesResult {
        let matches = contributions
            .iter()
            .map(|&c| MatchResult {
                rounds: vec![],
                total_a: c,
                total_b: c,
            })
            .collect();
        SeriesResult::new(pair, "a".to_string(), "b".to_string(), matches)
    }

    #[test]
    fn test_generate_round_robin_pairings() {
        let pairings = generate_round_robin_pairings(4);
        assert_eq!(pairings.len(), 6); // C(4,2) = 6
        assert!(pairings.contains(&(0, 1)));
        assert!(pairings.contains(&(0, 2)));
        assert!(pairings.contains(&(0, 3)));
        assert!(pairings.contains(&(1, 2)));
        assert!(pairings.contains(&(1, 3)));
        assert!(pairings.contains(&(2, 3)));
    }

    #[test]
    fn test_generate_round_robin_pairings_empty() {
        assert!(generate_round_robin_pairings(0).is_empty());
        assert!(generate_round_robin_pairings(1).is_empty());
    }

    #[test]
    fn test_compute_standings_averages_over_opponents() {
        let names: Vec<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        let pairs = vec![series((0, 1), &[10, 20]), series((0, 2), &[4]), series((1, 2), &[8])];
        let standings = compute_standings(&names, &pairs);

        // x: (15 + 4) / 2, y: (15 + 8) / 2, z: (4 + 8) / 2
        assert_eq!(standings.winner().unwrap().name, "y");
        assert_eq!(standings.standing_for(0).unwrap().score, 9.5);
        assert_eq!(standings.standing_for(1).unwrap().score, 11.5);
        assert_eq!(standings.standing_for(2).unwrap().score, 6.0);
        let ranks: Vec<usize> = standings.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_entrant_order() {
        let names: Vec<String> = ["p", "q", "r"].iter().map(|s| s.to_string()).collect();
        let pairs = vec![series((0, 1), &[5]), series((0, 2), &[5]), series((1, 2), &[5])];
        let standings = compute_standings(&names, &pairs);
        let order: Vec<&str> = standings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["p", "q", "r"]);
    }

    #[test]
    fn test_run_tournament_scores() {
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(TitForTat::new()),
            Box::new(AlwaysDefect::new()),
            Box::new(AlwaysCooperate::new()),
        ];
        let config = TournamentConfig::new(10, 2).sequential();
        let result = run_tournament(&agents, &GameConfig::default(), &config).unwrap();

        // TFT-AllD: min(9, 14) = 9; TFT-AllC: 30; AllD-AllC: min(50, 0) = 0
        assert_eq!(result.pair(0, 1).unwrap().pair_contribution, 9.0);
        assert_eq!(result.pair(2, 0).unwrap().pair_contribution, 30.0);
        assert_eq!(result.pair(1, 2).unwrap().pair_contribution, 0.0);

        let order: Vec<&str> = result.standings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(order, vec!["tit-for-tat", "always-cooperate", "always-defect"]);
        assert_eq!(result.winner().unwrap().score, 19.5);
        assert_eq!(result.standing_for(1).unwrap().score, 4.5);
        assert_eq!(result.top_n(2).len(), 2);
        assert!(result.standing_for(99).is_none());
        assert!(result.standings.iter().all(|s| s.opponents == 2));
    }

    #[test]
    fn test_too_few_agents() {
        let agents: Vec<Box<dyn Agent>> = vec![Box::new(TitForTat::new())];
        let config = TournamentConfig::default();
        let err = run_tournament(&agents, &GameConfig::default(), &config).unwrap_err();
        assert_eq!(err, DilemmaError::TooFewAgents(1));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let agents = all_agents();
        let config = TournamentConfig::new(0, 1);
        let err = run_tournament(&agents, &GameConfig::default(), &config).unwrap_err();
        assert_eq!(err, DilemmaError::InvalidRounds);
    }

    #[test]
    fn test_duplicate_names_suffixed() {
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(AlwaysCooperate::new()),
            Box::new(TitForTat::new()),
            Box::new(AlwaysCooperate::new()),
            Box::new(AlwaysCooperate::new()),
        ];
        let config = TournamentConfig::new(5, 1).sequential();
        let result = run_tournament(&agents, &GameConfig::default(), &config).unwrap();

        let name = |i: usize| result.standing_for(i).unwrap().name.clone();
        assert_eq!(name(0), "always-cooperate");
        assert_eq!(name(1), "tit-for-tat");
        assert_eq!(name(2), "always-cooperate_1");
        assert_eq!(name(3), "always-cooperate_2");

        // Everyone cooperates throughout, so all tie and keep entrant order
        let order: Vec<usize> = result.standings.iter().map(|s| s.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
        // The caller's agents are untouched
        assert_eq!(agents[2].name(), "always-cooperate");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let agents = all_agents();
        let game = GameConfig::default();
        let config = TournamentConfig::new(30, 2).with_seed(5);

        let parallel = run_tournament(&agents, &game, &config).unwrap();
        let sequential = run_tournament(&agents, &game, &config.clone().sequential()).unwrap();

        assert_eq!(parallel.standings, sequential.standings);
        assert_eq!(parallel.pairs.len(), 30 * 29 / 2);
        for (p, s) in parallel.pairs.iter().zip(&sequential.pairs) {
            assert_eq!(p.matches, s.matches);
        }
    }

    #[test]
    fn test_same_seed_same_standings() {
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(RandomChoice::new()),
            Box::new(TitForTat::new()),
            Box::new(RandomChoice::new()),
        ];
        let game = GameConfig::default();
        let config = TournamentConfig::new(50, 3).with_seed(123);
        let first = run_tournament(&agents, &game, &config).unwrap();
        let second = run_tournament(&agents, &game, &config).unwrap();
        assert_eq!(first.standings, second.standings);
    }

    #[test]
    fn test_callback_sees_every_pair() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let agents = all_agents();
        let seen = AtomicUsize::new(0);
        let config = TournamentConfig::new(5, 1);
        run_tournament_with_callback(&agents, &GameConfig::default(), &config, |_| {
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 435);
    }
}
