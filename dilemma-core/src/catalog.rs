//! Registry of the built-in strategies
//!
//! Entries are kept in a fixed order; that order is the tie-break used
//! when ranking a tournament field built from the catalog.

use crate::agent::Agent;
use crate::error::{DilemmaError, Result};
use crate::strategies::*;

/// One registered strategy
#[derive(Clone, Copy)]
pub struct CatalogEntry {
    /// Registry key, also the default agent name
    pub key: &'static str,
    pub description: &'static str,
    /// Alternative spellings accepted by `create_agent`
    pub aliases: &'static [&'static str],
    pub build: fn() -> Box<dyn Agent>,
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("key", &self.key)
            .field("description", &self.description)
            .finish()
    }
}

macro_rules! entry {
    ($key:literal, $ty:ty, $description:literal) => {
        entry!($key, $ty, $description, [])
    };
    ($key:literal, $ty:ty, $description:literal, [$($alias:literal),*]) => {
        CatalogEntry {
            key: $key,
            description: $description,
            aliases: &[$($alias),*],
            build: || -> Box<dyn Agent> { Box::new(<$ty>::default()) },
        }
    };
}

static CATALOG: [CatalogEntry; 30] = [
    entry!("tit-for-tat", TitForTat, "Cooperate first, then copy the opponent's last move"),
    entry!("always-defect", AlwaysDefect, "Always defect", ["always-beat"]),
    entry!("always-cooperate", AlwaysCooperate, "Always cooperate", ["always-still"]),
    entry!("random", RandomChoice, "Cooperate or defect with equal probability"),
    entry!(
        "forgiving-tit-for-tat",
        ForgivingTitForTat,
        "Defect only if 2 of the opponent's last 3 moves were defections"
    ),
    entry!("gradual", Gradual, "Answer the n-th betrayal with n defections"),
    entry!(
        "pattern-detector",
        PatternDetector,
        "Defect when the latest 3-move window was once followed by a defection"
    ),
    entry!(
        "adaptive",
        Adaptive,
        "Cooperate above 70% opponent cooperation, defect below 30%, else tit-for-tat"
    ),
    entry!(
        "win-stay-lose-shift",
        WinStayLoseShift,
        "Repeat the last move after a win, switch after a loss"
    ),
    entry!(
        "two-cooperate-one-defect",
        TwoCooperateOneDefect,
        "Fixed cooperate/defect cycle",
        ["two-coop-one-defect"]
    ),
    entry!(
        "reward-punishment",
        RewardPunishment,
        "Reward cooperation, punish defection with a decaying counter"
    ),
    entry!(
        "escape-tiger",
        EscapeTiger,
        "Probe after 5 mutual cooperations and exploit if unpunished"
    ),
    entry!("inching", Inching, "Slowly raise the defection rate while the opponent cooperates"),
    entry!(
        "trust-building",
        TrustBuilding,
        "Cooperate with probability equal to accumulated trust"
    ),
    entry!("grudge", Grudge, "Cooperate until the first defection, then defect forever"),
    entry!(
        "punishment-escalation",
        PunishmentEscalation,
        "Retaliation streaks grow with total defections"
    ),
    entry!("consensus", Consensus, "Cooperate when both last moves agreed, else rarely"),
    entry!("probe", Probe, "Tit-for-tat that increasingly turns cooperation into defection"),
    entry!("capped", Capped, "Cooperate at most 90% of the time, always retaliate"),
    entry!("short-memory", ShortMemory, "Cooperation probability from the opponent's last 3 moves"),
    entry!(
        "medium-memory",
        MediumMemory,
        "Cooperation probability from the opponent's last 15 moves"
    ),
    entry!("long-memory", LongMemory, "Cooperation probability from the opponent's whole history"),
    entry!(
        "tit-for-tat-then-medium-memory",
        TitForTatThenMediumMemory,
        "Tit-for-tat for 5 rounds, then medium-memory",
        ["tit-for-tat-start-medium-memory"]
    ),
    entry!(
        "adaptive-punishment",
        AdaptivePunishment,
        "Punishment length follows the opponent's defection rate"
    ),
    entry!("gradual-forgiving", GradualForgiving, "Short revenge, then probabilistic forgiveness"),
    entry!(
        "pattern-matching-tit-for-tat",
        PatternMatchingTitForTat,
        "Tit-for-tat that pre-empts recurring defections"
    ),
    entry!(
        "frequency-analysis",
        FrequencyAnalysis,
        "Respond to the opponent's conditional defection rates"
    ),
    entry!(
        "rhythm-detector",
        RhythmDetector,
        "Detect a fixed opponent rhythm and defect on its defections"
    ),
    entry!("hybrid", Hybrid, "Switch between tit-for-tat, always-defect and always-cooperate"),
    entry!("pavlov", Pavlov, "Keep the move after a good outcome, flip after a bad one"),
];

/// All registered strategies in catalog order
pub fn catalog() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Registry keys in catalog order
pub fn catalog_keys() -> Vec<String> {
    CATALOG.iter().map(|e| e.key.to_string()).collect()
}

/// Canonical form used for lookups: lowercase, separators and a trailing
/// `agent` removed
pub fn normalize_name(name: &str) -> String {
    let flat: String = name
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect();
    match flat.strip_suffix("agent") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => flat,
    }
}

/// Look up a catalog entry by key or by a loose spelling of it
pub fn find_entry(name: &str) -> Option<&'static CatalogEntry> {
    let wanted = normalize_name(name);
    CATALOG.iter().find(|e| {
        std::iter::once(&e.key)
            .chain(e.aliases)
            .any(|k| normalize_name(k) == wanted)
    })
}

/// Build a fresh agent by name
pub fn create_agent(name: &str) -> Result<Box<dyn Agent>> {
    find_entry(name)
        .map(|e| (e.build)())
        .ok_or_else(|| DilemmaError::AgentNotFound {
            name: name.to_string(),
            available: catalog_keys(),
        })
}

/// One instance of every strategy, in catalog order
pub fn all_agents() -> Vec<Box<dyn Agent>> {
    CATALOG.iter().map(|e| (e.build)()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_thirty_unique_keys() {
        let keys: HashSet<_> = catalog().iter().map(|e| e.key).collect();
        assert_eq!(catalog().len(), 30);
        assert_eq!(keys.len(), 30);
    }

    #[test]
    fn test_every_entry_builds_with_its_key() {
        for entry in catalog() {
            let agent = (entry.build)();
            assert_eq!(agent.name(), entry.key);
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("TitForTatAgent"), "titfortat");
        assert_eq!(normalize_name("tit_for tat"), "titfortat");
        assert_eq!(normalize_name("Agent"), "agent");
    }

    #[test]
    fn test_create_agent_loose_spelling() {
        let agent = create_agent("TitForTatAgent").unwrap();
        assert_eq!(agent.name(), "tit-for-tat");
        let agent = create_agent("Win_Stay_Lose_Shift").unwrap();
        assert_eq!(agent.name(), "win-stay-lose-shift");
    }

    #[test]
    fn test_create_agent_by_alias() {
        assert_eq!(create_agent("AlwaysBeatAgent").unwrap().name(), "always-defect");
        assert_eq!(create_agent("always-still").unwrap().name(), "always-cooperate");
        assert_eq!(
            create_agent("TitForTatStartMediumMemoryAgent").unwrap().name(),
            "tit-for-tat-then-medium-memory"
        );
    }

    #[test]
    fn test_create_agent_unknown() {
        match create_agent("nonexistent") {
            Err(DilemmaError::AgentNotFound { name, available }) => {
                assert_eq!(name, "nonexistent");
                assert_eq!(available.len(), 30);
            }
            other => panic!(
                "expected AgentNotFound, got {:?}",
                other.map(|a| a.name().to_string())
            ),
        }
    }

    #[test]
    fn test_reset_replays_identically_for_every_entry() {
        use crate::game::Choice;
        use crate::game::Choice::{Cooperate as C, Defect as D};
        use crate::strategies::test_support::replay_seeded;

        let mixed: Vec<Choice> = [C, D, D, C, C, C, D, C, D, D, D, C]
            .iter()
            .copied()
            .cycle()
            .take(60)
            .collect();
        let other: Vec<Choice> = [D, D, D, C].iter().copied().cycle().take(60).collect();

        for entry in catalog() {
            let mut agent = (entry.build)();
            let first = replay_seeded(agent.as_mut(), &mixed, 7);
            replay_seeded(agent.as_mut(), &other, 99);
            let again = replay_seeded(agent.as_mut(), &mixed, 7);
            assert_eq!(first, again, "{} diverged after reset", entry.key);
        }
    }

    #[test]
    fn test_all_agents_in_catalog_order() {
        let names: Vec<String> = all_agents().iter().map(|a| a.name().to_string()).collect();
        assert_eq!(names, catalog_keys());
        assert_eq!(names[0], "tit-for-tat");
        assert_eq!(names[29], "pavlov");
    }
}
