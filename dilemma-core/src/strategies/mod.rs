//! Built-in strategies, grouped by how they decide
//!
//! - `reactive`: deterministic responses to counts over the opponent's history
//! - `probabilistic`: seeded random choice with a history-driven probability
//! - `state_machine`: win/lose driven mode switching
//! - `escalation`: punishment counters that grow and decay
//! - `pattern`: predict the opponent from structure in their history
//! - `hybrid`: switch between simpler delegates

pub mod escalation;
pub mod hybrid;
pub mod pattern;
pub mod probabilistic;
pub mod reactive;
pub mod state_machine;

pub use escalation::{
    AdaptivePunishment, Gradual, GradualForgiving, PunishmentEscalation, RewardPunishment,
};
pub use hybrid::Hybrid;
pub use pattern::{FrequencyAnalysis, PatternDetector, PatternMatchingTitForTat, RhythmDetector};
pub use probabilistic::{
    Capped, Consensus, Inching, LongMemory, MediumMemory, Probe, RandomChoice, ShortMemory,
    TitForTatThenMediumMemory, TrustBuilding,
};
pub use reactive::{
    Adaptive, AlwaysCooperate, AlwaysDefect, ForgivingTitForTat, Grudge, TitForTat,
    TwoCooperateOneDefect,
};
pub use state_machine::{EscapeMode, EscapeTiger, Pavlov, WinStayLoseShift};
