//! Error types shared by the dilemma crates

/// Errors raised while configuring or running matches and tournaments
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DilemmaError {
    #[error("payoffs must satisfy beat > wwin > llost > beaten, got beat={beat} wwin={wwin} llost={llost} beaten={beaten}")]
    InvalidPayoffs {
        beat: i64,
        wwin: i64,
        llost: i64,
        beaten: i64,
    },

    #[error("rounds per match must be positive")]
    InvalidRounds,

    #[error("matches per pair must be positive")]
    InvalidMatchCount,

    #[error("unknown agent '{name}', available agents: {}", .available.join(", "))]
    AgentNotFound { name: String, available: Vec<String> },

    #[error("a tournament needs at least two agents, got {0}")]
    TooFewAgents(usize),

    #[error("'{0}' is not a choice, expected defect/beat or cooperate/still")]
    InvalidChoice(String),
}

/// Result alias for dilemma operations
pub type Result<T> = std::result::Result<T, DilemmaError>;
