//! Dilemma Core - Payoffs, agents and strategies
//!
//! This crate provides the building blocks for iterated prisoner's dilemma
//! simulations:
//! - Choices and the validated payoff configuration
//! - The `Agent` trait every strategy implements
//! - The 30 built-in strategies, grouped by family
//! - A name-addressable catalog of those strategies

pub mod agent;
pub mod catalog;
pub mod error;
pub mod game;
pub mod strategies;

// Re-exports for convenient access
pub use agent::{Agent, AgentRng, DEFAULT_SEED};
pub use catalog::{all_agents, catalog, catalog_keys, create_agent, normalize_name, CatalogEntry};
pub use error::{DilemmaError, Result};
pub use game::{history_string, Choice, GameConfig, RoundRecord, Score};
