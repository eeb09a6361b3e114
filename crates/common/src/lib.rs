//! Shared types, config, state persistence, and error definitions for the
//! Sleeper alert bots.

pub mod config;
pub mod error;
pub mod state;
pub mod types;

pub use config::BotConfig;
pub use error::Error;
pub use state::StateStore;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
