//! Unified error type for the alert bots.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Sleeper API error (status={status}): {message}")]
    SleeperApi { status: u16, message: String },

    #[error("Chat API error (status={status}): {message}")]
    ChatApi { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
