use thiserror::Error;

use crate::components::Side;

/// Rejections raised while building a match, before any tick runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown game mode `{0}` (expected FIRST_TO_5, FIRST_TO_10 or BEST_OF_3)")]
    UnknownMode(String),

    #[error("unknown AI difficulty `{0}` (expected EASY, MEDIUM or HARD)")]
    UnknownDifficulty(String),

    #[error("invalid {side} player name: {reason}")]
    InvalidPlayerName { side: Side, reason: &'static str },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("malformed match config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reported by a [`ResultSink`](crate::ResultSink).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    #[error("result store unavailable: {0}")]
    Unavailable(String),

    #[error("result rejected: {0}")]
    Rejected(String),
}
