use game_core::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid match result: {0}")]
    InvalidResult(String),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("background writer has stopped")]
    WorkerStopped,

    #[error("ledger file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for PersistError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidResult(reason) => PersistError::Rejected(reason),
            other => PersistError::Unavailable(other.to_string()),
        }
    }
}
