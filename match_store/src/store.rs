use std::fs;
use std::path::{Path, PathBuf};

use game_core::MatchResult;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::ledger::{LeaderboardEntry, Ledger, MatchRecord, PlayerRecord};

/// Read/write access to the match and player ledgers.
pub trait MatchStore: Send {
    /// Upsert both players and append the match.
    fn record(&mut self, result: &MatchResult) -> Result<MatchRecord, StoreError>;

    fn leaderboard(&self) -> Vec<LeaderboardEntry>;

    fn matches(&self) -> Vec<MatchRecord>;

    fn player(&self, username: &str) -> Option<PlayerRecord>;
}

/// Ledger that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Ledger,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryStore {
    fn record(&mut self, result: &MatchResult) -> Result<MatchRecord, StoreError> {
        let record = self.ledger.apply(result)?;
        debug!(id = record.id, winner = %record.winner, "match recorded");
        Ok(record)
    }

    fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.ledger.leaderboard()
    }

    fn matches(&self) -> Vec<MatchRecord> {
        self.ledger.matches().to_vec()
    }

    fn player(&self, username: &str) -> Option<PlayerRecord> {
        self.ledger.player(username).cloned()
    }
}

/// Ledger persisted as a JSON document, rewritten after every match
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    ledger: Ledger,
}

impl FileStore {
    /// Open the ledger at `path`, starting empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let ledger = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Ledger::new()
        };
        info!(
            path = %path.display(),
            matches = ledger.matches().len(),
            "ledger opened"
        );
        Ok(Self { path, ledger })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.ledger)?;
        // Write beside the target, then swap it in
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl MatchStore for FileStore {
    fn record(&mut self, result: &MatchResult) -> Result<MatchRecord, StoreError> {
        let mut next = self.ledger.clone();
        let record = next.apply(result)?;
        let previous = std::mem::replace(&mut self.ledger, next);
        if let Err(err) = self.flush() {
            self.ledger = previous;
            return Err(err);
        }
        debug!(id = record.id, path = %self.path.display(), "match written");
        Ok(record)
    }

    fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.ledger.leaderboard()
    }

    fn matches(&self) -> Vec<MatchRecord> {
        self.ledger.matches().to_vec()
    }

    fn player(&self, username: &str) -> Option<PlayerRecord> {
        self.ledger.player(username).cloned()
    }
}
