//! Match and player ledgers behind the engine's `ResultSink` seam.
//!
//! A store records finished matches, keeps per-player totals and ranks
//! players on a leaderboard. Sinks connect a store to a running session,
//! either inline or through a background writer thread.

pub mod error;
pub mod ledger;
pub mod sink;
pub mod store;

pub use error::StoreError;
pub use ledger::{LeaderboardEntry, Ledger, MatchRecord, PlayerRecord};
pub use sink::{BackgroundSink, StoreSink};
pub use store::{FileStore, MatchStore, MemoryStore};
