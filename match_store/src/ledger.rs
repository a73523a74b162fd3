//! Player and match ledgers, and the leaderboard derived from them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use game_core::{GameMode, MatchResult};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Lifetime totals for one username
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub username: String,
    pub wins: u32,
    pub losses: u32,
    pub sats: u64,
}

impl PlayerRecord {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Self::default()
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Percentage of games won; 0 for a player with no games
    pub fn win_rate(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => f64::from(self.wins) / f64::from(games) * 100.0,
        }
    }
}

/// One stored match, player one being the left side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: u64,
    pub player_one: String,
    pub player_two: String,
    pub winner: String,
    pub points_one: u8,
    pub points_two: u8,
    pub games_one: u8,
    pub games_two: u8,
    pub mode: GameMode,
    pub sats_reward: u32,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub username: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub sats: u64,
}

/// Both ledgers together. Stores wrap this and decide where it lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    players: BTreeMap<String, PlayerRecord>,
    matches: Vec<MatchRecord>,
    next_id: u64,
}

fn check_name(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidResult("player name is empty".into()));
    }
    Ok(())
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit the winner, debit the loser and append the match record.
    pub fn apply(&mut self, result: &MatchResult) -> Result<MatchRecord, StoreError> {
        check_name(&result.player_name)?;
        check_name(&result.opponent_name)?;
        if result.player_name == result.opponent_name {
            return Err(StoreError::InvalidResult(format!(
                "`{}` cannot play against themselves",
                result.player_name
            )));
        }

        let reward = result.winner_reward();
        let winner = result.winner_name().to_string();
        let loser = result.loser_name().to_string();

        let entry = self
            .players
            .entry(winner.clone())
            .or_insert_with(|| PlayerRecord::new(&winner));
        entry.wins += 1;
        entry.sats += u64::from(reward);

        self.players
            .entry(loser.clone())
            .or_insert_with(|| PlayerRecord::new(&loser))
            .losses += 1;

        self.next_id += 1;
        let record = MatchRecord {
            id: self.next_id,
            player_one: result.player_name.clone(),
            player_two: result.opponent_name.clone(),
            winner,
            points_one: result.points_for,
            points_two: result.points_against,
            games_one: result.games_for,
            games_two: result.games_against,
            mode: result.mode,
            sats_reward: reward,
            ended_at: result.timestamp,
        };
        self.matches.push(record.clone());
        Ok(record)
    }

    pub fn player(&self, username: &str) -> Option<&PlayerRecord> {
        self.players.get(username)
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Ranked by wins, then sats, then username
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut players: Vec<&PlayerRecord> = self.players.values().collect();
        players.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(b.sats.cmp(&a.sats))
                .then_with(|| a.username.cmp(&b.username))
        });
        players
            .into_iter()
            .enumerate()
            .map(|(i, p)| LeaderboardEntry {
                rank: i + 1,
                username: p.username.clone(),
                wins: p.wins,
                losses: p.losses,
                win_rate: p.win_rate(),
                sats: p.sats,
            })
            .collect()
    }
}
