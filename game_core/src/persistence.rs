//! Completed-match results and the seam they leave the engine through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Difficulty, GameMode, MatchConfig};
use crate::error::PersistError;
use crate::resources::Score;
use crate::Side;

/// Base reward for winning a match in each mode
pub fn mode_reward(mode: GameMode) -> u32 {
    match mode {
        GameMode::FirstTo5 => 100,
        GameMode::FirstTo10 => 200,
        GameMode::BestOf3 => 300,
    }
}

/// Winner's reward. `difficulty` is `None` for a match without an AI
/// opponent, which pays the base amount.
pub fn sats_reward(mode: GameMode, difficulty: Option<Difficulty>) -> u32 {
    let multiplier = match difficulty {
        None | Some(Difficulty::Easy) => 1,
        Some(Difficulty::Medium) => 2,
        Some(Difficulty::Hard) => 3,
    };
    mode_reward(mode) * multiplier
}

/// Outcome of one finished match, seen from the left player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player_name: String,
    pub opponent_name: String,
    pub won: bool,
    pub sats_earned: u32,
    pub points_for: u8,
    pub points_against: u8,
    pub games_for: u8,
    pub games_against: u8,
    pub mode: GameMode,
    /// AI strength the match was played against, if any
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub timestamp: DateTime<Utc>,
}

impl MatchResult {
    /// Build the result for a finished match.
    pub fn from_match(
        settings: &MatchConfig,
        winner: Side,
        score: &Score,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let difficulty = settings.ai_enabled.then_some(settings.ai_difficulty);
        let won = winner == Side::Left;
        Self {
            player_name: settings.player_names.left.clone(),
            opponent_name: settings.player_names.right.clone(),
            won,
            sats_earned: if won {
                sats_reward(settings.mode, difficulty)
            } else {
                0
            },
            points_for: score.left_points,
            points_against: score.right_points,
            games_for: score.left_games,
            games_against: score.right_games,
            mode: settings.mode,
            difficulty,
            timestamp,
        }
    }

    /// Reward credited to whoever won, whichever side that was
    pub fn winner_reward(&self) -> u32 {
        sats_reward(self.mode, self.difficulty)
    }

    pub fn winner_name(&self) -> &str {
        if self.won {
            &self.player_name
        } else {
            &self.opponent_name
        }
    }

    pub fn loser_name(&self) -> &str {
        if self.won {
            &self.opponent_name
        } else {
            &self.player_name
        }
    }
}

/// Destination for finished match results.
///
/// Implementations should return quickly; the session calls `save` from
/// inside an update.
pub trait ResultSink: Send {
    fn save(&mut self, result: &MatchResult) -> Result<(), PersistError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_score() -> Score {
        Score {
            left_points: 5,
            right_points: 3,
            left_games: 0,
            right_games: 0,
        }
    }

    #[test]
    fn test_reward_table() {
        assert_eq!(sats_reward(GameMode::FirstTo5, None), 100);
        assert_eq!(sats_reward(GameMode::FirstTo10, Some(Difficulty::Easy)), 200);
        assert_eq!(sats_reward(GameMode::BestOf3, Some(Difficulty::Medium)), 600);
        assert_eq!(sats_reward(GameMode::FirstTo5, Some(Difficulty::Hard)), 300);
        assert_eq!(sats_reward(GameMode::BestOf3, Some(Difficulty::Hard)), 900);
    }

    #[test]
    fn test_result_for_left_win() {
        let settings = MatchConfig::against_ai(GameMode::FirstTo5, Difficulty::Hard, "alice");
        let result = MatchResult::from_match(&settings, Side::Left, &final_score(), Utc::now());

        assert!(result.won);
        assert_eq!(result.player_name, "alice");
        assert_eq!(result.opponent_name, "AI");
        assert_eq!(result.sats_earned, 300);
        assert_eq!(result.points_for, 5);
        assert_eq!(result.points_against, 3);
        assert_eq!(result.winner_name(), "alice");
    }

    #[test]
    fn test_loser_earns_nothing() {
        let settings = MatchConfig::local(GameMode::FirstTo10, "alice", "bob");
        let result = MatchResult::from_match(&settings, Side::Right, &final_score(), Utc::now());

        assert!(!result.won);
        assert_eq!(result.sats_earned, 0);
        assert_eq!(result.difficulty, None);
        assert_eq!(result.winner_name(), "bob");
        assert_eq!(result.loser_name(), "alice");
        assert_eq!(result.winner_reward(), 200);
    }

    #[test]
    fn test_result_json_shape() {
        let settings = MatchConfig::against_ai(GameMode::BestOf3, Difficulty::Easy, "alice");
        let result = MatchResult::from_match(&settings, Side::Left, &final_score(), Utc::now());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["mode"], "BEST_OF_3");
        assert_eq!(json["difficulty"], "EASY");

        let back: MatchResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
