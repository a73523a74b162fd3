use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ai::AiProfile;
use crate::components::Side;
use crate::error::ConfigError;
use crate::params::Params;

/// Physics and match-flow tuning
#[derive(Debug, Clone)]
pub struct Config {
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_inset: f32,
    pub ball_radius: f32,
    pub ball_speed_initial: f32,
    pub ball_speed_max: f32,
    pub ball_speed_increase: f32,
    pub max_bounce_angle: f32, // radians
    pub bounce_jitter: f32,    // radians
    pub serve_min_angle: f32,  // radians
    pub serve_max_angle: f32,  // radians
    pub serve_delay: f32,
    pub game_break: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_width: Params::ARENA_WIDTH,
            arena_height: Params::ARENA_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_speed: Params::PADDLE_SPEED,
            paddle_inset: Params::PADDLE_INSET,
            ball_radius: Params::BALL_RADIUS,
            ball_speed_initial: Params::BALL_SPEED_INITIAL,
            ball_speed_max: Params::BALL_SPEED_MAX,
            ball_speed_increase: Params::BALL_SPEED_INCREASE,
            max_bounce_angle: Params::MAX_BOUNCE_ANGLE_DEG.to_radians(),
            bounce_jitter: Params::BOUNCE_JITTER_DEG.to_radians(),
            serve_min_angle: Params::SERVE_MIN_ANGLE_DEG.to_radians(),
            serve_max_angle: Params::SERVE_MAX_ANGLE_DEG.to_radians(),
            serve_delay: Params::SERVE_DELAY,
            game_break: Params::GAME_BREAK,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paddle_size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.paddle_width, self.paddle_height)
    }

    /// Reject tunings the tick loop cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("paddle_inset", self.paddle_inset),
            ("ball_radius", self.ball_radius),
            ("ball_speed_initial", self.ball_speed_initial),
            ("ball_speed_max", self.ball_speed_max),
            ("ball_speed_increase", self.ball_speed_increase),
            ("max_bounce_angle", self.max_bounce_angle),
            ("bounce_jitter", self.bounce_jitter),
            ("serve_min_angle", self.serve_min_angle),
            ("serve_max_angle", self.serve_max_angle),
            ("serve_delay", self.serve_delay),
            ("game_break", self.game_break),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_radius", self.ball_radius),
            ("ball_speed_initial", self.ball_speed_initial),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, value)| *value <= 0.0) {
            return Err(invalid(format!("{name} must be positive, got {value}")));
        }
        if self.ball_speed_max < self.ball_speed_initial {
            return Err(invalid("ball_speed_max is below ball_speed_initial"));
        }
        if self.ball_speed_increase < 1.0 {
            return Err(invalid("ball_speed_increase must be at least 1.0"));
        }
        if self.paddle_height >= self.arena_height || self.ball_radius * 2.0 >= self.arena_height {
            return Err(invalid("paddle and ball must fit inside the arena"));
        }
        // Paddles sit fully inside the arena, clear of the centre line
        if self.paddle_inset - self.paddle_width / 2.0 < 0.0
            || self.paddle_inset + self.paddle_width / 2.0 >= self.arena_width / 2.0
        {
            return Err(invalid("paddle_inset puts the paddle outside its half"));
        }
        // Anything at or past a right angle would send the ball back into the paddle
        if !(self.max_bounce_angle > 0.0 && self.max_bounce_angle < FRAC_PI_2) {
            return Err(invalid("max_bounce_angle must be between 0 and 90 degrees"));
        }
        if self.bounce_jitter < 0.0 {
            return Err(invalid("bounce_jitter cannot be negative"));
        }
        if self.serve_min_angle < 0.0
            || self.serve_min_angle > self.serve_max_angle
            || self.serve_max_angle >= FRAC_PI_2
        {
            return Err(invalid("serve angle range is invalid"));
        }
        if self.serve_delay < 0.0 || self.game_break < 0.0 {
            return Err(invalid("delays cannot be negative"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidTuning(reason.into())
}

/// Match format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum GameMode {
    #[default]
    #[serde(rename = "FIRST_TO_5")]
    FirstTo5,
    #[serde(rename = "FIRST_TO_10")]
    FirstTo10,
    #[serde(rename = "BEST_OF_3")]
    BestOf3,
}

impl GameMode {
    /// Points needed to take a single game
    pub fn points_to_win(self) -> u8 {
        match self {
            GameMode::FirstTo5 | GameMode::BestOf3 => 5,
            GameMode::FirstTo10 => 10,
        }
    }

    /// Games needed to take the match
    pub fn games_to_win(self) -> u8 {
        match self {
            GameMode::FirstTo5 | GameMode::FirstTo10 => 1,
            GameMode::BestOf3 => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::FirstTo5 => "FIRST_TO_5",
            GameMode::FirstTo10 => "FIRST_TO_10",
            GameMode::BestOf3 => "BEST_OF_3",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "FIRST_TO_5" | "FT5" => Ok(GameMode::FirstTo5),
            "FIRST_TO_10" | "FT10" => Ok(GameMode::FirstTo10),
            "BEST_OF_3" | "BO3" => Ok(GameMode::BestOf3),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for GameMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// AI opponent strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNames {
    #[serde(default = "default_left_name")]
    pub left: String,
    #[serde(default = "default_right_name")]
    pub right: String,
}

fn default_left_name() -> String {
    "Player1".to_string()
}

fn default_right_name() -> String {
    "AI".to_string()
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self {
            left: default_left_name(),
            right: default_right_name(),
        }
    }
}

impl PlayerNames {
    pub fn get(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

const MAX_NAME_LEN: usize = 32;

fn default_true() -> bool {
    true
}

/// Settings consumed once at match start. Unrecognised fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default = "default_true", alias = "ai_enabled")]
    pub ai_enabled: bool,
    #[serde(default, alias = "ai_difficulty")]
    pub ai_difficulty: Difficulty,
    #[serde(default, alias = "player_names")]
    pub player_names: PlayerNames,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            ai_enabled: true,
            ai_difficulty: Difficulty::default(),
            player_names: PlayerNames::default(),
        }
    }
}

impl MatchConfig {
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Two humans, no AI paddle
    pub fn local(mode: GameMode, left: &str, right: &str) -> Self {
        Self {
            mode,
            ai_enabled: false,
            ai_difficulty: Difficulty::default(),
            player_names: PlayerNames {
                left: left.to_string(),
                right: right.to_string(),
            },
        }
    }

    pub fn against_ai(mode: GameMode, difficulty: Difficulty, player: &str) -> Self {
        Self {
            mode,
            ai_enabled: true,
            ai_difficulty: difficulty,
            player_names: PlayerNames {
                left: player.to_string(),
                right: default_right_name(),
            },
        }
    }

    /// Parse and validate a JSON match config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for side in [Side::Left, Side::Right] {
            let name = self.player_names.get(side);
            let reason = if name.trim().is_empty() {
                Some("must not be empty")
            } else if name.chars().count() > MAX_NAME_LEN {
                Some("must be at most 32 characters")
            } else if name.chars().any(char::is_control) {
                Some("must not contain control characters")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ConfigError::InvalidPlayerName { side, reason });
            }
        }
        Ok(())
    }

    /// Profile driving the right paddle, if the AI is enabled
    pub fn ai_profile(&self) -> Option<AiProfile> {
        self.ai_enabled
            .then(|| AiProfile::for_difficulty(self.ai_difficulty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Config::new().validate().is_ok());
    }

    #[test]
    fn test_tuning_rejects_zero_radius() {
        let config = Config {
            ball_radius: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTuning(_))
        ));
    }

    fn rejects(config: Config) -> bool {
        matches!(config.validate(), Err(ConfigError::InvalidTuning(_)))
    }

    #[test]
    fn test_tuning_rejects_non_finite_fields() {
        assert!(rejects(Config {
            serve_delay: f32::NAN,
            ..Config::default()
        }));
        assert!(rejects(Config {
            game_break: f32::NAN,
            ..Config::default()
        }));
        assert!(rejects(Config {
            ball_speed_max: f32::INFINITY,
            ..Config::default()
        }));
        assert!(rejects(Config {
            ball_speed_increase: f32::NAN,
            ..Config::default()
        }));
        assert!(rejects(Config {
            paddle_inset: f32::NAN,
            ..Config::default()
        }));
    }

    #[test]
    fn test_tuning_rejects_bounce_angle_at_or_past_right_angle() {
        assert!(rejects(Config {
            max_bounce_angle: 120f32.to_radians(),
            ..Config::default()
        }));
        assert!(rejects(Config {
            max_bounce_angle: FRAC_PI_2,
            ..Config::default()
        }));
        assert!(rejects(Config {
            max_bounce_angle: 0.0,
            ..Config::default()
        }));
        assert!(Config {
            max_bounce_angle: 85f32.to_radians(),
            ..Config::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_tuning_rejects_negative_jitter() {
        assert!(rejects(Config {
            bounce_jitter: -0.1,
            ..Config::default()
        }));
    }

    #[test]
    fn test_tuning_rejects_paddle_past_the_goal_line() {
        assert!(rejects(Config {
            paddle_inset: 0.2,
            ..Config::default()
        }));
        assert!(rejects(Config {
            paddle_inset: 16.0,
            ..Config::default()
        }));
        assert!(Config {
            paddle_inset: 0.4,
            ..Config::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_mode_targets() {
        assert_eq!(GameMode::FirstTo5.points_to_win(), 5);
        assert_eq!(GameMode::FirstTo10.points_to_win(), 10);
        assert_eq!(GameMode::BestOf3.points_to_win(), 5);
        assert_eq!(GameMode::BestOf3.games_to_win(), 2);
        assert_eq!(GameMode::FirstTo10.games_to_win(), 1);
    }

    #[test]
    fn test_mode_from_str_is_lenient_on_case_and_separators() {
        assert_eq!("first-to-10".parse::<GameMode>().unwrap(), GameMode::FirstTo10);
        assert_eq!("best of 3".parse::<GameMode>().unwrap(), GameMode::BestOf3);
        assert_eq!("FIRST_TO_5".parse::<GameMode>().unwrap(), GameMode::FirstTo5);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = "FIRST_TO_7".parse::<GameMode>().unwrap_err();
        assert!(err.to_string().contains("FIRST_TO_7"));
    }

    #[test]
    fn test_from_json_full() {
        let json = r#"{
            "mode": "BEST_OF_3",
            "aiEnabled": true,
            "aiDifficulty": "HARD",
            "playerNames": { "left": "alice", "right": "bot" }
        }"#;
        let config = MatchConfig::from_json(json).unwrap();
        assert_eq!(config.mode, GameMode::BestOf3);
        assert_eq!(config.ai_difficulty, Difficulty::Hard);
        assert_eq!(config.player_names.left, "alice");
        assert_eq!(config.ai_profile().unwrap().difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_from_json_ignores_unknown_fields_and_fills_defaults() {
        let json = r#"{ "mode": "first_to_10", "theme": "neon", "volume": 3 }"#;
        let config = MatchConfig::from_json(json).unwrap();
        assert_eq!(config.mode, GameMode::FirstTo10);
        assert!(config.ai_enabled);
        assert_eq!(config.ai_difficulty, Difficulty::Medium);
        assert_eq!(config.player_names, PlayerNames::default());
    }

    #[test]
    fn test_from_json_accepts_snake_case_keys() {
        let json = r#"{ "ai_enabled": false, "player_names": { "left": "a", "right": "b" } }"#;
        let config = MatchConfig::from_json(json).unwrap();
        assert!(!config.ai_enabled);
        assert!(config.ai_profile().is_none());
        assert_eq!(config.player_names.right, "b");
    }

    #[test]
    fn test_from_json_rejects_unknown_mode() {
        let err = MatchConfig::from_json(r#"{ "mode": "SUDDEN_DEATH" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("SUDDEN_DEATH"));
    }

    #[test]
    fn test_from_json_rejects_unknown_difficulty() {
        let err = MatchConfig::from_json(r#"{ "aiDifficulty": "NIGHTMARE" }"#).unwrap_err();
        assert!(err.to_string().contains("NIGHTMARE"));
    }

    #[test]
    fn test_blank_player_name_is_rejected() {
        let config = MatchConfig::local(GameMode::FirstTo5, "  ", "bob");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlayerName {
                side: Side::Left,
                ..
            })
        ));
    }
}
