use serde::{Deserialize, Serialize};

use crate::components::{Direction, Side};

/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy)]
pub struct Time {
    pub dt: f32,  // Delta time for this step
    pub now: f32, // Total elapsed time
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self {
            dt: crate::params::Params::FIXED_DT,
            now: 0.0,
        }
    }
}

/// Match score. Points belong to the current game; games only matter in
/// best-of-three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub left_points: u8,
    pub right_points: u8,
    pub left_games: u8,
    pub right_games: u8,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self, side: Side) -> u8 {
        match side {
            Side::Left => self.left_points,
            Side::Right => self.right_points,
        }
    }

    pub fn games(&self, side: Side) -> u8 {
        match side {
            Side::Left => self.left_games,
            Side::Right => self.right_games,
        }
    }

    pub fn total_points(&self) -> u32 {
        self.left_points as u32 + self.right_points as u32
    }

    pub fn add_point(&mut self, side: Side) {
        match side {
            Side::Left => self.left_points = self.left_points.saturating_add(1),
            Side::Right => self.right_points = self.right_points.saturating_add(1),
        }
    }

    pub fn add_game(&mut self, side: Side) {
        match side {
            Side::Left => self.left_games = self.left_games.saturating_add(1),
            Side::Right => self.right_games = self.right_games.saturating_add(1),
        }
    }

    pub fn reset_points(&mut self) {
        self.left_points = 0;
        self.right_points = 0;
    }

    /// Side whose points have reached `target`, if any
    pub fn game_winner(&self, target: u8) -> Option<Side> {
        if self.left_points >= target {
            Some(Side::Left)
        } else if self.right_points >= target {
            Some(Side::Right)
        } else {
            None
        }
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Something observable that happened during an update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PaddleHit { side: Side, speed: f32 },
    WallHit,
    Served { toward: Side },
    PointScored { scorer: Side, score: Score },
    GameWon { winner: Side, score: Score },
    MatchWon { winner: Side, score: Score },
    Paused,
    Resumed,
    Reset,
    SoundToggled { enabled: bool },
    ResultSaveFailed { reason: String },
}

/// Events that occurred during the last update
#[derive(Debug, Clone, Default)]
pub struct Events {
    list: Vec<GameEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub fn push(&mut self, event: GameEvent) {
        self.list.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.list
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn ball_hit_paddle(&self) -> bool {
        self.list
            .iter()
            .any(|e| matches!(e, GameEvent::PaddleHit { .. }))
    }

    pub fn ball_hit_wall(&self) -> bool {
        self.list.iter().any(|e| matches!(e, GameEvent::WallHit))
    }
}

/// Commands an input adapter can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Paddle { side: Side, direction: Direction },
    Pause,
    Resume,
    Reset,
    ToggleSound,
    /// Launch the ball without waiting for the serve delay
    Serve,
}

/// Command buffer, drained once per update in arrival order
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pub commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn push_input(&mut self, side: Side, direction: Direction) {
        self.commands.push(Command::Paddle { side, direction });
    }

    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}
