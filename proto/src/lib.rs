//! Wire protocol between a match session and its remote players/renderers
//!
//! Uses postcard for compact binary serialization

use game_core::{Command, Direction, GameEvent, MatchState, Score, Side, Snapshot};
use postcard::{from_bytes, to_allocvec};

/// Wire id for a side: 0 = left, 1 = right
pub fn side_id(side: Side) -> u8 {
    side.index() as u8
}

pub fn side_from_id(id: u8) -> Option<Side> {
    match id {
        0 => Some(Side::Left),
        1 => Some(Side::Right),
        _ => None,
    }
}

// ============================================================================
// C2S Messages (Client to Server)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum C2S {
    /// Paddle input: -1 = up, 0 = stop, 1 = down
    Input { side: u8, dir: i8 },
    Pause,
    Resume,
    Reset,
    ToggleSound,
    Serve,
}

impl C2S {
    pub fn input(side: Side, direction: Direction) -> Self {
        C2S::Input {
            side: side_id(side),
            dir: direction.as_i8(),
        }
    }

    /// Translate into an engine command.
    ///
    /// An unknown side id yields no command; an out-of-range direction is
    /// read as "stop".
    pub fn to_command(self) -> Option<Command> {
        match self {
            C2S::Input { side, dir } => side_from_id(side).map(|side| Command::Paddle {
                side,
                direction: Direction::from_i8(dir),
            }),
            C2S::Pause => Some(Command::Pause),
            C2S::Resume => Some(Command::Resume),
            C2S::Reset => Some(Command::Reset),
            C2S::ToggleSound => Some(Command::ToggleSound),
            C2S::Serve => Some(Command::Serve),
        }
    }
}

// ============================================================================
// S2C Messages (Server to Client)
// ============================================================================

/// Flat per-update view of a match
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotMsg {
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_radius: f32,
    pub paddle_left_y: f32,
    pub paddle_right_y: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub score_left: u8,
    pub score_right: u8,
    pub games_left: u8,
    pub games_right: u8,
    pub timer: f32,
    pub state: MatchState,
    /// Mode name, e.g. `FIRST_TO_5`
    pub mode: String,
    pub winner: Option<u8>,
    pub sound_enabled: bool,
    pub save_warning: Option<String>,
}

impl From<&Snapshot> for SnapshotMsg {
    fn from(snap: &Snapshot) -> Self {
        let [left, right] = snap.paddles;
        Self {
            ball_x: snap.ball.pos.x,
            ball_y: snap.ball.pos.y,
            ball_radius: snap.ball.radius,
            paddle_left_y: left.pos.y,
            paddle_right_y: right.pos.y,
            paddle_width: left.size.x,
            paddle_height: left.size.y,
            score_left: snap.score.left_points,
            score_right: snap.score.right_points,
            games_left: snap.score.left_games,
            games_right: snap.score.right_games,
            timer: snap.timer,
            state: snap.state,
            mode: snap.mode.as_str().to_string(),
            winner: snap.winner.map(side_id),
            sound_enabled: snap.sound_enabled,
            save_warning: snap.save_warning.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum S2C {
    Snapshot(SnapshotMsg),
    Event(GameEvent),
    MatchOver {
        winner: u8, // 0 = left, 1 = right
        score: Score,
    },
}

impl S2C {
    /// Messages for one session update: the snapshot first, then its events,
    /// then `MatchOver` if the update finished the match.
    pub fn for_update(snapshot: &Snapshot, events: &[GameEvent]) -> Vec<S2C> {
        let mut out = Vec::with_capacity(events.len() + 2);
        out.push(S2C::Snapshot(snapshot.into()));
        for event in events {
            out.push(S2C::Event(event.clone()));
            if let GameEvent::MatchWon { winner, score } = event {
                out.push(S2C::MatchOver {
                    winner: side_id(*winner),
                    score: *score,
                });
            }
        }
        out
    }
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl C2S {
    /// Serialize C2S message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize C2S message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}

impl S2C {
    /// Serialize S2C message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize S2C message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}
