//! Computer opponent
//!
//! The controller never sees more than a human would: it extrapolates the
//! ball's current straight-line path (unfolding wall bounces by mirroring),
//! blurs the result with a Gaussian error, and only re-reads the ball every
//! `reaction_delay` seconds. Between reads it keeps chasing the old target.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::components::{Ball, Direction, Paddle, PaddleIntent};
use crate::config::Difficulty;
use crate::map::GameMap;
use crate::math::fold_into;
use crate::params::Params;
use crate::resources::GameRng;

/// Errors are drawn from a normal distribution truncated at this many σ.
const ERROR_SIGMA_CAP: f32 = 3.0;

/// Fixed behaviour table per difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiProfile {
    pub difficulty: Difficulty,
    /// Seconds between target recomputations
    pub reaction_delay: f32,
    /// Standard deviation of the aim error, in arena units
    pub prediction_error: f32,
    /// Paddle speed cap, units per second
    pub max_speed: f32,
}

impl AiProfile {
    pub const EASY: AiProfile = AiProfile {
        difficulty: Difficulty::Easy,
        reaction_delay: 0.35,
        prediction_error: 1.6,
        max_speed: 9.0,
    };

    pub const MEDIUM: AiProfile = AiProfile {
        difficulty: Difficulty::Medium,
        reaction_delay: 0.18,
        prediction_error: 0.6,
        max_speed: 13.5,
    };

    pub const HARD: AiProfile = AiProfile {
        difficulty: Difficulty::Hard,
        reaction_delay: 0.02,
        prediction_error: 0.05,
        max_speed: 18.0,
    };

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

/// Where the ball centre will cross `contact_x`, with top/bottom bounces
/// folded in. `None` when the ball is not travelling toward `contact_x`.
pub fn predict_intercept(ball: &Ball, contact_x: f32, map: &GameMap) -> Option<f32> {
    if ball.vel.x == 0.0 {
        return None;
    }
    let time_to_reach = (contact_x - ball.pos.x) / ball.vel.x;
    if !time_to_reach.is_finite() || time_to_reach < 0.0 {
        return None;
    }
    let raw_y = ball.pos.y + ball.vel.y * time_to_reach;
    Some(fold_into(raw_y, ball.radius, map.height - ball.radius))
}

/// AI component attached to a computer-controlled paddle
#[derive(Debug, Clone)]
pub struct AiController {
    pub profile: AiProfile,
    target: Option<f32>,
    cooldown: f32,
}

impl AiController {
    pub fn new(profile: AiProfile) -> Self {
        Self {
            profile,
            target: None,
            cooldown: 0.0,
        }
    }

    /// Current aim point, if any
    pub fn target(&self) -> Option<f32> {
        self.target
    }

    /// Forget the held target; the next decision re-reads the ball.
    pub fn forget(&mut self) {
        self.target = None;
        self.cooldown = 0.0;
    }

    /// Decide this tick's movement. `ball` is `None` when nothing is in
    /// play, which idles the paddle.
    pub fn decide(
        &mut self,
        paddle: &Paddle,
        ball: Option<&Ball>,
        map: &GameMap,
        paddle_speed: f32,
        dt: f32,
        rng: &mut GameRng,
    ) -> PaddleIntent {
        let Some(ball) = ball else {
            self.forget();
            return PaddleIntent::idle();
        };

        self.cooldown -= dt;
        if self.target.is_none() || self.cooldown <= 0.0 {
            let target = self.aim(paddle, ball, map, rng);
            tracing::debug!(side = %paddle.side, target, "ai retarget");
            self.target = Some(target);
            self.cooldown = self.profile.reaction_delay;
        }

        let Some(target) = self.target else {
            return PaddleIntent::idle();
        };
        let diff = target - paddle.pos.y;
        let dir = if diff > Params::AI_DEADZONE {
            Direction::Down
        } else if diff < -Params::AI_DEADZONE {
            Direction::Up
        } else {
            Direction::None
        };

        PaddleIntent {
            dir,
            speed: self.profile.max_speed.min(paddle_speed),
            stop_at: Some(target),
        }
    }

    fn aim(&self, paddle: &Paddle, ball: &Ball, map: &GameMap, rng: &mut GameRng) -> f32 {
        let contact_x = paddle.face_x() - paddle.side.sign() * ball.radius;
        let incoming = ball.is_moving_toward(paddle.side);

        let target = match predict_intercept(ball, contact_x, map) {
            Some(y) if incoming => y + self.sample_error(rng),
            // Ball heading away: cover the middle of the table
            _ => map.height / 2.0,
        };
        map.clamp_y(target, paddle.half_height())
    }

    fn sample_error(&self, rng: &mut GameRng) -> f32 {
        let z: f32 = rng.0.sample(StandardNormal);
        z.clamp(-ERROR_SIGMA_CAP, ERROR_SIGMA_CAP) * self.profile.prediction_error
    }
}
