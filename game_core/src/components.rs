use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::map::{Aabb, GameMap};
use crate::math::{heading, integrate};
use crate::resources::GameRng;

/// Which end of the table a paddle (or a point) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of the x axis pointing toward this side
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Vertical paddle command. `y` grows downward, so `Up` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    #[default]
    None,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
            Direction::None => 0.0,
        }
    }

    /// Wire form: -1 = up, 1 = down, anything else = none
    pub fn from_i8(dir: i8) -> Self {
        match dir {
            -1 => Direction::Up,
            1 => Direction::Down,
            _ => Direction::None,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            Direction::None => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Ai,
}

/// Paddle component - position is the rectangle centre
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: Side,
    pub controller: Controller,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Paddle {
    pub fn new(side: Side, controller: Controller, pos: Vec2, size: Vec2) -> Self {
        Self {
            side,
            controller,
            pos,
            size,
        }
    }

    pub fn half_height(&self) -> f32 {
        self.size.y / 2.0
    }

    pub fn rect(&self) -> Aabb {
        Aabb::from_center_size(self.pos, self.size)
    }

    /// x of the face the ball strikes
    pub fn face_x(&self) -> f32 {
        self.pos.x - self.side.sign() * self.size.x / 2.0
    }

    /// Move according to an intent, never overshooting its stop target and
    /// never leaving the arena.
    pub fn apply(&mut self, intent: &PaddleIntent, dt: f32, map: &GameMap) {
        let step = intent.dir.sign() * intent.speed * dt;
        if step == 0.0 {
            return;
        }
        let mut y = self.pos.y + step;
        if let Some(target) = intent.stop_at {
            y = if step > 0.0 {
                y.min(target.max(self.pos.y))
            } else {
                y.max(target.min(self.pos.y))
            };
        }
        self.pos.y = map.clamp_y(y, self.half_height());
    }
}

/// Movement intent for paddle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaddleIntent {
    pub dir: Direction,
    pub speed: f32,
    pub stop_at: Option<f32>,
}

impl PaddleIntent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn human(dir: Direction, speed: f32) -> Self {
        Self {
            dir,
            speed,
            stop_at: None,
        }
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub speed: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            speed: vel.length(),
        }
    }

    /// Integrate position by `vel * dt`
    pub fn advance(&mut self, dt: f32) {
        self.pos = integrate(self.pos, self.vel, dt);
    }

    /// Hold the ball motionless at the centre while waiting to serve
    pub fn park(&mut self, center: Vec2) {
        self.pos = center;
        self.vel = Vec2::ZERO;
        self.speed = 0.0;
    }

    /// Place at `center` heading toward `toward` at the base serve speed.
    ///
    /// The vertical component is never zero: the angle magnitude is drawn
    /// from `[min_angle, max_angle]` with a random sign.
    pub fn reset_to_serve(
        &mut self,
        toward: Side,
        center: Vec2,
        speed: f32,
        (min_angle, max_angle): (f32, f32),
        rng: &mut GameRng,
    ) {
        let magnitude = if max_angle > min_angle {
            rng.0.gen_range(min_angle..=max_angle)
        } else {
            min_angle
        };
        let angle = if rng.0.gen_bool(0.5) {
            magnitude
        } else {
            -magnitude
        };

        self.pos = center;
        self.speed = speed;
        self.vel = heading(angle, toward.sign()) * speed;
    }

    pub fn is_moving_toward(&self, side: Side) -> bool {
        self.vel.x * side.sign() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn map() -> GameMap {
        GameMap::new(&Config::default())
    }

    #[test]
    fn test_advance_is_linear() {
        let mut ball = Ball::new(Vec2::new(3.0, 4.0), Vec2::new(2.0, -1.0), 0.5);
        ball.advance(0.5);
        assert_eq!(ball.pos, Vec2::new(4.0, 3.5));
    }

    #[test]
    fn test_reset_to_serve_heads_toward_side() {
        let mut rng = GameRng::new(7);
        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO, 0.5);
        let config = Config::default();
        let range = (config.serve_min_angle, config.serve_max_angle);

        ball.reset_to_serve(Side::Left, Vec2::new(16.0, 12.0), 12.0, range, &mut rng);
        assert!(ball.vel.x < 0.0);
        ball.reset_to_serve(Side::Right, Vec2::new(16.0, 12.0), 12.0, range, &mut rng);
        assert!(ball.vel.x > 0.0);
    }

    #[test]
    fn test_reset_to_serve_angle_is_bounded_and_not_flat() {
        let mut rng = GameRng::new(99);
        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO, 0.5);
        let config = Config::default();
        let range = (config.serve_min_angle, config.serve_max_angle);

        for _ in 0..200 {
            ball.reset_to_serve(Side::Right, Vec2::ZERO, 12.0, range, &mut rng);
            let angle = (ball.vel.y / ball.vel.x).atan().abs();
            assert!(angle >= config.serve_min_angle - 1e-4);
            assert!(angle <= config.serve_max_angle + 1e-4);
        }
    }

    #[test]
    fn test_paddle_apply_clamps_to_arena() {
        let map = map();
        let mut paddle = Paddle::new(
            Side::Left,
            Controller::Human,
            map.paddle_spawn(Side::Left),
            Vec2::new(0.8, 4.0),
        );
        let intent = PaddleIntent::human(Direction::Up, 18.0);
        for _ in 0..200 {
            paddle.apply(&intent, 1.0 / 60.0, &map);
        }
        assert_eq!(paddle.pos.y, 2.0);
    }

    #[test]
    fn test_paddle_apply_stops_at_target() {
        let map = map();
        let mut paddle = Paddle::new(
            Side::Right,
            Controller::Ai,
            map.paddle_spawn(Side::Right),
            Vec2::new(0.8, 4.0),
        );
        let intent = PaddleIntent {
            dir: Direction::Down,
            speed: 18.0,
            stop_at: Some(12.1),
        };
        paddle.apply(&intent, 0.1, &map);
        assert!((paddle.pos.y - 12.1).abs() < 1e-6);
    }

    #[test]
    fn test_idle_intent_does_not_move() {
        let map = map();
        let start = map.paddle_spawn(Side::Left);
        let mut paddle = Paddle::new(Side::Left, Controller::Human, start, Vec2::new(0.8, 4.0));
        paddle.apply(&PaddleIntent::idle(), 0.1, &map);
        assert_eq!(paddle.pos, start);
    }

    #[test]
    fn test_face_x() {
        let map = map();
        let size = Vec2::new(0.8, 4.0);
        let paddle = |side| Paddle::new(side, Controller::Human, map.paddle_spawn(side), size);
        let (left, right) = (paddle(Side::Left), paddle(Side::Right));
        assert!((left.face_x() - 1.9).abs() < 1e-6);
        assert!((right.face_x() - 30.1).abs() < 1e-5);
    }
}
