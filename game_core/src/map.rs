use glam::Vec2;

use crate::components::Side;
use crate::config::Config;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Point of the box closest to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    /// Circle overlap test: the clamped centre must be strictly closer than
    /// the radius.
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = self.closest_point(center);
        (center - closest).length_squared() < radius * radius
    }
}

/// Playfield geometry: top wall at `y = 0`, bottom wall at `y = height`,
/// scoring boundaries at `x = 0` and `x = width`.
#[derive(Debug, Clone, Copy)]
pub struct GameMap {
    pub width: f32,
    pub height: f32,
    pub paddle_inset: f32,
}

impl GameMap {
    pub fn new(config: &Config) -> Self {
        Self {
            width: config.arena_width,
            height: config.arena_height,
            paddle_inset: config.paddle_inset,
        }
    }

    pub fn ball_spawn(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Centre of a paddle at the start of a rally
    pub fn paddle_spawn(&self, side: Side) -> Vec2 {
        Vec2::new(self.paddle_x(side), self.height / 2.0)
    }

    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.paddle_inset,
            Side::Right => self.width - self.paddle_inset,
        }
    }

    /// Clamp a centre y so an object of the given half extent stays inside
    /// the walls.
    pub fn clamp_y(&self, y: f32, half_extent: f32) -> f32 {
        if half_extent * 2.0 >= self.height {
            return self.height / 2.0;
        }
        y.clamp(half_extent, self.height - half_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_circle_touching_is_not_intersecting() {
        let rect = Aabb::from_center_size(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        // Exactly one radius away from the right face
        assert!(!rect.intersects_circle(Vec2::new(1.5, 0.0), 0.5));
        assert!(rect.intersects_circle(Vec2::new(1.49, 0.0), 0.5));
    }

    #[test]
    fn test_aabb_corner_distance() {
        let rect = Aabb::new(Vec2::ZERO, Vec2::ONE);
        let p = Vec2::new(1.3, 1.4);
        assert_eq!(rect.closest_point(p), Vec2::ONE);
        assert!(rect.intersects_circle(p, 0.51));
        assert!(!rect.intersects_circle(p, 0.49));
    }

    #[test]
    fn test_paddle_positions() {
        let map = GameMap::new(&Config::default());
        assert_eq!(map.paddle_x(Side::Left), 1.5);
        assert_eq!(map.paddle_x(Side::Right), 30.5);
        assert_eq!(map.ball_spawn(), Vec2::new(16.0, 12.0));
    }

    #[test]
    fn test_clamp_y() {
        let map = GameMap::new(&Config::default());
        assert_eq!(map.clamp_y(-5.0, 2.0), 2.0);
        assert_eq!(map.clamp_y(100.0, 2.0), 22.0);
        assert_eq!(map.clamp_y(10.0, 2.0), 10.0);
    }
}
