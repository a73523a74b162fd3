use crate::{Ball, GameMap, Side};
use hecs::World;

/// Which side earns the point if the ball has fully crossed a goal line.
///
/// Crossing the left edge is a point for Right and vice versa.
pub fn boundary_exit(ball: &Ball, map: &GameMap) -> Option<Side> {
    if ball.pos.x - ball.radius < 0.0 {
        Some(Side::Right)
    } else if ball.pos.x + ball.radius > map.width {
        Some(Side::Left)
    } else {
        None
    }
}

/// Check if the ball left the arena.
///
/// Only reports the scorer; the caller owns the score and the ball reset.
pub fn check_scoring(world: &World, map: &GameMap) -> Option<Side> {
    world
        .query::<&Ball>()
        .iter()
        .find_map(|(_entity, ball)| boundary_exit(ball, map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, Config};
    use glam::Vec2;

    fn setup_world() -> (World, Config, GameMap) {
        let config = Config::new();
        let map = GameMap::new(&config);
        (World::new(), config, map)
    }

    #[test]
    fn test_right_player_scores_when_ball_exits_left() {
        let (mut world, config, map) = setup_world();
        create_ball(&mut world, Vec2::new(0.4, 12.0), Vec2::new(-8.0, 0.0), config.ball_radius);

        assert_eq!(check_scoring(&world, &map), Some(Side::Right));
    }

    #[test]
    fn test_left_player_scores_when_ball_exits_right() {
        let (mut world, config, map) = setup_world();
        create_ball(
            &mut world,
            Vec2::new(map.width - 0.4, 12.0),
            Vec2::new(8.0, 0.0),
            config.ball_radius,
        );

        assert_eq!(check_scoring(&world, &map), Some(Side::Left));
    }

    #[test]
    fn test_touching_the_edge_is_not_a_point() {
        let (_, config, map) = setup_world();
        let r = config.ball_radius;
        let left = Ball::new(Vec2::new(r, 12.0), Vec2::new(-8.0, 0.0), r);
        let right = Ball::new(Vec2::new(map.width - r, 12.0), Vec2::new(8.0, 0.0), r);

        assert_eq!(boundary_exit(&left, &map), None);
        assert_eq!(boundary_exit(&right, &map), None);
    }

    #[test]
    fn test_no_scoring_when_ball_in_bounds() {
        let (mut world, config, map) = setup_world();
        create_ball(&mut world, Vec2::new(16.0, 12.0), Vec2::new(8.0, 4.0), config.ball_radius);

        assert_eq!(check_scoring(&world, &map), None);
    }

    #[test]
    fn test_no_scoring_without_ball() {
        let (world, _, map) = setup_world();
        assert_eq!(check_scoring(&world, &map), None);
    }
}
