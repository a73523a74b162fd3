use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::math::{heading, normalize, reflect};
use crate::{Ball, Config, Events, GameEvent, GameMap, GameRng, Paddle};

/// Check ball collisions with paddles, then walls.
///
/// A paddle hit ends the check for that ball: the wall test is skipped for
/// the tick, and the next tick picks up any wall contact.
pub fn check_collisions(
    world: &mut World,
    map: &GameMap,
    config: &Config,
    events: &mut Events,
    rng: &mut GameRng,
) {
    // Collect paddle data without holding borrows
    let paddles: Vec<Paddle> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, paddle)| *paddle)
        .collect();

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let hit = paddles
            .iter()
            .find(|paddle| resolve_paddle_hit(ball, paddle, config, rng));

        if let Some(paddle) = hit {
            events.push(GameEvent::PaddleHit {
                side: paddle.side,
                speed: ball.speed,
            });
        } else if resolve_wall_hit(ball, map) {
            events.push(GameEvent::WallHit);
        }
    }
}

/// Bounce the ball off the top or bottom wall.
///
/// Returns `true` when the vertical velocity was flipped. A ball touching a
/// wall while already moving away is only clamped back inside.
pub fn resolve_wall_hit(ball: &mut Ball, map: &GameMap) -> bool {
    let r = ball.radius;
    if ball.pos.y - r <= 0.0 {
        ball.pos.y = r;
        if ball.vel.y < 0.0 {
            ball.vel = reflect(ball.vel, Vec2::Y);
            return true;
        }
    } else if ball.pos.y + r >= map.height {
        ball.pos.y = map.height - r;
        if ball.vel.y > 0.0 {
            ball.vel = reflect(ball.vel, Vec2::NEG_Y);
            return true;
        }
    }
    false
}

/// Circle-vs-rectangle paddle bounce.
///
/// On contact with a ball travelling into the paddle: speed is multiplied by
/// the hit factor (capped), the outgoing angle follows the strike point on
/// the paddle plus a little jitter, `vx` points away from the paddle, and the
/// ball is pushed out along the contact normal. A ball whose centre is
/// already behind the paddle's centre line has been missed and passes on.
pub fn resolve_paddle_hit(
    ball: &mut Ball,
    paddle: &Paddle,
    config: &Config,
    rng: &mut GameRng,
) -> bool {
    let rect = paddle.rect();
    if !rect.intersects_circle(ball.pos, ball.radius) || !ball.is_moving_toward(paddle.side) {
        return false;
    }

    let away = paddle.side.opposite();
    if (ball.pos.x - paddle.pos.x) * away.sign() < 0.0 {
        return false;
    }

    // -1 at the top edge, 1 at the bottom edge
    let reach = paddle.half_height() + ball.radius;
    let hit_offset = ((ball.pos.y - paddle.pos.y) / reach).clamp(-1.0, 1.0);
    let jitter = if config.bounce_jitter > 0.0 {
        rng.0.gen_range(-config.bounce_jitter..=config.bounce_jitter)
    } else {
        0.0
    };
    let angle = (hit_offset * config.max_bounce_angle + jitter)
        .clamp(-config.max_bounce_angle, config.max_bounce_angle);

    let speed = (ball.speed * config.ball_speed_increase)
        .min(config.ball_speed_max)
        .max(ball.speed);
    ball.speed = speed;
    ball.vel = heading(angle, away.sign()) * speed;

    let closest = rect.closest_point(ball.pos);
    let normal = normalize(ball.pos - closest);
    if normal == Vec2::ZERO {
        // Centre already inside the paddle: put it back in front of the face
        ball.pos.x = paddle.face_x() + away.sign() * ball.radius;
    } else {
        ball.pos = closest + normal * ball.radius;
    }
    true
}
