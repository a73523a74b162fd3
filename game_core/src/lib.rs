pub mod ai;
pub mod components;
pub mod config;
pub mod error;
pub mod map;
pub mod math;
pub mod params;
pub mod persistence;
pub mod resources;
pub mod session;
pub mod systems;

pub use ai::*;
pub use components::*;
pub use config::*;
pub use error::*;
pub use map::*;
pub use params::*;
pub use persistence::*;
pub use resources::*;
pub use session::*;

use hecs::World;
use systems::*;

/// Advance one fixed rally tick.
///
/// Order is AI, paddles, ball, collisions, scoring. Human intents are
/// ingested by the caller once per update, before the first tick. Returns
/// the scoring side if the ball left the arena during this tick.
pub fn step(
    world: &mut World,
    time: &Time,
    map: &GameMap,
    config: &Config,
    events: &mut Events,
    rng: &mut GameRng,
) -> Option<Side> {
    // 1. AI picks intents from the current ball state
    drive_ai(world, time, map, config, rng, true);

    // 2. Move paddles based on intents
    move_paddles(world, time, map);

    // 3. Move ball
    move_ball(world, time);

    // 4. Check collisions (ball vs paddles, walls)
    check_collisions(world, map, config, events, rng);

    // 5. Check scoring (ball exited arena)
    check_scoring(world, map)
}

/// Helper to create a paddle entity at its spawn point
pub fn create_paddle(
    world: &mut World,
    map: &GameMap,
    config: &Config,
    side: Side,
    controller: Controller,
) -> hecs::Entity {
    let paddle = Paddle::new(side, controller, map.paddle_spawn(side), config.paddle_size());
    world.spawn((paddle, PaddleIntent::idle()))
}

/// Helper to create an AI-driven paddle entity
pub fn create_ai_paddle(
    world: &mut World,
    map: &GameMap,
    config: &Config,
    side: Side,
    profile: AiProfile,
) -> hecs::Entity {
    let paddle = Paddle::new(side, Controller::Ai, map.paddle_spawn(side), config.paddle_size());
    world.spawn((paddle, PaddleIntent::idle(), AiController::new(profile)))
}

/// Helper to create the ball entity
pub fn create_ball(
    world: &mut World,
    pos: glam::Vec2,
    vel: glam::Vec2,
    radius: f32,
) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel, radius),))
}
