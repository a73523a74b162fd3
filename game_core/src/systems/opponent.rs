use hecs::World;

use crate::{AiController, Ball, Config, GameMap, GameRng, Paddle, PaddleIntent, Time};

/// Let every AI paddle pick its intent for this step.
///
/// With `ball_live == false` (serve wait, game break) the controllers see no
/// ball and idle.
pub fn drive_ai(
    world: &mut World,
    time: &Time,
    map: &GameMap,
    config: &Config,
    rng: &mut GameRng,
    ball_live: bool,
) {
    let ball = if ball_live {
        world.query::<&Ball>().iter().next().map(|(_e, ball)| *ball)
    } else {
        None
    };

    for (_entity, (paddle, intent, ai)) in
        world.query_mut::<(&Paddle, &mut PaddleIntent, &mut AiController)>()
    {
        *intent = ai.decide(paddle, ball.as_ref(), map, config.paddle_speed, time.dt, rng);
    }
}
