use hecs::World;

use crate::{Command, Config, Controller, Direction, Paddle, PaddleIntent};

/// Turn this update's paddle commands into intents for human paddles.
///
/// A human paddle with no command in the batch falls back to `None`; if a
/// batch carries several commands for one paddle the last one wins.
pub fn ingest_inputs(world: &mut World, commands: &[Command], config: &Config) {
    for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
        if paddle.controller != Controller::Human {
            continue;
        }
        let dir = commands
            .iter()
            .rev()
            .find_map(|command| match command {
                Command::Paddle { side, direction } if *side == paddle.side => Some(*direction),
                _ => None,
            })
            .unwrap_or(Direction::None);
        *intent = PaddleIntent::human(dir, config.paddle_speed);
    }
}
