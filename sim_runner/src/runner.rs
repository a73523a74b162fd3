//! Drives sessions headlessly by feeding AI decisions in as paddle commands.

use game_core::{
    AiController, AiProfile, Command, Difficulty, Direction, GameRng, MatchConfig, MatchResult,
    MatchSession, MatchState, PaddleIntent, Params, Side,
};

/// Runner-side AI that plays a human-controlled paddle through commands.
///
/// Commands only carry a direction and human paddles always move at full
/// paddle speed, so the pilot holds its key on just enough frames to match
/// the profile's speed cap and lets go before the next step would pass its
/// target.
pub struct Autopilot {
    side: Side,
    ai: AiController,
    rng: GameRng,
    travel: f32,
}

impl Autopilot {
    pub fn new(side: Side, profile: AiProfile, seed: u64) -> Self {
        Self {
            side,
            ai: AiController::new(profile),
            rng: GameRng::new(seed),
            travel: 0.0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Pick this frame's paddle command from the session's current state.
    pub fn command(&mut self, session: &MatchSession, dt: f32) -> Command {
        let paddle = session.paddle(self.side);
        let ball = (session.state() == MatchState::Rally).then(|| session.ball());
        let intent = self.ai.decide(
            &paddle,
            ball.as_ref(),
            session.map(),
            session.config().paddle_speed,
            dt,
            &mut self.rng,
        );
        let step = session.config().paddle_speed * dt;
        Command::Paddle {
            side: self.side,
            direction: self.throttle(&intent, paddle.pos.y, step, dt),
        }
    }

    /// Turn an intent into a held key for one frame that moves a full `step`.
    fn throttle(&mut self, intent: &PaddleIntent, y: f32, step: f32, dt: f32) -> Direction {
        if intent.dir == Direction::None || step <= 0.0 {
            self.travel = 0.0;
            return Direction::None;
        }
        if let Some(target) = intent.stop_at {
            if (target - y).abs() < step {
                self.travel = 0.0;
                return Direction::None;
            }
        }
        self.travel = (self.travel + intent.speed * dt).min(step);
        if self.travel >= step * (1.0 - 1e-4) {
            self.travel = 0.0;
            intent.dir
        } else {
            Direction::None
        }
    }
}

/// Autopilots for every paddle the session leaves to humans
pub fn pilots_for(settings: &MatchConfig, left: Difficulty, seed: u64) -> Vec<Autopilot> {
    let mut pilots = vec![Autopilot::new(
        Side::Left,
        AiProfile::for_difficulty(left),
        seed ^ 0x5eed_1eff,
    )];
    if !settings.ai_enabled {
        pilots.push(Autopilot::new(
            Side::Right,
            AiProfile::for_difficulty(settings.ai_difficulty),
            seed ^ 0x5eed_0a1e,
        ));
    }
    pilots
}

#[derive(Debug)]
pub struct MatchOutcome {
    pub result: Option<MatchResult>,
    pub frames: u64,
}

/// Run fixed frames until the match ends or `max_frames` is reached.
pub fn play_match(
    session: &mut MatchSession,
    pilots: &mut [Autopilot],
    max_frames: u64,
) -> MatchOutcome {
    let dt = Params::FIXED_DT;
    let mut frames = 0;
    while frames < max_frames && session.state() != MatchState::MatchOver {
        let commands: Vec<Command> = pilots
            .iter_mut()
            .map(|pilot| pilot.command(session, dt))
            .collect();
        session.update(dt, &commands);
        frames += 1;
    }
    MatchOutcome {
        result: session.result().cloned(),
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::GameMode;

    const DT: f32 = Params::FIXED_DT;

    fn chase(speed: f32, target: f32) -> PaddleIntent {
        PaddleIntent {
            dir: Direction::Down,
            speed,
            stop_at: Some(target),
        }
    }

    #[test]
    fn test_pilots_cover_human_paddles() {
        let vs_ai = MatchConfig::against_ai(GameMode::FirstTo5, Difficulty::Hard, "bot");
        let sides: Vec<Side> = pilots_for(&vs_ai, Difficulty::Easy, 1)
            .iter()
            .map(Autopilot::side)
            .collect();
        assert_eq!(sides, [Side::Left]);

        let local = MatchConfig::local(GameMode::FirstTo5, "a", "b");
        assert_eq!(pilots_for(&local, Difficulty::Easy, 1).len(), 2);
    }

    #[test]
    fn test_autopilot_idles_while_serving() {
        let session =
            MatchSession::new(MatchConfig::local(GameMode::FirstTo5, "a", "b"), 4).unwrap();
        let mut pilot = Autopilot::new(Side::Left, AiProfile::HARD, 4);

        assert_eq!(
            pilot.command(&session, Params::FIXED_DT),
            Command::Paddle {
                side: Side::Left,
                direction: Direction::None
            }
        );
    }

    #[test]
    fn test_slow_profile_holds_key_on_matching_share_of_frames() {
        let mut pilot = Autopilot::new(Side::Left, AiProfile::EASY, 1);
        let step = Params::PADDLE_SPEED * DT;
        let intent = chase(AiProfile::EASY.max_speed, 20.0);

        let moves = (0..10)
            .filter(|_| pilot.throttle(&intent, 5.0, step, DT) == Direction::Down)
            .count();

        // EASY caps at half the paddle speed
        assert_eq!(moves, 5);
    }

    #[test]
    fn test_full_speed_profile_moves_every_frame() {
        let mut pilot = Autopilot::new(Side::Left, AiProfile::HARD, 1);
        let step = Params::PADDLE_SPEED * DT;
        let intent = chase(AiProfile::HARD.max_speed, 20.0);

        for _ in 0..10 {
            assert_eq!(pilot.throttle(&intent, 5.0, step, DT), Direction::Down);
        }
    }

    #[test]
    fn test_pilot_releases_key_short_of_target() {
        let mut pilot = Autopilot::new(Side::Left, AiProfile::HARD, 1);
        let step = Params::PADDLE_SPEED * DT;
        let intent = chase(AiProfile::HARD.max_speed, 12.0);

        assert_eq!(pilot.throttle(&intent, 12.0 - step * 0.5, step, DT), Direction::None);
        assert_eq!(pilot.throttle(&intent, 12.0 - step * 2.0, step, DT), Direction::Down);
    }

    #[test]
    fn test_ai_match_finishes() {
        let settings = MatchConfig::against_ai(GameMode::FirstTo5, Difficulty::Hard, "bot");
        let mut session = MatchSession::new(settings.clone(), 8).unwrap();
        let mut pilots = pilots_for(&settings, Difficulty::Easy, 8);

        let outcome = play_match(&mut session, &mut pilots, 60 * 60 * 30);

        assert_eq!(session.state(), MatchState::MatchOver);
        let result = outcome.result.unwrap();
        let score = session.score();
        assert_eq!(score.left_points.max(score.right_points), 5);
        assert_eq!(result.won, session.winner() == Some(Side::Left));
        assert!(outcome.frames > 0);
    }

    #[test]
    fn test_frame_cap_stops_unfinished_match() {
        let settings = MatchConfig::local(GameMode::FirstTo10, "a", "b");
        let mut session = MatchSession::new(settings.clone(), 2).unwrap();
        let mut pilots = pilots_for(&settings, Difficulty::Hard, 2);

        let outcome = play_match(&mut session, &mut pilots, 30);

        assert_eq!(outcome.frames, 30);
        assert!(outcome.result.is_none());
    }
}
