//! Match flow on top of the physics systems.
//!
//! `MatchSession` owns the ECS world and every resource a match needs, feeds
//! queued commands into the tick pipeline and walks the match state machine:
//! serve wait, rally, pause, game break between best-of-three games, and the
//! terminal match-over state that reports the result once.

use chrono::Utc;
use glam::Vec2;
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Config, GameMode, MatchConfig};
use crate::error::ConfigError;
use crate::persistence::{MatchResult, ResultSink};
use crate::systems::{drive_ai, ingest_inputs, move_paddles};
use crate::{
    create_ai_paddle, create_ball, create_paddle, step, AiController, Ball, Command, CommandQueue,
    Controller, Events, GameEvent, GameMap, GameRng, Paddle, Params, Score, Side, Time,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchState {
    /// Ball parked at centre, waiting for the serve delay or a serve command
    Serving,
    Rally,
    Paused,
    /// Break between best-of-three games
    GameOver,
    MatchOver,
}

/// Receives every event the session emits, in emission order.
pub trait GameListener: Send {
    fn on_event(&mut self, event: &GameEvent);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleView {
    pub side: Side,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Read-only view of a session for renderers and network adapters
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub ball: BallView,
    /// Left paddle first
    pub paddles: [PaddleView; 2],
    pub score: Score,
    /// Seconds of unpaused match time
    pub timer: f32,
    pub state: MatchState,
    pub mode: GameMode,
    pub winner: Option<Side>,
    pub sound_enabled: bool,
    pub save_warning: Option<String>,
}

pub struct MatchSession {
    settings: MatchConfig,
    config: Config,
    map: GameMap,
    world: World,
    ball: Entity,
    paddles: [Entity; 2],
    score: Score,
    state: MatchState,
    resume_to: MatchState,
    serve_side: Side,
    // Remaining serve delay or game break
    countdown: f32,
    clock: f32,
    winner: Option<Side>,
    sound_enabled: bool,
    save_warning: Option<String>,
    result: Option<MatchResult>,
    events: Events,
    commands: CommandQueue,
    rng: GameRng,
    sink: Option<Box<dyn ResultSink>>,
    listeners: Vec<Box<dyn GameListener>>,
}

fn build_world(
    settings: &MatchConfig,
    config: &Config,
    map: &GameMap,
) -> (World, Entity, [Entity; 2]) {
    let mut world = World::new();
    let left = create_paddle(&mut world, map, config, Side::Left, Controller::Human);
    let right = match settings.ai_profile() {
        Some(profile) => create_ai_paddle(&mut world, map, config, Side::Right, profile),
        None => create_paddle(&mut world, map, config, Side::Right, Controller::Human),
    };
    let ball = create_ball(&mut world, map.ball_spawn(), Vec2::ZERO, config.ball_radius);
    (world, ball, [left, right])
}

/// Non-finite or negative frame times count as no time at all
fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(Params::MAX_DT)
    } else {
        0.0
    }
}

impl MatchSession {
    /// Start a match with the default physics tuning.
    pub fn new(settings: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_tuning(settings, Config::default(), seed)
    }

    pub fn with_tuning(
        settings: MatchConfig,
        config: Config,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        settings.validate()?;

        let map = GameMap::new(&config);
        let (world, ball, paddles) = build_world(&settings, &config, &map);
        info!(
            mode = %settings.mode,
            ai = settings.ai_enabled,
            difficulty = %settings.ai_difficulty,
            seed,
            "match created"
        );

        Ok(Self {
            countdown: config.serve_delay,
            settings,
            config,
            map,
            world,
            ball,
            paddles,
            score: Score::new(),
            state: MatchState::Serving,
            resume_to: MatchState::Serving,
            serve_side: Side::Right,
            clock: 0.0,
            winner: None,
            sound_enabled: true,
            save_warning: None,
            result: None,
            events: Events::new(),
            commands: CommandQueue::new(),
            rng: GameRng::new(seed),
            sink: None,
            listeners: Vec::new(),
        })
    }

    pub fn set_result_sink(&mut self, sink: Box<dyn ResultSink>) {
        self.sink = Some(sink);
    }

    pub fn add_listener(&mut self, listener: Box<dyn GameListener>) {
        self.listeners.push(listener);
    }

    /// Buffer a command for the next update
    pub fn queue_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Advance the match by `dt` seconds.
    ///
    /// Queued commands run first, then `commands`, in order. `dt` is clamped
    /// to `Params::MAX_DT` and simulated in fixed steps of at most
    /// `Params::FIXED_DT`.
    pub fn update(&mut self, dt: f32, commands: &[Command]) -> Snapshot {
        self.events.clear();

        let mut batch = self.commands.drain();
        batch.extend_from_slice(commands);
        for command in &batch {
            self.apply_command(*command);
        }
        ingest_inputs(&mut self.world, &batch, &self.config);

        let mut remaining = sanitize_dt(dt);
        while remaining > 0.0 && self.is_running() {
            let h = remaining.min(Params::FIXED_DT);
            remaining -= h;
            self.tick(h);
        }

        self.notify_listeners();
        self.snapshot()
    }

    /// Award a point as if the ball had left the arena.
    ///
    /// Only accepted during a rally; returns whether the point counted.
    pub fn record_point(&mut self, scorer: Side) -> bool {
        if self.state != MatchState::Rally {
            return false;
        }
        self.events.clear();
        self.award_point(scorer);
        self.notify_listeners();
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        let ball = self.ball();
        Snapshot {
            ball: BallView {
                pos: ball.pos,
                radius: ball.radius,
            },
            paddles: [Side::Left, Side::Right].map(|side| {
                let paddle = self.paddle(side);
                PaddleView {
                    side,
                    pos: paddle.pos,
                    size: paddle.size,
                }
            }),
            score: self.score,
            timer: self.clock,
            state: self.state,
            mode: self.settings.mode,
            winner: self.winner,
            sound_enabled: self.sound_enabled,
            save_warning: self.save_warning.clone(),
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn serve_side(&self) -> Side {
        self.serve_side
    }

    pub fn settings(&self) -> &MatchConfig {
        &self.settings
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    /// Events emitted by the most recent update
    pub fn last_events(&self) -> &[GameEvent] {
        self.events.as_slice()
    }

    /// Result of the finished match, once MATCH_OVER is reached
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    pub fn save_warning(&self) -> Option<&str> {
        self.save_warning.as_deref()
    }

    pub fn ball(&self) -> Ball {
        self.world
            .get::<&Ball>(self.ball)
            .map(|ball| *ball)
            .unwrap_or_else(|_| {
                Ball::new(self.map.ball_spawn(), Vec2::ZERO, self.config.ball_radius)
            })
    }

    pub fn paddle(&self, side: Side) -> Paddle {
        self.world
            .get::<&Paddle>(self.paddles[side.index()])
            .map(|paddle| *paddle)
            .unwrap_or_else(|_| {
                Paddle::new(
                    side,
                    Controller::Human,
                    self.map.paddle_spawn(side),
                    self.config.paddle_size(),
                )
            })
    }

    /// Current aim point of the AI paddle, if there is one
    pub fn ai_target(&self) -> Option<f32> {
        self.world
            .get::<&AiController>(self.paddles[Side::Right.index()])
            .ok()
            .and_then(|ai| ai.target())
    }

    fn is_running(&self) -> bool {
        !matches!(self.state, MatchState::Paused | MatchState::MatchOver)
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Paddle { .. } => {}
            Command::Pause => {
                if matches!(self.state, MatchState::Serving | MatchState::Rally) {
                    self.resume_to = self.state;
                    self.state = MatchState::Paused;
                    self.events.push(GameEvent::Paused);
                    debug!(resume_to = ?self.resume_to, "paused");
                }
            }
            Command::Resume => {
                if self.state == MatchState::Paused {
                    self.state = self.resume_to;
                    self.events.push(GameEvent::Resumed);
                    debug!(state = ?self.state, "resumed");
                }
            }
            Command::Reset => self.reset(),
            Command::ToggleSound => {
                self.sound_enabled = !self.sound_enabled;
                self.events.push(GameEvent::SoundToggled {
                    enabled: self.sound_enabled,
                });
            }
            Command::Serve => {
                if self.state == MatchState::Serving {
                    self.launch();
                }
            }
        }
    }

    fn tick(&mut self, dt: f32) {
        self.clock += dt;
        let time = Time::new(dt, self.clock);

        match self.state {
            MatchState::Rally => {
                let scorer = step(
                    &mut self.world,
                    &time,
                    &self.map,
                    &self.config,
                    &mut self.events,
                    &mut self.rng,
                );
                if let Some(scorer) = scorer {
                    self.award_point(scorer);
                }
            }
            MatchState::Serving | MatchState::GameOver => {
                drive_ai(
                    &mut self.world,
                    &time,
                    &self.map,
                    &self.config,
                    &mut self.rng,
                    false,
                );
                move_paddles(&mut self.world, &time, &self.map);

                self.countdown -= dt;
                if self.countdown <= 0.0 {
                    if self.state == MatchState::Serving {
                        self.launch();
                    } else {
                        self.score.reset_points();
                        self.enter_serving();
                    }
                }
            }
            MatchState::Paused | MatchState::MatchOver => {}
        }
    }

    fn launch(&mut self) {
        let center = self.map.ball_spawn();
        let angles = (self.config.serve_min_angle, self.config.serve_max_angle);
        if let Ok(mut ball) = self.world.get::<&mut Ball>(self.ball) {
            ball.reset_to_serve(
                self.serve_side,
                center,
                self.config.ball_speed_initial,
                angles,
                &mut self.rng,
            );
        }
        self.state = MatchState::Rally;
        self.events.push(GameEvent::Served {
            toward: self.serve_side,
        });
        debug!(toward = %self.serve_side, "serve");
    }

    fn park_ball(&mut self) {
        let center = self.map.ball_spawn();
        if let Ok(mut ball) = self.world.get::<&mut Ball>(self.ball) {
            ball.park(center);
        }
    }

    fn enter_serving(&mut self) {
        self.state = MatchState::Serving;
        self.countdown = self.config.serve_delay;
        self.park_ball();
    }

    fn award_point(&mut self, scorer: Side) {
        self.score.add_point(scorer);
        self.serve_side = self.serve_side.opposite();
        self.park_ball();
        self.events.push(GameEvent::PointScored {
            scorer,
            score: self.score,
        });
        debug!(
            scorer = %scorer,
            left = self.score.left_points,
            right = self.score.right_points,
            "point"
        );

        let mode = self.settings.mode;
        if self.score.game_winner(mode.points_to_win()) != Some(scorer) {
            self.enter_serving();
            return;
        }

        if mode != GameMode::BestOf3 {
            self.finish(scorer);
            return;
        }

        self.score.add_game(scorer);
        self.events.push(GameEvent::GameWon {
            winner: scorer,
            score: self.score,
        });
        info!(
            winner = %scorer,
            left_games = self.score.left_games,
            right_games = self.score.right_games,
            "game won"
        );
        if self.score.games(scorer) >= mode.games_to_win() {
            self.finish(scorer);
        } else {
            self.state = MatchState::GameOver;
            self.countdown = self.config.game_break;
        }
    }

    fn finish(&mut self, winner: Side) {
        self.state = MatchState::MatchOver;
        self.winner = Some(winner);
        self.events.push(GameEvent::MatchWon {
            winner,
            score: self.score,
        });
        info!(
            winner = %winner,
            name = self.settings.player_names.get(winner),
            left_points = self.score.left_points,
            right_points = self.score.right_points,
            "match over"
        );

        let result = MatchResult::from_match(&self.settings, winner, &self.score, Utc::now());
        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.save(&result) {
                warn!(error = %err, "failed to save match result");
                let reason = err.to_string();
                self.events.push(GameEvent::ResultSaveFailed {
                    reason: reason.clone(),
                });
                self.save_warning = Some(reason);
            }
        }
        self.result = Some(result);
    }

    fn reset(&mut self) {
        let (world, ball, paddles) = build_world(&self.settings, &self.config, &self.map);
        self.world = world;
        self.ball = ball;
        self.paddles = paddles;
        self.score = Score::new();
        self.state = MatchState::Serving;
        self.resume_to = MatchState::Serving;
        self.serve_side = Side::Right;
        self.countdown = self.config.serve_delay;
        self.clock = 0.0;
        self.winner = None;
        self.save_warning = None;
        self.result = None;
        self.events.push(GameEvent::Reset);
        info!(mode = %self.settings.mode, "match reset");
    }

    fn notify_listeners(&mut self) {
        for event in self.events.iter() {
            for listener in self.listeners.iter_mut() {
                listener.on_event(event);
            }
        }
    }
}
