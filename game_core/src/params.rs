/// Game tuning parameters for ping-pong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Arena
    pub const ARENA_WIDTH: f32 = 32.0;
    pub const ARENA_HEIGHT: f32 = 24.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 0.8;
    pub const PADDLE_HEIGHT: f32 = 4.0;
    pub const PADDLE_SPEED: f32 = 18.0; // units per second
    pub const PADDLE_INSET: f32 = 1.5; // paddle centre distance from the side edge

    // Ball
    pub const BALL_RADIUS: f32 = 0.5;
    pub const BALL_SPEED_INITIAL: f32 = 12.0;
    pub const BALL_SPEED_MAX: f32 = 24.0;
    pub const BALL_SPEED_INCREASE: f32 = 1.05; // Multiply speed on paddle hit

    // Angles (degrees)
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;
    pub const BOUNCE_JITTER_DEG: f32 = 2.0;
    pub const SERVE_MIN_ANGLE_DEG: f32 = 5.0;
    pub const SERVE_MAX_ANGLE_DEG: f32 = 30.0;

    // Match flow (seconds)
    pub const SERVE_DELAY: f32 = 1.0;
    pub const GAME_BREAK: f32 = 2.0;

    // AI
    pub const AI_DEADZONE: f32 = 0.1;

    // Physics
    pub const FIXED_DT: f32 = 1.0 / 60.0; // 60 Hz
    pub const MAX_DT: f32 = 0.1; // Clamp to prevent large jumps
}
