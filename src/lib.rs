//! Flappy Rockets - a candle-market arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, candle market, scoring, collisions)
//! - `tuning`: Data-driven game balance
//! - `messages`: Wire contract with the hosting post
//! - `leaderboard`: Leaderboard collaborator boundary
//! - `screens`: Menu and game-over view models
//! - `game`: Fixed-step host loop
//! - `platform`: Message transport (loopback on native, postMessage on web)

pub mod error;
pub mod game;
pub mod leaderboard;
pub mod messages;
pub mod platform;
pub mod screens;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use game::Game;
pub use tuning::{SpawnCadence, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the host will feed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default viewport (tall post webview)
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 640.0;

    /// Rocket sits at this fraction of the viewport width
    pub const ROCKET_X_FRACTION: f32 = 0.25;
    pub const ROCKET_WIDTH: f32 = 40.0;
    pub const ROCKET_HEIGHT: f32 = 20.0;
    /// Hitbox is shrunk by this much on every side
    pub const ROCKET_HITBOX_INSET: f32 = 3.0;

    /// Rocket physics (pixels, seconds)
    pub const GRAVITY: f32 = 600.0;
    pub const THRUST_POWER: f32 = 200.0;

    /// World speed (leftward scroll, pixels/s)
    pub const BASE_WORLD_SPEED: f32 = 200.0;
    pub const WORLD_SPEED_INCREMENT: f32 = 20.0;
    pub const WORLD_SPEED_CAP: f32 = 350.0;

    /// Candle geometry
    pub const CANDLE_WIDTH: f32 = 30.0;
    /// Extra visual height added to every candle body
    pub const CANDLE_BODY_PADDING: f32 = 14.0;
    pub const CANDLE_HITBOX_WIDTH: f32 = 12.0;
    pub const CANDLE_HITBOX_INSET_Y: f32 = 6.0;
    pub const TRIGGER_WIDTH: f32 = 10.0;

    /// Candle market generator
    pub const MARGIN_TOP: f32 = 20.0;
    pub const MARGIN_BOTTOM: f32 = 20.0;
    pub const TREND_STRENGTH_MIN: f32 = 30.0;
    pub const TREND_STRENGTH_MAX: f32 = 150.0;
    pub const CANDLES_PER_WEEK: u32 = 5;
    pub const WEEKEND_GAP_MIN: u32 = 3;
    pub const WEEKEND_GAP_MAX: u32 = 8;

    /// Escalation happens every this many internal score points
    pub const ESCALATION_INTERVAL: u32 = 5;

    /// Timer-driven spawn cadence
    pub const SPAWN_DELAY_MS: f64 = 1500.0;
    pub const SPAWN_DELAY_DECREMENT_MS: f64 = 100.0;
    pub const SPAWN_DELAY_FLOOR_MS: f64 = 1200.0;

    /// Delayed actions
    pub const FIRST_SPAWN_DELAY_MS: f64 = 1000.0;
    pub const RETURN_TO_IDLE_MS: f64 = 200.0;
    pub const CRASH_REPORT_DELAY_MS: f64 = 800.0;

    /// Entities this far left of (or below) the screen are swept
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Exhaust particles
    pub const PARTICLE_GRAVITY: f32 = 400.0;
    pub const MAX_PARTICLES: usize = 256;
}
