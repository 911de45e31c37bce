//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults mirror `crate::consts`;
//! a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// How the session decides that the next candle slot is due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpawnCadence {
    /// A slot is due once the spawn cursor scrolls into view
    #[default]
    Distance,
    /// A slot is due every `spawn_delay_ms`, shrinking with difficulty
    Timer,
}

impl SpawnCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnCadence::Distance => "distance",
            SpawnCadence::Timer => "timer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "distance" | "position" => Some(SpawnCadence::Distance),
            "timer" | "time" => Some(SpawnCadence::Timer),
            _ => None,
        }
    }
}

/// Runtime-tunable gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Rocket ===
    /// Fixed rocket x as a fraction of the viewport width
    pub rocket_x_fraction: f32,
    pub rocket_width: f32,
    pub rocket_height: f32,
    pub rocket_hitbox_inset: f32,
    pub gravity: f32,
    pub thrust_power: f32,

    // === World speed ===
    pub base_world_speed: f32,
    pub speed_increment: f32,
    pub speed_cap: f32,
    /// Internal score points between escalations
    pub escalation_interval: u32,

    // === Candle market ===
    pub candle_width: f32,
    /// Extra visual height added to every candle body
    pub candle_body_padding: f32,
    pub candle_hitbox_width: f32,
    /// Candle hitbox is shrunk by this much at the top and bottom
    pub candle_hitbox_inset_y: f32,
    pub trigger_width: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub trend_min: f32,
    pub trend_max: f32,
    pub candles_per_week: u32,
    pub weekend_min: u32,
    pub weekend_max: u32,

    // === Spawn cadence ===
    pub spawn_cadence: SpawnCadence,
    pub spawn_delay_ms: f64,
    pub delay_decrement_ms: f64,
    pub delay_floor_ms: f64,

    // === Delayed actions ===
    pub first_spawn_delay_ms: f64,
    pub return_to_idle_ms: f64,
    pub crash_report_delay_ms: f64,

    // === Housekeeping ===
    pub offscreen_margin: f32,
    /// Exhaust particles on thrust (cosmetic only)
    pub particles: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            rocket_x_fraction: ROCKET_X_FRACTION,
            rocket_width: ROCKET_WIDTH,
            rocket_height: ROCKET_HEIGHT,
            rocket_hitbox_inset: ROCKET_HITBOX_INSET,
            gravity: GRAVITY,
            thrust_power: THRUST_POWER,

            base_world_speed: BASE_WORLD_SPEED,
            speed_increment: WORLD_SPEED_INCREMENT,
            speed_cap: WORLD_SPEED_CAP,
            escalation_interval: ESCALATION_INTERVAL,

            candle_width: CANDLE_WIDTH,
            candle_body_padding: CANDLE_BODY_PADDING,
            candle_hitbox_width: CANDLE_HITBOX_WIDTH,
            candle_hitbox_inset_y: CANDLE_HITBOX_INSET_Y,
            trigger_width: TRIGGER_WIDTH,
            margin_top: MARGIN_TOP,
            margin_bottom: MARGIN_BOTTOM,
            trend_min: TREND_STRENGTH_MIN,
            trend_max: TREND_STRENGTH_MAX,
            candles_per_week: CANDLES_PER_WEEK,
            weekend_min: WEEKEND_GAP_MIN,
            weekend_max: WEEKEND_GAP_MAX,

            spawn_cadence: SpawnCadence::Distance,
            spawn_delay_ms: SPAWN_DELAY_MS,
            delay_decrement_ms: SPAWN_DELAY_DECREMENT_MS,
            delay_floor_ms: SPAWN_DELAY_FLOOR_MS,

            first_spawn_delay_ms: FIRST_SPAWN_DELAY_MS,
            return_to_idle_ms: RETURN_TO_IDLE_MS,
            crash_report_delay_ms: CRASH_REPORT_DELAY_MS,

            offscreen_margin: OFFSCREEN_MARGIN,
            particles: true,
        }
    }
}

impl Tuning {
    /// Default tuning for a specific viewport
    pub fn for_screen(width: f32, height: f32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Fixed x of the rocket
    pub fn rocket_x(&self) -> f32 {
        self.screen_width * self.rocket_x_fraction
    }

    /// Lowest y a candle may reach (screen y grows downward)
    pub fn max_candle_y(&self) -> f32 {
        self.screen_height - self.margin_bottom
    }

    /// Reject values that would break generator or difficulty invariants
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, field: &'static str, constraint: &'static str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidTuning { field, constraint })
            }
        }

        check(self.screen_width > 0.0, "screen_width", "must be positive")?;
        check(
            self.margin_top >= 0.0
                && self.margin_bottom >= 0.0
                && self.margin_top < self.max_candle_y(),
            "screen_height",
            "must leave room between the top and bottom margins",
        )?;
        check(self.trend_min > 0.0, "trend_min", "must be positive")?;
        check(
            self.trend_min <= self.trend_max,
            "trend_min",
            "must not exceed trend_max",
        )?;
        check(self.candles_per_week >= 1, "candles_per_week", "must be at least 1")?;
        check(
            self.weekend_min <= self.weekend_max,
            "weekend_min",
            "must not exceed weekend_max",
        )?;
        check(
            self.base_world_speed >= 0.0 && self.speed_cap >= self.base_world_speed,
            "speed_cap",
            "must be at least base_world_speed",
        )?;
        check(self.speed_increment >= 0.0, "speed_increment", "must not be negative")?;
        check(
            self.escalation_interval >= 1,
            "escalation_interval",
            "must be at least 1",
        )?;
        check(
            self.delay_floor_ms > 0.0 && self.delay_floor_ms <= self.spawn_delay_ms,
            "delay_floor_ms",
            "must be positive and not exceed spawn_delay_ms",
        )?;
        check(self.candle_width > 0.0, "candle_width", "must be positive")?;
        check(
            (0.0..=1.0).contains(&self.rocket_x_fraction),
            "rocket_x_fraction",
            "must be within the viewport",
        )?;
        check(
            self.candle_hitbox_width > 0.0 && self.trigger_width > 0.0,
            "candle_hitbox_width",
            "hitbox widths must be positive",
        )?;
        check(
            self.candle_body_padding >= 0.0 && self.candle_hitbox_inset_y >= 0.0,
            "candle_body_padding",
            "must not be negative",
        )?;
        Ok(())
    }
}
