//! Game state and core simulation types
//!
//! A session owns every entity in flat vectors indexed by stable entity IDs.
//! Entities are never destroyed mid-tick; they are flagged and removed in a
//! single sweep at the end of the tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::background::{Parallax, ParallaxOffsets};
use super::body::Body;
use super::collision::Aabb;
use super::difficulty::DifficultyController;
use super::market::{CandleOhlc, MarketState, Trend};
use super::schedule::{Scheduler, TaskId};
use super::score::ScoreEngine;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Rocket hovers, waiting for the first thrust
    NotStarted,
    /// Active gameplay
    Running,
    /// Crashed; terminal
    Over,
}

/// Rocket animation (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RocketAnim {
    Idle,
    Thrust,
    Crash,
}

/// The player's rocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rocket {
    pub body: Body,
    pub width: f32,
    pub height: f32,
    /// Hitbox inset on every side
    pub inset: f32,
    pub anim: RocketAnim,
    /// Pending return-to-idle task
    pub idle_task: Option<TaskId>,
}

impl Rocket {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            body: Body::new(
                Vec2::new(tuning.rocket_x(), tuning.screen_height / 2.0),
                tuning.gravity,
            ),
            width: tuning.rocket_width,
            height: tuning.rocket_height,
            inset: tuning.rocket_hitbox_inset,
            anim: RocketAnim::Idle,
            idle_task: None,
        }
    }

    /// Collision box, smaller than the sprite
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(
            self.body.pos,
            Vec2::new(
                (self.width - 2.0 * self.inset).max(0.0),
                (self.height - 2.0 * self.inset).max(0.0),
            ),
        )
    }
}

/// A candle obstacle (lethal)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub id: u32,
    /// Screen-space center x
    pub x: f32,
    pub ohlc: CandleOhlc,
    pub trend: Trend,
}

impl Candle {
    /// Visual body height, padded beyond the price move
    pub fn body_height(&self, tuning: &Tuning) -> f32 {
        self.ohlc.magnitude() + tuning.candle_body_padding
    }

    /// Narrow, vertically inset collision box
    pub fn hitbox(&self, tuning: &Tuning) -> Aabb {
        let height = (self.body_height(tuning) - 2.0 * tuning.candle_hitbox_inset_y).max(0.0);
        Aabb::from_center(
            Vec2::new(self.x, self.ohlc.mid()),
            Vec2::new(tuning.candle_hitbox_width, height),
        )
    }
}

/// Invisible full-height sensor that awards a point once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTrigger {
    pub id: u32,
    pub candle_id: u32,
    pub x: f32,
    /// Already awarded; removed at the end of the tick
    pub consumed: bool,
}

impl ScoreTrigger {
    pub fn hitbox(&self, tuning: &Tuning) -> Aabb {
        Aabb::from_center(
            Vec2::new(self.x, tuning.screen_height / 2.0),
            Vec2::new(tuning.trigger_width, tuning.screen_height),
        )
    }
}

/// An exhaust particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub body: Body,
    /// Horizontal velocity on top of the world scroll
    pub jitter_x: f32,
    /// 1.0 -> 0.0, removed at zero
    pub life: f32,
    /// Life lost per second
    pub fade_rate: f32,
    pub scale: f32,
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    Candle { id: u32 },
    Boundary,
}

/// Things the host may want to react to (sound, HUD, messages)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Thrust,
    CandleSpawned { id: u32, trend: Trend },
    WeekendStarted { slots: u32 },
    Scored { internal: u32, display: u64 },
    SpeedUp { world_speed: f32 },
    Crashed { cause: CrashCause, score: u64 },
    /// Terminal score ready for the leaderboard (fires once, after a delay)
    ScoreReported { score: u64 },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Session clock in milliseconds
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub rocket: Rocket,
    /// Candles (sorted by id for determinism)
    pub candles: Vec<Candle>,
    /// Score triggers (sorted by id for determinism)
    pub triggers: Vec<ScoreTrigger>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub score: ScoreEngine,
    pub difficulty: DifficultyController,
    pub market: MarketState,
    pub scheduler: Scheduler,
    pub parallax: Parallax,
    /// Candle slots are being consumed
    pub spawning: bool,
    /// Pending timer-cadence task
    pub spawn_timer: Option<TaskId>,
    pub crash: Option<CrashCause>,
    pub score_reported: bool,
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::with_background(seed, tuning, ParallaxOffsets::default(), 0)
    }

    /// Create a session continuing a saved parallax sky
    pub fn with_background(
        seed: u64,
        tuning: Tuning,
        offsets: ParallaxOffsets,
        generation: u32,
    ) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            clock_ms: 0.0,
            time_ticks: 0,
            rocket: Rocket::new(&tuning),
            candles: Vec::new(),
            triggers: Vec::new(),
            particles: Vec::new(),
            score: ScoreEngine::new(tuning.escalation_interval),
            difficulty: DifficultyController::new(&tuning),
            market: MarketState::new(&tuning),
            scheduler: Scheduler::new(generation),
            parallax: Parallax::restore(offsets),
            spawning: false,
            spawn_timer: None,
            crash: None,
            score_reported: false,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// A fresh session replacing this one; stale tasks cannot reach it
    pub fn successor(&self, seed: u64) -> Self {
        let mut scheduler = self.scheduler.clone();
        scheduler.reset();
        Self::with_background(
            seed,
            self.tuning.clone(),
            self.parallax.save(),
            scheduler.generation(),
        )
    }

    pub fn generation(&self) -> u32 {
        self.scheduler.generation()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn display_score(&self) -> u64 {
        self.score.display_score()
    }

    pub fn world_speed(&self) -> f32 {
        self.difficulty.world_speed()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.candles.sort_by_key(|c| c.id);
        self.triggers.sort_by_key(|t| t.id);
        self.particles.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_new_session_waits_for_thrust() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.score.internal(), 0);
        assert_eq!(state.world_speed(), BASE_WORLD_SPEED);
        assert!(state.candles.is_empty());
        assert_eq!(state.rocket.body.pos.y, SCREEN_HEIGHT / 2.0);
    }

    #[test]
    fn test_rocket_hitbox_is_inset() {
        let rocket = Rocket::new(&Tuning::default());
        let hitbox = rocket.hitbox();
        assert_eq!(hitbox.width(), ROCKET_WIDTH - 2.0 * ROCKET_HITBOX_INSET);
        assert_eq!(hitbox.height(), ROCKET_HEIGHT - 2.0 * ROCKET_HITBOX_INSET);
    }

    #[test]
    fn test_candle_hitbox_is_narrow_and_inset() {
        let candle = Candle {
            id: 1,
            x: 100.0,
            ohlc: CandleOhlc { open: 300.0, close: 200.0 },
            trend: Trend::Up,
        };
        let hitbox = candle.hitbox(&Tuning::default());
        assert_eq!(hitbox.width(), CANDLE_HITBOX_WIDTH);
        assert_eq!(hitbox.min.y, 199.0);
        assert_eq!(hitbox.max.y, 301.0);
    }

    #[test]
    fn test_successor_bumps_generation_and_keeps_sky() {
        let mut state = GameState::new(5);
        state.parallax.update(4.0);
        let next = state.successor(6);
        assert_eq!(next.generation(), state.generation() + 1);
        assert_eq!(next.parallax.save(), state.parallax.save());
        assert_eq!(next.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = GameState::new(5);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }
}
