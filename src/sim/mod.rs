//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod background;
pub mod body;
pub mod collision;
pub mod difficulty;
pub mod market;
pub mod schedule;
pub mod score;
pub mod state;
pub mod tick;

pub use background::{Parallax, ParallaxOffsets};
pub use body::Body;
pub use collision::{Aabb, Contact, find_contacts};
pub use difficulty::{DifficultyController, EscalationOutcome, rebase_particles};
pub use market::{CandleOhlc, MarketState, SpawnSlot, Trend, next_candle};
pub use schedule::{ScheduledAction, Scheduler, TaskId};
pub use score::{Escalation, ScoreEngine, display_score_for};
pub use state::{
    Candle, CrashCause, GameEvent, GamePhase, GameState, Particle, Rocket, RocketAnim,
    ScoreTrigger,
};
pub use tick::{TickInput, autopilot_wants_thrust, game_over, thrust, tick};
