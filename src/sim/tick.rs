//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Input is
//! applied only at the start of a tick, so a thrust can never land halfway
//! through an update.

use glam::Vec2;
use rand::Rng;

use super::collision::{Contact, find_contacts, is_offscreen_left};
use super::difficulty::rebase_particles;
use super::market::SpawnSlot;
use super::schedule::ScheduledAction;
use super::score::Escalation;
use super::state::{
    Candle, CrashCause, GameEvent, GamePhase, GameState, Particle, RocketAnim, ScoreTrigger,
};
use super::body::Body;
use crate::consts::*;
use crate::tuning::SpawnCadence;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Thrust (click/tap/space)
    pub thrust: bool,
    /// Idle/demo mode - autopilot flies the rocket
    pub autopilot: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let wants_thrust = input.thrust || (input.autopilot && autopilot_wants_thrust(state));
    if wants_thrust {
        thrust(state);
    }

    state.time_ticks += 1;
    state.clock_ms += f64::from(dt) * 1000.0;

    // Sky scrolls in every phase
    state.parallax.update(dt);

    run_due_tasks(state);

    match state.phase {
        GamePhase::NotStarted => {
            // Rocket hovers until the first thrust
            update_particles(state, dt);
        }

        GamePhase::Running => {
            state.rocket.body.integrate(dt);

            let dx = state.world_speed() * dt;
            for candle in &mut state.candles {
                candle.x -= dx;
            }
            for trigger in &mut state.triggers {
                trigger.x -= dx;
            }
            state.market.scroll(dx);

            update_particles(state, dt);

            if state.spawning
                && state.tuning.spawn_cadence == SpawnCadence::Distance
                && state.market.is_due(&state.tuning)
            {
                spawn_slot(state);
            }

            resolve_contacts(state);
        }

        GamePhase::Over => {
            // World is frozen; the wreck still falls until it rests on the floor
            state.rocket.body.integrate(dt);
            let floor = state.tuning.screen_height - state.rocket.height / 2.0;
            if state.rocket.body.pos.y > floor {
                state.rocket.body.pos.y = floor;
                state.rocket.body.vel.y = 0.0;
            }
            update_particles(state, dt);
        }
    }

    sweep(state);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Apply a thrust; returns false once the session is over
pub fn thrust(state: &mut GameState) -> bool {
    match state.phase {
        GamePhase::Over => return false,
        GamePhase::NotStarted => start(state),
        GamePhase::Running => {}
    }

    state.rocket.body.vel.y = -state.tuning.thrust_power;
    state.rocket.anim = RocketAnim::Thrust;

    // Only the latest thrust may return the rocket to idle
    if let Some(task) = state.rocket.idle_task.take() {
        state.scheduler.cancel(task);
    }
    let now = state.clock_ms;
    let delay = state.tuning.return_to_idle_ms;
    state.rocket.idle_task = Some(
        state
            .scheduler
            .schedule(now, delay, ScheduledAction::ReturnToIdle),
    );

    spawn_exhaust(state);
    state.push_event(GameEvent::Thrust);
    true
}

fn start(state: &mut GameState) {
    state.phase = GamePhase::Running;
    let now = state.clock_ms;
    let delay = state.tuning.first_spawn_delay_ms;
    state
        .scheduler
        .schedule(now, delay, ScheduledAction::FirstSpawn);
    state.push_event(GameEvent::Started);
    log::info!(
        "Session {} started (seed {}, cadence {})",
        state.generation(),
        state.seed,
        state.tuning.spawn_cadence.as_str()
    );
}

/// Transition to `Over`. Idempotent: only the first call has any effect.
pub fn game_over(state: &mut GameState, cause: CrashCause) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }

    state.phase = GamePhase::Over;
    state.crash = Some(cause);
    state.rocket.anim = RocketAnim::Crash;
    state.rocket.body.vel.x = 0.0;

    if let Some(task) = state.rocket.idle_task.take() {
        state.scheduler.cancel(task);
    }
    if let Some(task) = state.spawn_timer.take() {
        state.scheduler.cancel(task);
    }
    state.spawning = false;

    for particle in &mut state.particles {
        particle.body.vel.x = 0.0;
    }

    let score = state.display_score();
    let now = state.clock_ms;
    let delay = state.tuning.crash_report_delay_ms;
    state
        .scheduler
        .schedule(now, delay, ScheduledAction::ReportScore { score });

    state.push_event(GameEvent::Crashed { cause, score });
    log::info!(
        "Crashed ({:?}) with score {} after {} candles",
        cause,
        score,
        state.market.total_candles
    );
    true
}

fn run_due_tasks(state: &mut GameState) {
    for action in state.scheduler.due(state.clock_ms) {
        match action {
            ScheduledAction::ReturnToIdle => {
                state.rocket.idle_task = None;
                if state.phase != GamePhase::Over {
                    state.rocket.anim = RocketAnim::Idle;
                }
            }
            ScheduledAction::FirstSpawn => {
                if state.phase != GamePhase::Running {
                    continue;
                }
                state.spawning = true;
                state.market.align_to_edge(&state.tuning);
                if state.tuning.spawn_cadence == SpawnCadence::Timer {
                    spawn_timed_slot(state);
                    restart_spawn_timer(state);
                }
            }
            ScheduledAction::SpawnTimer => {
                state.spawn_timer = None;
                if state.phase != GamePhase::Running {
                    continue;
                }
                spawn_timed_slot(state);
                restart_spawn_timer(state);
            }
            ScheduledAction::ReportScore { score } => {
                if !state.score_reported {
                    state.score_reported = true;
                    state.push_event(GameEvent::ScoreReported { score });
                    log::info!("Reporting final score {}", score);
                }
            }
        }
    }
}

/// Tear down any pending spawn timer and start a new one at the current delay
fn restart_spawn_timer(state: &mut GameState) {
    if let Some(task) = state.spawn_timer.take() {
        state.scheduler.cancel(task);
    }
    let now = state.clock_ms;
    let delay = state.difficulty.spawn_delay_ms();
    state.spawn_timer = Some(
        state
            .scheduler
            .schedule(now, delay, ScheduledAction::SpawnTimer),
    );
}

fn spawn_timed_slot(state: &mut GameState) {
    state.market.align_to_edge(&state.tuning);
    spawn_slot(state);
}

/// Consume one market slot, creating a candle and its trigger unless it is a weekend
fn spawn_slot(state: &mut GameState) {
    let slot = state.market.advance(&mut state.rng, &state.tuning);
    match slot {
        SpawnSlot::Candle { x, ohlc, weekend } => {
            let candle_id = state.next_entity_id();
            let trend = ohlc.trend();
            state.candles.push(Candle {
                id: candle_id,
                x,
                ohlc,
                trend,
            });

            let trigger_id = state.next_entity_id();
            let trigger_x = x + state.tuning.rocket_width;
            state.triggers.push(ScoreTrigger {
                id: trigger_id,
                candle_id,
                x: trigger_x,
                consumed: false,
            });

            state.push_event(GameEvent::CandleSpawned { id: candle_id, trend });
            log::debug!(
                "Candle {} at x={:.1} open={:.1} close={:.1} ({:?})",
                candle_id,
                x,
                ohlc.open,
                ohlc.close,
                trend
            );

            if let Some(slots) = weekend {
                state.push_event(GameEvent::WeekendStarted { slots });
                log::debug!("Market closed for {} slots", slots);
            }
        }
        SpawnSlot::Weekend { x, remaining } => {
            log::trace!("Weekend slot at x={:.1}, {} left", x, remaining);
        }
    }
}

fn resolve_contacts(state: &mut GameState) {
    for contact in find_contacts(state) {
        // Nothing scores after the crash, even within the same tick
        if state.phase != GamePhase::Running {
            break;
        }
        match contact {
            Contact::Trigger(id) => {
                let Some(trigger) = state.triggers.iter_mut().find(|t| t.id == id) else {
                    continue;
                };
                if trigger.consumed {
                    continue;
                }
                trigger.consumed = true;
                award_point(state);
            }
            Contact::Candle(id) => {
                game_over(state, CrashCause::Candle { id });
            }
            Contact::Boundary => {
                game_over(state, CrashCause::Boundary);
            }
        }
    }
}

fn award_point(state: &mut GameState) {
    let escalation = state.score.on_trigger();
    state.push_event(GameEvent::Scored {
        internal: state.score.internal(),
        display: state.score.display_score(),
    });
    if escalation == Escalation::Escalate {
        escalate(state);
    }
}

fn escalate(state: &mut GameState) {
    let outcome = state.difficulty.on_escalation();
    rebase_particles(&mut state.particles, outcome.world_speed);

    if state.tuning.spawn_cadence == SpawnCadence::Timer
        && outcome.delay_changed
        && state.spawn_timer.is_some()
    {
        restart_spawn_timer(state);
    }

    state.push_event(GameEvent::SpeedUp {
        world_speed: outcome.world_speed,
    });
    log::info!(
        "Difficulty up: speed {:.0}, spawn delay {:.0}ms",
        outcome.world_speed,
        outcome.spawn_delay_ms
    );
}

/// Exhaust puff behind the rocket
fn spawn_exhaust(state: &mut GameState) {
    if !state.tuning.particles {
        return;
    }

    let count: u32 = state.rng.random_range(2..=4);
    for _ in 0..count {
        if state.particles.len() >= MAX_PARTICLES {
            break;
        }
        let rocket_pos = state.rocket.body.pos;
        let offset = Vec2::new(
            -state.rocket.width * 0.6 + state.rng.random_range(-15.0f32..=15.0),
            state.rng.random_range(-15.0f32..=15.0),
        );
        let jitter_x: f32 =
            state.rng.random_range(-60.0f32..=-20.0) + state.rng.random_range(-40.0f32..=40.0);
        let vel = Vec2::new(
            -state.world_speed() + jitter_x,
            state.rng.random_range(-40.0f32..=40.0),
        );
        let fade_ms: f32 = state.rng.random_range(2000.0..=3000.0);
        let scale: f32 = state.rng.random_range(0.6..=1.0);

        let id = state.next_entity_id();
        state.particles.push(Particle {
            id,
            body: Body {
                pos: rocket_pos + offset,
                vel,
                gravity: PARTICLE_GRAVITY,
            },
            jitter_x,
            life: 1.0,
            fade_rate: 1000.0 / fade_ms,
            scale,
        });
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    for particle in &mut state.particles {
        particle.body.integrate(dt);
        particle.life -= particle.fade_rate * dt;
        particle.scale = (particle.scale - 0.4 * particle.fade_rate * dt).max(0.2);
    }
}

/// Single removal pass: consumed triggers and anything far off screen
fn sweep(state: &mut GameState) {
    let margin = state.tuning.offscreen_margin;
    let floor = state.tuning.screen_height + margin;

    state.candles.retain(|c| !is_offscreen_left(c.x, margin));
    state
        .triggers
        .retain(|t| !t.consumed && !is_offscreen_left(t.x, margin));
    state.particles.retain(|p| {
        p.life > 0.0 && !is_offscreen_left(p.body.pos.x, margin) && p.body.pos.y <= floor
    });
}

/// Demo pilot: hold the rocket a safe distance above the upcoming chart
pub fn autopilot_wants_thrust(state: &GameState) -> bool {
    match state.phase {
        GamePhase::NotStarted => return true,
        GamePhase::Over => return false,
        GamePhase::Running => {}
    }

    let rocket = &state.rocket.body;
    let lookahead_start = rocket.pos.x - state.tuning.candle_width;
    let lookahead_end = rocket.pos.x + 160.0;

    let ahead = state
        .candles
        .iter()
        .filter(|c| c.x >= lookahead_start && c.x <= lookahead_end);
    let ceiling = ahead.clone().map(|c| c.hitbox(&state.tuning).min.y).reduce(f32::min);
    let floor = ahead.map(|c| c.hitbox(&state.tuning).max.y).reduce(f32::max);

    let clearance = state.rocket.height * 2.0;
    let target = match (ceiling, floor) {
        (Some(top), _) if top - clearance > clearance => top - clearance,
        (_, Some(bottom)) => bottom + clearance,
        _ => state.tuning.screen_height * 0.5,
    };

    rocket.pos.y > target && rocket.vel.y > -state.tuning.thrust_power * 0.3
}
