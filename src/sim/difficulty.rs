//! World speed and spawn cadence escalation

use serde::{Deserialize, Serialize};

use super::state::Particle;
use crate::tuning::Tuning;

/// What changed on an escalation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscalationOutcome {
    pub world_speed: f32,
    pub spawn_delay_ms: f64,
    /// The timer cadence must be torn down and restarted
    pub delay_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyController {
    world_speed: f32,
    spawn_delay_ms: f64,
    speed_increment: f32,
    speed_cap: f32,
    delay_decrement_ms: f64,
    delay_floor_ms: f64,
    escalations: u32,
}

impl DifficultyController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            world_speed: tuning.base_world_speed.min(tuning.speed_cap),
            spawn_delay_ms: tuning.spawn_delay_ms.max(tuning.delay_floor_ms),
            speed_increment: tuning.speed_increment,
            speed_cap: tuning.speed_cap,
            delay_decrement_ms: tuning.delay_decrement_ms,
            delay_floor_ms: tuning.delay_floor_ms,
            escalations: 0,
        }
    }

    pub fn world_speed(&self) -> f32 {
        self.world_speed
    }

    pub fn spawn_delay_ms(&self) -> f64 {
        self.spawn_delay_ms
    }

    pub fn escalations(&self) -> u32 {
        self.escalations
    }

    /// Raise world speed and shrink the spawn delay, both clamped
    pub fn on_escalation(&mut self) -> EscalationOutcome {
        self.escalations += 1;
        self.world_speed = (self.world_speed + self.speed_increment).min(self.speed_cap);

        let old_delay = self.spawn_delay_ms;
        self.spawn_delay_ms = (self.spawn_delay_ms - self.delay_decrement_ms).max(self.delay_floor_ms);

        EscalationOutcome {
            world_speed: self.world_speed,
            spawn_delay_ms: self.spawn_delay_ms,
            delay_changed: self.spawn_delay_ms != old_delay,
        }
    }
}

/// Replace the stale world-speed term of every particle, keeping its jitter
pub fn rebase_particles(particles: &mut [Particle], world_speed: f32) {
    for particle in particles {
        particle.body.vel.x = -world_speed + particle.jitter_x;
    }
}
