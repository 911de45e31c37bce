//! Point-mass integration shared by the rocket and exhaust particles

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point mass under constant downward gravity (screen y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Downward acceleration in pixels/s²
    pub gravity: f32,
}

impl Body {
    pub fn new(pos: Vec2, gravity: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            gravity,
        }
    }

    /// Semi-implicit Euler step
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.vel.y += self.gravity * dt;
        self.pos += self.vel * dt;
    }
}
