//! Parallax background offsets
//!
//! Offsets outlive a single session (menu, game and game-over all scroll the
//! same sky), so they are plain serializable state handed into a session at
//! construction and read back out when it ends.

use serde::{Deserialize, Serialize};

/// Scroll speeds in pixels/s, far to near
pub const STARS1_SPEED: f32 = 5.0;
pub const STARS2_SPEED: f32 = 8.0;
pub const STARS3_SPEED: f32 = 12.0;
pub const BUILDINGS_SPEED: f32 = 25.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParallaxOffsets {
    pub stars1: f32,
    pub stars2: f32,
    pub stars3: f32,
    pub buildings: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallaxSpeeds {
    pub stars1: f32,
    pub stars2: f32,
    pub stars3: f32,
    pub buildings: f32,
}

impl Default for ParallaxSpeeds {
    fn default() -> Self {
        Self {
            stars1: STARS1_SPEED,
            stars2: STARS2_SPEED,
            stars3: STARS3_SPEED,
            buildings: BUILDINGS_SPEED,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parallax {
    pub offsets: ParallaxOffsets,
    pub speeds: ParallaxSpeeds,
}

impl Parallax {
    pub fn restore(offsets: ParallaxOffsets) -> Self {
        Self {
            offsets,
            speeds: ParallaxSpeeds::default(),
        }
    }

    /// Time-based scroll, independent of world speed
    pub fn update(&mut self, dt: f32) {
        self.offsets.stars1 += self.speeds.stars1 * dt;
        self.offsets.stars2 += self.speeds.stars2 * dt;
        self.offsets.stars3 += self.speeds.stars3 * dt;
        self.offsets.buildings += self.speeds.buildings * dt;
    }

    pub fn save(&self) -> ParallaxOffsets {
        self.offsets
    }
}
