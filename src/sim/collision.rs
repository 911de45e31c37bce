//! Overlap detection between the rocket and the candle market
//!
//! Everything is axis-aligned: the rocket hitbox, candle bodies and the
//! full-height score triggers. The resolver only classifies overlaps; the
//! tick decides what each contact does.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Axis-aligned bounding box in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// A classified overlap for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Score sensor (awards one point, then consumed)
    Trigger(u32),
    /// Candle body (lethal)
    Candle(u32),
    /// Rocket left the vertical play area (lethal)
    Boundary,
}

impl Contact {
    pub fn is_lethal(&self) -> bool {
        !matches!(self, Contact::Trigger(_))
    }

    fn entity_id(&self) -> u32 {
        match self {
            Contact::Trigger(id) | Contact::Candle(id) => *id,
            Contact::Boundary => u32::MAX,
        }
    }
}

/// Rocket center outside `[0, screen_height]`
pub fn out_of_bounds(pos_y: f32, screen_height: f32) -> bool {
    pos_y <= 0.0 || pos_y >= screen_height
}

/// Every overlap this tick, in entity-id order, boundary last
///
/// Consumed triggers are skipped so a sensor can never score twice.
pub fn find_contacts(state: &GameState) -> Vec<Contact> {
    let rocket = state.rocket.hitbox();
    let height = state.tuning.screen_height;

    let mut contacts: Vec<Contact> = state
        .candles
        .iter()
        .filter(|c| c.hitbox(&state.tuning).overlaps(&rocket))
        .map(|c| Contact::Candle(c.id))
        .chain(
            state
                .triggers
                .iter()
                .filter(|t| !t.consumed && t.hitbox(&state.tuning).overlaps(&rocket))
                .map(|t| Contact::Trigger(t.id)),
        )
        .collect();
    contacts.sort_by_key(Contact::entity_id);

    if out_of_bounds(state.rocket.body.pos.y, height) {
        contacts.push(Contact::Boundary);
    }
    contacts
}

/// Anything scrolled past the left edge by more than `margin`
#[inline]
pub fn is_offscreen_left(x: f32, margin: f32) -> bool {
    x < -margin
}
