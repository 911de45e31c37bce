//! Score counter and display transform
//!
//! The internal counter only ever moves by +1 per score trigger. What the
//! player sees is `floor(n^1.5)`, which starts slow and accelerates.

use serde::{Deserialize, Serialize};

/// Whether a trigger landed on a difficulty escalation point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    None,
    Escalate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEngine {
    internal: u32,
    /// Points between escalations
    interval: u32,
}

impl ScoreEngine {
    pub fn new(interval: u32) -> Self {
        Self {
            internal: 0,
            interval: interval.max(1),
        }
    }

    /// Award exactly one point
    pub fn on_trigger(&mut self) -> Escalation {
        self.internal = self.internal.saturating_add(1);
        if self.is_escalation_point() {
            Escalation::Escalate
        } else {
            Escalation::None
        }
    }

    pub fn internal(&self) -> u32 {
        self.internal
    }

    /// `floor(internal^1.5)`, computed exactly as `isqrt(internal^3)`
    pub fn display_score(&self) -> u64 {
        display_score_for(self.internal)
    }

    /// True at every positive multiple of the escalation interval
    pub fn is_escalation_point(&self) -> bool {
        self.internal > 0 && self.internal % self.interval == 0
    }
}

pub fn display_score_for(internal: u32) -> u64 {
    let n = internal as u64;
    (n * n * n).isqrt()
}
