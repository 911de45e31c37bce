//! Cancellable delayed actions tied to a session generation
//!
//! Every delayed callback the session needs (return to idle after a thrust,
//! the first candle, the spawn timer, the post-crash score report) is a
//! [`ScheduledTask`] stamped with the generation it was created in. Resetting
//! the scheduler bumps the generation, so nothing from a previous session can
//! fire into a new one.

use serde::{Deserialize, Serialize};

/// Handle for cancelling a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(u32);

/// What to do when a task comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Thrust animation finished
    ReturnToIdle,
    /// Begin spawning candles
    FirstSpawn,
    /// Timer cadence: next candle slot
    SpawnTimer,
    /// Hand the terminal score to the leaderboard
    ReportScore { score: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub due_ms: f64,
    pub generation: u32,
    pub action: ScheduledAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    generation: u32,
    next_id: u32,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new(generation: u32) -> Self {
        Self {
            generation,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Schedule `action` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, action: ScheduledAction) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            due_ms: now_ms + delay_ms.max(0.0),
            generation: self.generation,
            action,
        });
        id
    }

    /// Returns true if the task was still pending
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Drop everything and invalidate any handle from the old generation
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.tasks.clear();
    }

    /// Pop every task due at `now_ms`, oldest first
    pub fn due(&mut self, now_ms: f64) -> Vec<ScheduledAction> {
        let generation = self.generation;
        let mut fired: Vec<ScheduledTask> = Vec::new();
        self.tasks.retain(|t| {
            if t.generation != generation {
                return false;
            }
            if t.due_ms <= now_ms {
                fired.push(t.clone());
                false
            } else {
                true
            }
        });
        fired.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.0.cmp(&b.id.0)));
        fired.into_iter().map(|t| t.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new(0);
        scheduler.schedule(0.0, 800.0, ScheduledAction::ReportScore { score: 3 });
        scheduler.schedule(0.0, 200.0, ScheduledAction::ReturnToIdle);

        assert!(scheduler.due(100.0).is_empty());
        assert_eq!(scheduler.due(200.0), vec![ScheduledAction::ReturnToIdle]);
        assert_eq!(
            scheduler.due(1000.0),
            vec![ScheduledAction::ReportScore { score: 3 }]
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new(0);
        let id = scheduler.schedule(0.0, 200.0, ScheduledAction::ReturnToIdle);
        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.due(500.0).is_empty());
    }

    #[test]
    fn test_reset_discards_stale_tasks() {
        let mut scheduler = Scheduler::new(4);
        scheduler.schedule(0.0, 800.0, ScheduledAction::ReportScore { score: 11 });
        scheduler.reset();
        assert_eq!(scheduler.generation(), 5);
        assert!(scheduler.due(10_000.0).is_empty());
    }
}
