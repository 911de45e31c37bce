//! Menu and game-over view models
//!
//! Pure data for whatever draws the screens. Fetch failures collapse to empty
//! defaults here so a missing leaderboard can never block a session start.

use crate::error::Result;
use crate::leaderboard::{LeaderboardData, LeaderboardEntry, PlayerStats};

/// What the menu shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSummary {
    pub highscore: u64,
    pub attempts: u32,
    /// `None` renders as "unranked"
    pub rank: Option<u32>,
    pub entries: Vec<LeaderboardEntry>,
}

impl MenuSummary {
    /// Leaderboard fetch result; any error degrades to zero entries, no rank
    pub fn from_fetch(result: Result<LeaderboardData>) -> Self {
        match result {
            Ok(data) => Self {
                highscore: data.user_stats.highscore,
                attempts: data.user_stats.attempts,
                rank: data.user_stats.rank,
                entries: data.leaderboard,
            },
            Err(err) => {
                log::warn!("Leaderboard unavailable, showing empty board: {}", err);
                Self::default()
            }
        }
    }

    /// Stats-only fetch, before any leaderboard has arrived
    pub fn from_stats(result: Result<PlayerStats>) -> Self {
        let mut menu = Self::default();
        menu.apply_stats(result);
        menu
    }

    /// Stats-only fetch; keeps whatever entries are already shown
    pub fn apply_stats(&mut self, result: Result<PlayerStats>) {
        match result {
            Ok(stats) => {
                self.highscore = stats.highscore;
                self.attempts = stats.attempts;
                self.rank = stats.rank;
            }
            Err(err) => {
                log::warn!("Player stats unavailable, keeping defaults: {}", err);
            }
        }
    }

    pub fn rank_label(&self) -> String {
        match self.rank {
            Some(rank) => format!("#{}", rank),
            None => "Unranked".to_string(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Highscore: {}", self.highscore),
            format!("Games played: {}", self.attempts),
            format!("Rank: {}", self.rank_label()),
        ];
        lines.extend(
            self.entries
                .iter()
                .map(|e| format!("{:>2}. {:<18} {}", e.rank, e.username, e.score)),
        );
        lines
    }
}

/// What the game-over screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u64,
    pub new_highscore: bool,
}

impl GameOverSummary {
    /// `previous` is the viewer's best before this session, if known
    pub fn new(score: u64, previous: Option<&PlayerStats>) -> Self {
        let new_highscore = match previous {
            Some(stats) => score > stats.highscore,
            None => score > 0,
        };
        Self {
            score,
            new_highscore,
        }
    }

    pub fn performance_message(&self) -> &'static str {
        performance_message(self.score)
    }
}

pub fn performance_message(score: u64) -> &'static str {
    match score {
        50.. => "Amazing!",
        30..=49 => "Great job!",
        20..=29 => "Well done!",
        10..=19 => "Good effort!",
        _ => "Keep trying!",
    }
}

/// In-game HUD label
pub fn score_label(display_score: u64) -> String {
    format!("Floor: {}", display_score)
}
