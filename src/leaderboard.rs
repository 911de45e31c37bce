//! Leaderboard collaborator boundary
//!
//! The game never ranks scores itself; it asks a [`LeaderboardService`] and
//! renders whatever comes back. [`InMemoryLeaderboard`] reproduces the hosted
//! service's semantics for the native build and for tests:
//! - one entry per user, keeping only the best score
//! - every save counts as an attempt
//! - 1-based ranks, highest score first, ties in insertion order
//! - optional padding with starter entries so a fresh board never looks empty

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of entries shown on the menu
pub const DEFAULT_LIMIT: usize = 10;

/// Names used to pad a young leaderboard
pub const STARTER_NAMES: [&str; 10] = [
    "RocketPioneer",
    "MoonExplorer",
    "StarSeeker",
    "CosmicDreamer",
    "SpaceVoyager",
    "GalaxyWanderer",
    "AstroTrailblazer",
    "NebulaDrifter",
    "OrbitChaser",
    "StellarRookie",
];

/// A viewer's personal stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub highscore: u64,
    pub attempts: u32,
    /// `None` means unranked, never rank 0
    pub rank: Option<u32>,
}

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
    pub rank: u32,
}

/// Top-N board plus the viewer's own stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeaderboardData {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub user_stats: PlayerStats,
}

/// Who is playing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub username: String,
}

impl Player {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

/// The persistence service behind the post
pub trait LeaderboardService {
    /// Record a finished session. Returns the new highscore if it improved.
    fn save_score(&mut self, player: &Player, score: u64) -> Result<Option<u64>>;

    fn player_stats(&self, player: &Player) -> Result<PlayerStats>;

    fn leaderboard(&self, player: &Player, limit: usize) -> Result<LeaderboardData>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredScore {
    user_id: String,
    username: String,
    score: u64,
    /// Insertion order of the current score (tie breaker)
    seq: u64,
}

/// Sorted-set style leaderboard kept in memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLeaderboard {
    scores: Vec<StoredScore>,
    attempts: HashMap<String, u32>,
    next_seq: u64,
    pad_with_starters: bool,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill short boards with starter entries, like the hosted service
    pub fn with_starters() -> Self {
        Self {
            pad_with_starters: true,
            ..Self::default()
        }
    }

    /// Best-first, ties in insertion order
    fn ranked(&self) -> Vec<&StoredScore> {
        let mut ranked: Vec<&StoredScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.seq.cmp(&b.seq)));
        ranked
    }

    fn rank_of(&self, user_id: &str) -> Option<u32> {
        self.ranked()
            .iter()
            .position(|s| s.user_id == user_id)
            .map(|i| i as u32 + 1)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.ranked().first().map(|s| s.score)
    }
}

impl LeaderboardService for InMemoryLeaderboard {
    fn save_score(&mut self, player: &Player, score: u64) -> Result<Option<u64>> {
        if player.id.is_empty() {
            return Err(Error::Leaderboard {
                request: "save:score",
                reason: "anonymous viewer".to_string(),
            });
        }

        *self.attempts.entry(player.id.clone()).or_insert(0) += 1;

        let seq = self.next_seq;
        let improved = match self.scores.iter_mut().find(|s| s.user_id == player.id) {
            Some(existing) if score > existing.score => {
                existing.score = score;
                existing.username = player.username.clone();
                existing.seq = seq;
                true
            }
            Some(_) => false,
            None => {
                self.scores.push(StoredScore {
                    user_id: player.id.clone(),
                    username: player.username.clone(),
                    score,
                    seq,
                });
                true
            }
        };

        if improved {
            self.next_seq += 1;
            log::info!("New highscore {} for {}", score, player.username);
            Ok(Some(score))
        } else {
            Ok(None)
        }
    }

    fn player_stats(&self, player: &Player) -> Result<PlayerStats> {
        let highscore = self
            .scores
            .iter()
            .find(|s| s.user_id == player.id)
            .map(|s| s.score)
            .unwrap_or(0);
        Ok(PlayerStats {
            highscore,
            attempts: self.attempts.get(&player.id).copied().unwrap_or(0),
            rank: self.rank_of(&player.id),
        })
    }

    fn leaderboard(&self, player: &Player, limit: usize) -> Result<LeaderboardData> {
        let mut leaderboard: Vec<LeaderboardEntry> = self
            .ranked()
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, s)| LeaderboardEntry {
                username: s.username.clone(),
                score: s.score,
                rank: i as u32 + 1,
            })
            .collect();

        if self.pad_with_starters {
            for i in leaderboard.len()..limit {
                leaderboard.push(LeaderboardEntry {
                    username: STARTER_NAMES
                        .get(i)
                        .map(|name| name.to_string())
                        .unwrap_or_else(|| format!("Starter{}", i + 1)),
                    score: (limit - i) as u64,
                    rank: i as u32 + 1,
                });
            }
        }

        Ok(LeaderboardData {
            leaderboard,
            user_stats: self.player_stats(player)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Player {
        Player::new("t2_alice", "alice")
    }

    fn bob() -> Player {
        Player::new("t2_bob", "bob")
    }

    #[test]
    fn test_keeps_best_score_per_user() {
        let mut board = InMemoryLeaderboard::new();
        assert_eq!(board.save_score(&alice(), 10).unwrap(), Some(10));
        assert_eq!(board.save_score(&alice(), 4).unwrap(), None);
        assert_eq!(board.save_score(&alice(), 22).unwrap(), Some(22));

        let stats = board.player_stats(&alice()).unwrap();
        assert_eq!(stats.highscore, 22);
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.rank, Some(1));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_ranks_highest_first_ties_by_insertion() {
        let mut board = InMemoryLeaderboard::new();
        let carol = Player::new("t2_carol", "carol");
        board.save_score(&alice(), 8).unwrap();
        board.save_score(&bob(), 14).unwrap();
        board.save_score(&carol, 8).unwrap();

        let data = board.leaderboard(&carol, DEFAULT_LIMIT).unwrap();
        let names: Vec<&str> = data.leaderboard.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice", "carol"]);
        let ranks: Vec<u32> = data.leaderboard.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(data.user_stats.rank, Some(3));
    }

    #[test]
    fn test_unknown_player_is_unranked() {
        let board = InMemoryLeaderboard::new();
        let stats = board.player_stats(&bob()).unwrap();
        assert_eq!(stats, PlayerStats::default());
        assert_eq!(stats.rank, None);
    }

    #[test]
    fn test_pads_with_starters() {
        let mut board = InMemoryLeaderboard::with_starters();
        board.save_score(&alice(), 50).unwrap();

        let data = board.leaderboard(&alice(), DEFAULT_LIMIT).unwrap();
        assert_eq!(data.leaderboard.len(), DEFAULT_LIMIT);
        assert_eq!(data.leaderboard[0].username, "alice");
        assert_eq!(data.leaderboard[1].username, "MoonExplorer");
        assert_eq!(data.leaderboard[1].score, 9);
        assert_eq!(data.leaderboard[9].rank, 10);
    }

    #[test]
    fn test_limit_truncates() {
        let mut board = InMemoryLeaderboard::new();
        for i in 0..15u64 {
            let player = Player::new(format!("t2_{}", i), format!("pilot{}", i));
            board.save_score(&player, i).unwrap();
        }
        let data = board.leaderboard(&alice(), 5).unwrap();
        assert_eq!(data.leaderboard.len(), 5);
        assert_eq!(data.leaderboard[0].score, 14);
        assert_eq!(board.top_score(), Some(14));
    }

    #[test]
    fn test_anonymous_save_fails() {
        let mut board = InMemoryLeaderboard::new();
        let err = board.save_score(&Player::new("", "ghost"), 3).unwrap_err();
        assert!(matches!(err, Error::Leaderboard { .. }));
        assert!(board.is_empty());
    }
}
