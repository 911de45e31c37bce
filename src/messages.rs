//! Messages exchanged with the hosting post
//!
//! Every message is JSON shaped as `{ "type": ..., "data": ... }`. Outbound
//! messages go from the game to the post; inbound messages carry the
//! leaderboard collaborator's answers back.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::leaderboard::{LeaderboardData, PlayerStats};

/// Hosted webviews wrap inbound payloads in this envelope type
pub const HOST_ENVELOPE_TYPE: &str = "devvit-message";

/// Terminal score of one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscorePayload {
    pub score: u64,
}

/// Game -> post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PostMessage {
    #[serde(rename = "save:score")]
    SaveScore(HighscorePayload),
    #[serde(rename = "request:player:stats")]
    RequestPlayerStats,
    #[serde(rename = "request:leaderboard")]
    RequestLeaderboard,
}

impl PostMessage {
    pub fn save_score(score: u64) -> Self {
        PostMessage::SaveScore(HighscorePayload { score })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Post -> game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WebviewMessage {
    #[serde(rename = "update:player:stats")]
    UpdatePlayerStats(PlayerStats),
    #[serde(rename = "update:leaderboard")]
    UpdateLeaderboard(LeaderboardData),
}

impl WebviewMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a message, unwrapping the host envelope if present
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let wrapped = value.get("type").and_then(Value::as_str) == Some(HOST_ENVELOPE_TYPE);
        let inner = if wrapped {
            value.pointer("/data/message").cloned().unwrap_or(Value::Null)
        } else {
            value
        };
        Ok(serde_json::from_value(inner)?)
    }
}
