//! Platform abstraction layer
//!
//! The game only talks to its host through a [`Transport`]:
//! - native builds and tests use [`LoopbackTransport`], which answers
//!   requests from an in-process [`LeaderboardService`]
//! - the web build posts JSON to the parent window (see `web`)

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::leaderboard::{DEFAULT_LIMIT, LeaderboardService, Player};
use crate::messages::{HOST_ENVELOPE_TYPE, PostMessage, WebviewMessage};

/// Message channel between the game and its hosting post
pub trait Transport {
    /// Deliver one outbound message
    fn send(&mut self, message: &PostMessage) -> Result<()>;

    /// Take every inbound message received since the last poll
    fn poll(&mut self) -> Vec<WebviewMessage>;
}

/// Answers requests synchronously from a local leaderboard
#[derive(Debug)]
pub struct LoopbackTransport<S: LeaderboardService> {
    service: S,
    player: Player,
    inbox: VecDeque<WebviewMessage>,
    /// Every message sent, in order
    sent: Vec<PostMessage>,
    online: bool,
}

impl<S: LeaderboardService> LoopbackTransport<S> {
    pub fn new(service: S, player: Player) -> Self {
        Self {
            service,
            player,
            inbox: VecDeque::new(),
            sent: Vec::new(),
            online: true,
        }
    }

    /// Simulate a page that is not embedded in a post
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn sent(&self) -> &[PostMessage] {
        &self.sent
    }

    fn answer(&mut self, message: &PostMessage) -> Result<WebviewMessage> {
        let reply = match message {
            PostMessage::SaveScore(payload) => {
                self.service.save_score(&self.player, payload.score)?;
                WebviewMessage::UpdatePlayerStats(self.service.player_stats(&self.player)?)
            }
            PostMessage::RequestPlayerStats => {
                WebviewMessage::UpdatePlayerStats(self.service.player_stats(&self.player)?)
            }
            PostMessage::RequestLeaderboard => WebviewMessage::UpdateLeaderboard(
                self.service.leaderboard(&self.player, DEFAULT_LIMIT)?,
            ),
        };
        Ok(reply)
    }
}

impl<S: LeaderboardService> Transport for LoopbackTransport<S> {
    fn send(&mut self, message: &PostMessage) -> Result<()> {
        if !self.online {
            return Err(Error::TransportUnavailable {
                context: "loopback offline",
            });
        }
        self.sent.push(message.clone());
        let reply = self.answer(message)?;
        // Same JSON the post would deliver, wrapped in its envelope
        let envelope = format!(
            r#"{{"type":"{}","data":{{"message":{}}}}}"#,
            HOST_ENVELOPE_TYPE,
            reply.to_json()?
        );
        self.inbox.push_back(WebviewMessage::from_json(&envelope)?);
        Ok(())
    }

    fn poll(&mut self) -> Vec<WebviewMessage> {
        self.inbox.drain(..).collect()
    }
}
