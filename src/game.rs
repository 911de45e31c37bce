//! Host loop around the simulation
//!
//! Owns a [`GameState`], feeds it fixed timesteps from variable frame deltas,
//! buffers player input until the next tick boundary, and turns simulation
//! events into messages for the hosting post.

use crate::consts::*;
use crate::error::Result;
use crate::leaderboard::PlayerStats;
use crate::messages::{PostMessage, WebviewMessage};
use crate::platform::Transport;
use crate::screens::{GameOverSummary, MenuSummary, score_label};
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

pub struct Game<T: Transport> {
    state: GameState,
    transport: T,
    accumulator: f32,
    /// Thrust requested since the last tick
    pending_thrust: bool,
    autopilot: bool,
    menu: MenuSummary,
    /// Viewer's stats as last reported by the host
    stats: Option<PlayerStats>,
    game_over: Option<GameOverSummary>,
}

impl<T: Transport> Game<T> {
    pub fn new(seed: u64, transport: T) -> Self {
        Self::from_state(GameState::new(seed), transport)
    }

    /// Custom balance; rejected before any session can run on it
    pub fn with_tuning(seed: u64, tuning: Tuning, transport: T) -> Result<Self> {
        tuning.validate()?;
        Ok(Self::from_state(GameState::with_tuning(seed, tuning), transport))
    }

    fn from_state(state: GameState, transport: T) -> Self {
        Self {
            state,
            transport,
            accumulator: 0.0,
            pending_thrust: false,
            autopilot: false,
            menu: MenuSummary::default(),
            stats: None,
            game_over: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tools and scripted scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn menu(&self) -> &MenuSummary {
        &self.menu
    }

    pub fn game_over_summary(&self) -> Option<&GameOverSummary> {
        self.game_over.as_ref()
    }

    pub fn hud_label(&self) -> String {
        score_label(self.state.display_score())
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Click, tap or key press; applied at the next tick
    pub fn thrust(&mut self) {
        self.pending_thrust = true;
    }

    /// Advance by a wall-clock delta in seconds; returns the events raised
    pub fn frame(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                thrust: self.pending_thrust,
                autopilot: self.autopilot,
            };
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending_thrust = false;

            events.extend(self.state.drain_events());
        }

        // Drop backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in &events {
            self.handle_event(event);
        }
        self.poll_messages();
        events
    }

    fn handle_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Crashed { score, .. } => {
                self.game_over = Some(GameOverSummary::new(score, self.stats.as_ref()));
            }
            GameEvent::ScoreReported { score } => {
                if let Err(err) = self.transport.send(&PostMessage::save_score(score)) {
                    log::warn!("Could not save score {}: {}", score, err);
                }
            }
            _ => {}
        }
    }

    /// Ask the host for the viewer's stats and the top entries
    pub fn request_menu(&mut self) {
        let sent = self
            .transport
            .send(&PostMessage::RequestPlayerStats)
            .and_then(|_| self.transport.send(&PostMessage::RequestLeaderboard));
        if let Err(err) = sent {
            self.menu = MenuSummary::from_fetch(Err(err));
            return;
        }
        self.poll_messages();
    }

    /// Apply whatever the host has answered so far
    pub fn poll_messages(&mut self) {
        for message in self.transport.poll() {
            self.apply_message(message);
        }
    }

    fn apply_message(&mut self, message: WebviewMessage) {
        match message {
            WebviewMessage::UpdatePlayerStats(stats) => {
                self.menu.apply_stats(Ok(stats.clone()));
                self.stats = Some(stats);
            }
            WebviewMessage::UpdateLeaderboard(data) => {
                self.stats = Some(data.user_stats.clone());
                self.menu = MenuSummary::from_fetch(Ok(data));
            }
        }
    }

    /// Apply a raw JSON message from the host
    pub fn receive_json(&mut self, json: &str) -> Result<()> {
        let message = WebviewMessage::from_json(json)?;
        self.apply_message(message);
        Ok(())
    }

    /// Begin a new session; the sky keeps scrolling from where it was
    pub fn restart(&mut self, seed: u64) {
        self.state = self.state.successor(seed);
        self.accumulator = 0.0;
        self.pending_thrust = false;
        self.game_over = None;
        log::info!("New session (seed {})", seed);
    }
}
