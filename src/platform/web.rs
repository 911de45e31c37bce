//! Browser glue: postMessage transport and the exported game handle

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, Window};

use super::Transport;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::messages::{PostMessage, WebviewMessage};
use crate::tuning::Tuning;

/// Talks to the parent window when embedded in a post
pub struct PostMessageTransport {
    /// `None` when the page runs standalone
    parent: Option<Window>,
    inbox: Rc<RefCell<VecDeque<WebviewMessage>>>,
    _listener: Option<Closure<dyn FnMut(MessageEvent)>>,
}

impl PostMessageTransport {
    /// Attach to the parent window if this page is framed
    pub fn detect() -> Self {
        let inbox = Rc::new(RefCell::new(VecDeque::new()));
        let Some(window) = web_sys::window() else {
            return Self {
                parent: None,
                inbox,
                _listener: None,
            };
        };

        let top = window.top().ok().flatten();
        let embedded = top
            .as_ref()
            .is_some_and(|top| !js_sys::Object::is(top.as_ref(), window.as_ref()));
        if !embedded {
            log::info!("Not embedded in a post; leaderboard disabled");
            return Self {
                parent: None,
                inbox,
                _listener: None,
            };
        }

        let queue = Rc::clone(&inbox);
        let listener = Closure::<dyn FnMut(_)>::new(move |event: MessageEvent| {
            let json = match js_sys::JSON::stringify(&event.data()) {
                Ok(json) => String::from(json),
                Err(_) => return,
            };
            match WebviewMessage::from_json(&json) {
                Ok(message) => queue.borrow_mut().push_back(message),
                Err(err) => log::debug!("Ignoring message: {}", err),
            }
        });
        if window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not listen for host messages");
        }

        Self {
            parent: window.parent().ok().flatten(),
            inbox,
            _listener: Some(listener),
        }
    }
}

impl Transport for PostMessageTransport {
    fn send(&mut self, message: &PostMessage) -> Result<()> {
        let parent = self.parent.as_ref().ok_or(Error::TransportUnavailable {
            context: "not embedded",
        })?;
        let json = message.to_json()?;
        let value = js_sys::JSON::parse(&json).map_err(|_| Error::TransportUnavailable {
            context: "encode message",
        })?;
        parent
            .post_message(&value, "*")
            .map_err(|_| Error::TransportUnavailable {
                context: "postMessage",
            })
    }

    fn poll(&mut self) -> Vec<WebviewMessage> {
        self.inbox.borrow_mut().drain(..).collect()
    }
}

fn js_error(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn seed_from_clock() -> u64 {
    js_sys::Date::now() as u64
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Flappy Rockets (web) starting...");
}

/// Game handle driven by the page's animation loop
#[wasm_bindgen]
pub struct WebGame {
    game: Game<PostMessageTransport>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> std::result::Result<WebGame, JsValue> {
        let tuning = Tuning::for_screen(width, height);
        let mut game =
            Game::with_tuning(seed_from_clock(), tuning, PostMessageTransport::detect())
                .map_err(js_error)?;
        game.request_menu();
        Ok(WebGame { game })
    }

    pub fn thrust(&mut self) {
        self.game.thrust();
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.game.set_autopilot(enabled);
    }

    /// Advance by `dt` seconds; returns the raised events as JSON
    pub fn frame(&mut self, dt: f32) -> std::result::Result<String, JsValue> {
        let events = self.game.frame(dt);
        serde_json::to_string(&events).map_err(|err| js_error(err.into()))
    }

    /// Full session state as JSON, for drawing
    pub fn snapshot(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(self.game.state()).map_err(|err| js_error(err.into()))
    }

    pub fn hud_label(&self) -> String {
        self.game.hud_label()
    }

    pub fn menu_lines(&self) -> Vec<String> {
        self.game.menu().lines()
    }

    pub fn game_over_message(&self) -> Option<String> {
        self.game
            .game_over_summary()
            .map(|summary| summary.performance_message().to_string())
    }

    pub fn request_menu(&mut self) {
        self.game.request_menu();
    }

    pub fn restart(&mut self) {
        self.game.restart(seed_from_clock());
    }
}
