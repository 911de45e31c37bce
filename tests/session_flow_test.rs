//! Integration test: one session from first thrust to leaderboard
//!
//! thrust → five triggers (floor 11, first speed-up) → candle hit → one save

use flappy_rockets::consts::*;
use flappy_rockets::leaderboard::{InMemoryLeaderboard, LeaderboardService, Player};
use flappy_rockets::messages::PostMessage;
use flappy_rockets::platform::LoopbackTransport;
use flappy_rockets::sim::{
    Candle, CandleOhlc, CrashCause, GameEvent, GamePhase, GameState, ScoreTrigger, TickInput,
    Trend, game_over, tick,
};
use flappy_rockets::Game;

type TestGame = Game<LoopbackTransport<InMemoryLeaderboard>>;

fn new_game(seed: u64) -> TestGame {
    let transport =
        LoopbackTransport::new(InMemoryLeaderboard::new(), Player::new("t2_ada", "ada"));
    Game::new(seed, transport)
}

/// Pin the rocket mid-air so only scripted obstacles matter
fn hold_rocket(state: &mut GameState) {
    state.rocket.body.gravity = 0.0;
    state.rocket.body.vel.y = 0.0;
}

fn place_trigger(state: &mut GameState) {
    let id = state.next_entity_id();
    let x = state.rocket.body.pos.x;
    state.triggers.push(ScoreTrigger {
        id,
        candle_id: 0,
        x,
        consumed: false,
    });
}

fn place_candle(state: &mut GameState) -> u32 {
    let id = state.next_entity_id();
    let x = state.rocket.body.pos.x;
    let y = state.rocket.body.pos.y;
    state.candles.push(Candle {
        id,
        x,
        ohlc: CandleOhlc {
            open: y - 40.0,
            close: y + 40.0,
        },
        trend: Trend::Down,
    });
    id
}

fn saved_scores(game: &TestGame) -> Vec<u64> {
    game.transport()
        .sent()
        .iter()
        .filter_map(|m| match m {
            PostMessage::SaveScore(payload) => Some(payload.score),
            _ => None,
        })
        .collect()
}

#[test]
fn test_full_session_reports_final_floor_once() {
    let mut game = new_game(2024);
    game.thrust();
    game.frame(SIM_DT);
    assert_eq!(game.state().phase, GamePhase::Running);
    hold_rocket(game.state_mut());

    let mut events = Vec::new();
    for _ in 0..5 {
        place_trigger(game.state_mut());
        events.extend(game.frame(SIM_DT));
    }
    assert_eq!(game.state().score.internal(), 5);
    assert_eq!(game.state().display_score(), 11);
    assert_eq!(game.hud_label(), "Floor: 11");
    assert_eq!(game.state().world_speed(), 220.0);
    assert!(events.contains(&GameEvent::SpeedUp { world_speed: 220.0 }));

    let candle_id = place_candle(game.state_mut());
    game.frame(SIM_DT);
    assert!(game.state().is_over());
    assert_eq!(game.state().crash, Some(CrashCause::Candle { id: candle_id }));

    // Nothing is sent during the crash feedback
    assert!(saved_scores(&game).is_empty());
    for _ in 0..120 {
        game.frame(1.0 / 60.0);
    }
    assert_eq!(saved_scores(&game), vec![11]);

    let stats = game
        .transport()
        .service()
        .player_stats(game.transport().player())
        .unwrap();
    assert_eq!(stats.highscore, 11);
    assert_eq!(stats.rank, Some(1));

    let summary = game.game_over_summary().unwrap();
    assert_eq!(summary.score, 11);
    assert_eq!(summary.performance_message(), "Good effort!");
}

#[test]
fn test_game_over_is_idempotent() {
    let mut state = GameState::new(5);
    tick(
        &mut state,
        &TickInput {
            thrust: true,
            ..Default::default()
        },
        SIM_DT,
    );
    assert!(game_over(&mut state, CrashCause::Boundary));
    assert!(!game_over(&mut state, CrashCause::Candle { id: 1 }));
    assert_eq!(state.crash, Some(CrashCause::Boundary));

    let mut reports = 0;
    for _ in 0..240 {
        tick(&mut state, &TickInput::default(), SIM_DT);
        reports += state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ScoreReported { .. }))
            .count();
    }
    assert_eq!(reports, 1);
}

#[test]
fn test_unreachable_leaderboard_does_not_block_play() {
    let mut game = new_game(8);
    game.transport_mut().set_online(false);
    game.request_menu();
    assert!(game.menu().entries.is_empty());
    assert_eq!(game.menu().rank_label(), "Unranked");

    game.thrust();
    game.frame(SIM_DT);
    assert_eq!(game.state().phase, GamePhase::Running);
}

#[test]
fn test_restart_keeps_the_sky_moving() {
    let mut game = new_game(77);
    for _ in 0..60 {
        game.frame(1.0 / 60.0);
    }
    let before = game.state().parallax.save();
    assert!(before.stars1 > 0.0);

    game.restart(78);
    let after = game.state().parallax.save();
    assert_eq!(before, after);
    assert_eq!(game.state().display_score(), 0);
    assert!(game.state().candles.is_empty());
}

#[test]
fn test_autopilot_sessions_are_reproducible() {
    let run = |seed| {
        let mut game = new_game(seed);
        game.set_autopilot(true);
        for _ in 0..(60 * 20) {
            game.frame(1.0 / 60.0);
        }
        (
            game.state().time_ticks,
            game.state().score.internal(),
            game.state().market.total_candles,
            game.state().rocket.body.pos,
        )
    };
    assert_eq!(run(31337), run(31337));
}
