//! Flappy Rockets entry point
//!
//! On the web the library's `WebGame` is driven from JavaScript. Natively this
//! runs headless autopilot sessions against an in-memory leaderboard and
//! prints the results.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use flappy_rockets::consts::*;
    use flappy_rockets::leaderboard::{InMemoryLeaderboard, Player};
    use flappy_rockets::platform::LoopbackTransport;
    use flappy_rockets::sim::GameEvent;
    use flappy_rockets::{Game, Result, SpawnCadence, Tuning};

    /// Longest a single autopilot session may run, in simulated seconds
    const SESSION_CAP_SECS: f32 = 300.0;

    const USAGE: &str =
        "usage: flappy-rockets [--seed N] [--sessions N] [--tuning FILE] [--cadence distance|timer]";

    pub struct Options {
        seed: u64,
        sessions: u32,
        tuning: Option<String>,
        cadence: Option<SpawnCadence>,
    }

    impl Options {
        pub fn parse(mut args: impl Iterator<Item = String>) -> std::result::Result<Self, String> {
            let mut options = Options {
                seed: 12345,
                sessions: 3,
                tuning: None,
                cadence: None,
            };
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--seed" => {
                        options.seed = value(&mut args, "--seed")?
                            .parse()
                            .map_err(|_| "--seed expects an integer".to_string())?;
                    }
                    "--sessions" => {
                        options.sessions = value(&mut args, "--sessions")?
                            .parse()
                            .map_err(|_| "--sessions expects an integer".to_string())?;
                    }
                    "--tuning" => options.tuning = Some(value(&mut args, "--tuning")?),
                    "--cadence" => {
                        let name = value(&mut args, "--cadence")?;
                        options.cadence = Some(SpawnCadence::from_str(&name).ok_or_else(|| {
                            format!("unknown cadence '{}' (expected distance or timer)", name)
                        })?);
                    }
                    "-h" | "--help" => return Err(USAGE.to_string()),
                    other => return Err(format!("unknown argument '{}'\n{}", other, USAGE)),
                }
            }
            Ok(options)
        }
    }

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> std::result::Result<String, String> {
        args.next().ok_or_else(|| format!("{} expects a value", flag))
    }

    fn load_tuning(options: &Options) -> Result<Tuning> {
        let mut tuning = match &options.tuning {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };
        if let Some(cadence) = options.cadence {
            tuning.spawn_cadence = cadence;
        }
        Ok(tuning)
    }

    pub fn run(options: Options) -> Result<()> {
        let tuning = load_tuning(&options)?;
        log::info!(
            "Tuning: {}x{}, cadence {}",
            tuning.screen_width,
            tuning.screen_height,
            tuning.spawn_cadence.as_str()
        );

        let transport = LoopbackTransport::new(
            InMemoryLeaderboard::with_starters(),
            Player::new("t2_autopilot", "Autopilot"),
        );
        let mut game = Game::with_tuning(options.seed, tuning, transport)?;
        game.set_autopilot(true);
        game.request_menu();

        for session in 0..options.sessions {
            if session > 0 {
                game.restart(options.seed.wrapping_add(u64::from(session)));
            }

            let mut elapsed = 0.0;
            let mut reported = None;
            while reported.is_none() && elapsed < SESSION_CAP_SECS {
                for event in game.frame(1.0 / 60.0) {
                    if let GameEvent::ScoreReported { score } = event {
                        reported = Some(score);
                    }
                }
                elapsed += 1.0 / 60.0;
            }

            let state = game.state();
            match game.game_over_summary() {
                Some(summary) => println!(
                    "Session {}: {} after {} candles ({:.0} px/s) - {}",
                    session + 1,
                    game.hud_label(),
                    state.market.total_candles,
                    state.world_speed(),
                    summary.performance_message()
                ),
                None => println!(
                    "Session {}: still flying after {:.0}s at {}",
                    session + 1,
                    SESSION_CAP_SECS,
                    game.hud_label()
                ),
            }
        }

        game.request_menu();
        println!();
        for line in game.menu().lines() {
            println!("{}", line);
        }
        log::debug!("Fixed step {:.4}s, up to {} substeps", SIM_DT, MAX_SUBSTEPS);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    log::info!("Flappy Rockets (native) starting...");

    let options = match native::Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };
    if let Err(err) = native::run(options) {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's `start`, this is just to satisfy the compiler
}
