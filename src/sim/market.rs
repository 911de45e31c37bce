//! Candle market obstacle generator
//!
//! Obstacles form a continuous procedural price chart: every candle opens
//! where the previous one closed, then trends up or down by a random amount
//! that never leaves the screen margins. After a trading week of candles the
//! market closes for a random "weekend" of empty slots.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Direction of a candle (cosmetic, decides the sprite color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    /// Close above open on screen (green)
    Up,
    /// Close at or below open on screen (red)
    Down,
}

/// Vertical extent of a single candle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleOhlc {
    pub open: f32,
    pub close: f32,
}

impl CandleOhlc {
    /// Screen y grows downward, so a rising price has `close < open`
    pub fn trend(&self) -> Trend {
        if self.close < self.open {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    pub fn top(&self) -> f32 {
        self.open.min(self.close)
    }

    pub fn bottom(&self) -> f32 {
        self.open.max(self.close)
    }

    pub fn mid(&self) -> f32 {
        (self.open + self.close) * 0.5
    }

    /// Absolute price move in pixels
    pub fn magnitude(&self) -> f32 {
        (self.close - self.open).abs()
    }
}

/// Uniform float in `[lo, hi]`, tolerating a degenerate range
fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        lo
    } else {
        rng.random_range(lo..=hi)
    }
}

/// Generate the next candle from the previous close
pub fn next_candle<R: Rng>(rng: &mut R, last_close: f32, tuning: &Tuning) -> CandleOhlc {
    let open = last_close;
    let min_y = tuning.margin_top;
    let max_y = tuning.max_candle_y();

    let room_up = (open - min_y).max(0.0);
    let room_down = (max_y - open).max(0.0);

    let mut go_down = rng.random_bool(0.5);
    let (room, other_room) = if go_down {
        (room_down, room_up)
    } else {
        (room_up, room_down)
    };
    // Squeezed against a margin: turn around if the other side has room
    if room < tuning.trend_min && other_room >= tuning.trend_min {
        go_down = !go_down;
    }
    let room = if go_down { room_down } else { room_up };

    let magnitude = if room < tuning.trend_min {
        room
    } else {
        uniform(rng, tuning.trend_min, room.min(tuning.trend_max))
    };

    let delta = if go_down { magnitude } else { -magnitude };
    let close = (open + delta).clamp(min_y, max_y.max(min_y));

    CandleOhlc { open, close }
}

/// Outcome of consuming one spawn slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnSlot {
    /// A real candle at screen x; `weekend` is set when it closed the week
    Candle {
        x: f32,
        ohlc: CandleOhlc,
        weekend: Option<u32>,
    },
    /// An empty weekend slot at screen x
    Weekend { x: f32, remaining: u32 },
}

/// Generator state carried between candles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    /// Close of the previous candle; seeds the next open
    pub last_close: f32,
    /// Screen-space x of the next slot (scrolls with the world)
    pub next_spawn_x: f32,
    /// Candles spawned since the last weekend
    pub candles_in_week: u32,
    /// Empty slots left in the current weekend
    pub weekend_slots_remaining: u32,
    /// Real candles spawned this session
    pub total_candles: u32,
}

impl MarketState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            last_close: tuning.screen_height / 2.0,
            next_spawn_x: tuning.screen_width + tuning.candle_width,
            candles_in_week: 0,
            weekend_slots_remaining: 0,
            total_candles: 0,
        }
    }

    /// Move the spawn cursor with the world
    pub fn scroll(&mut self, dx: f32) {
        self.next_spawn_x -= dx;
    }

    /// Distance cadence: the cursor has come within one viewport of the rocket
    pub fn is_due(&self, tuning: &Tuning) -> bool {
        tuning.rocket_x() + tuning.screen_width >= self.next_spawn_x
    }

    /// Timer cadence spawns at the right edge of the screen
    pub fn align_to_edge(&mut self, tuning: &Tuning) {
        self.next_spawn_x = tuning.screen_width + tuning.candle_width;
    }

    /// Consume one slot: either a candle or one tick of weekend
    pub fn advance<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) -> SpawnSlot {
        let x = self.next_spawn_x;
        self.next_spawn_x += tuning.candle_width;

        if self.weekend_slots_remaining > 0 {
            self.weekend_slots_remaining -= 1;
            return SpawnSlot::Weekend {
                x,
                remaining: self.weekend_slots_remaining,
            };
        }

        let ohlc = next_candle(rng, self.last_close, tuning);
        self.last_close = ohlc.close;
        self.candles_in_week += 1;
        self.total_candles += 1;

        let weekend = if self.candles_in_week >= tuning.candles_per_week {
            self.candles_in_week = 0;
            let (lo, hi) = if tuning.weekend_min <= tuning.weekend_max {
                (tuning.weekend_min, tuning.weekend_max)
            } else {
                (tuning.weekend_max, tuning.weekend_min)
            };
            let slots = rng.random_range(lo..=hi);
            self.weekend_slots_remaining = slots;
            Some(slots)
        } else {
            None
        };

        SpawnSlot::Candle { x, ohlc, weekend }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_open_continues_previous_close() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let candle = next_candle(&mut rng, 321.0, &tuning);
        assert_eq!(candle.open, 321.0);
        assert_ne!(candle.close, candle.open);
    }

    #[test]
    fn test_turns_around_at_top_margin() {
        let tuning = Tuning::default();
        // Open right at the top margin: only downward moves are possible
        for seed in 0..64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let candle = next_candle(&mut rng, tuning.margin_top, &tuning);
            assert!(candle.close >= candle.open + tuning.trend_min);
            assert_eq!(candle.trend(), Trend::Down);
        }
    }

    #[test]
    fn test_turns_around_at_bottom_margin() {
        let tuning = Tuning::default();
        let bottom = tuning.max_candle_y();
        for seed in 0..64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let candle = next_candle(&mut rng, bottom - 5.0, &tuning);
            assert_eq!(candle.trend(), Trend::Up);
            assert!(candle.magnitude() >= tuning.trend_min);
        }
    }

    #[test]
    fn test_squeezed_screen_clamps_to_room() {
        // 20 px of room on each side, less than trend_min
        let tuning = Tuning::for_screen(480.0, 80.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let candle = next_candle(&mut rng, 40.0, &tuning);
        assert!((candle.magnitude() - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_trend_classification() {
        let up = CandleOhlc { open: 300.0, close: 250.0 };
        let down = CandleOhlc { open: 300.0, close: 350.0 };
        assert_eq!(up.trend(), Trend::Up);
        assert_eq!(down.trend(), Trend::Down);
        assert_eq!(up.top(), 250.0);
        assert_eq!(down.bottom(), 350.0);
    }

    #[test]
    fn test_week_then_weekend() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut market = MarketState::new(&tuning);

        let mut weekend_len = None;
        for i in 0..tuning.candles_per_week {
            match market.advance(&mut rng, &tuning) {
                SpawnSlot::Candle { weekend, .. } => {
                    if i + 1 == tuning.candles_per_week {
                        weekend_len = weekend;
                    } else {
                        assert!(weekend.is_none());
                    }
                }
                other => panic!("expected candle, got {:?}", other),
            }
        }

        let len = weekend_len.expect("weekend after a full week");
        assert!((tuning.weekend_min..=tuning.weekend_max).contains(&len));

        for _ in 0..len {
            let before = market.next_spawn_x;
            let slot = market.advance(&mut rng, &tuning);
            assert!(matches!(slot, SpawnSlot::Weekend { .. }));
            assert_eq!(market.next_spawn_x, before + tuning.candle_width);
        }
        assert!(matches!(
            market.advance(&mut rng, &tuning),
            SpawnSlot::Candle { .. }
        ));
        assert_eq!(market.total_candles, tuning.candles_per_week + 1);
    }

    #[test]
    fn test_due_when_cursor_scrolls_into_view() {
        let tuning = Tuning::default();
        let mut market = MarketState::new(&tuning);
        market.next_spawn_x = tuning.rocket_x() + tuning.screen_width + 10.0;
        assert!(!market.is_due(&tuning));
        market.scroll(10.0);
        assert!(market.is_due(&tuning));
    }

    #[test]
    fn test_inverted_weekend_range_still_closes_the_week() {
        let tuning = Tuning {
            weekend_min: 8,
            weekend_max: 3,
            candles_per_week: 1,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(4);
        let mut market = MarketState::new(&tuning);
        match market.advance(&mut rng, &tuning) {
            SpawnSlot::Candle { weekend: Some(len), .. } => {
                assert!((3..=8).contains(&len));
            }
            other => panic!("expected week-closing candle, got {:?}", other),
        }
    }
}
