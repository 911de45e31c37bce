//! Property tests for the candle market, score curve and difficulty ramp

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use flappy_rockets::sim::{
    DifficultyController, MarketState, SpawnSlot, display_score_for, next_candle,
};
use flappy_rockets::Tuning;

proptest! {
    #[test]
    fn candle_opens_at_last_close_and_stays_in_margins(
        seed in any::<u64>(),
        fraction in 0.0f32..=1.0,
    ) {
        let tuning = Tuning::default();
        let last_close =
            tuning.margin_top + fraction * (tuning.max_candle_y() - tuning.margin_top);
        let mut rng = Pcg32::seed_from_u64(seed);

        let candle = next_candle(&mut rng, last_close, &tuning);
        prop_assert_eq!(candle.open, last_close);
        prop_assert!(candle.close >= tuning.margin_top);
        prop_assert!(candle.close <= tuning.max_candle_y());
    }

    #[test]
    fn chart_is_continuous_over_many_slots(seed in any::<u64>()) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut market = MarketState::new(&tuning);

        let mut previous_close = market.last_close;
        for _ in 0..200 {
            if let SpawnSlot::Candle { ohlc, .. } = market.advance(&mut rng, &tuning) {
                prop_assert_eq!(ohlc.open, previous_close);
                previous_close = ohlc.close;
            }
        }
    }

    #[test]
    fn weekend_slots_are_empty_and_keep_spacing(seed in any::<u64>()) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut market = MarketState::new(&tuning);

        // Walk until the first week closes
        let mut weekend = None;
        let mut last_x = 0.0;
        while weekend.is_none() {
            if let SpawnSlot::Candle { x, weekend: w, .. } = market.advance(&mut rng, &tuning) {
                weekend = w;
                last_x = x;
            }
        }
        let slots = weekend.unwrap_or(0);
        prop_assert!(slots >= tuning.weekend_min && slots <= tuning.weekend_max);

        for _ in 0..slots {
            match market.advance(&mut rng, &tuning) {
                SpawnSlot::Weekend { x, .. } => {
                    prop_assert_eq!(x, last_x + tuning.candle_width);
                    last_x = x;
                }
                SpawnSlot::Candle { .. } => prop_assert!(false, "candle during weekend"),
            }
        }
        let resumed = matches!(market.advance(&mut rng, &tuning), SpawnSlot::Candle { .. });
        prop_assert!(resumed, "candle after weekend");
    }

    #[test]
    fn display_score_is_floor_of_n_to_the_three_halves(n in 0u32..100_000) {
        let d = display_score_for(n);
        let cube = u128::from(n).pow(3);
        prop_assert!(u128::from(d).pow(2) <= cube);
        prop_assert!(u128::from(d + 1).pow(2) > cube);
    }

    #[test]
    fn difficulty_only_ramps_up_to_its_limits(escalations in 0usize..60) {
        let tuning = Tuning::default();
        let mut difficulty = DifficultyController::new(&tuning);

        let mut speed = difficulty.world_speed();
        let mut delay = difficulty.spawn_delay_ms();
        for _ in 0..escalations {
            let outcome = difficulty.on_escalation();
            prop_assert!(outcome.world_speed >= speed);
            prop_assert!(outcome.world_speed <= tuning.speed_cap);
            prop_assert!(outcome.spawn_delay_ms <= delay);
            prop_assert!(outcome.spawn_delay_ms >= tuning.delay_floor_ms);
            speed = outcome.world_speed;
            delay = outcome.spawn_delay_ms;
        }
    }
}
