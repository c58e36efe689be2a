//! Property tests for the axis motion physics.

use glidewheel_motion::{AxisMotion, FINE_UNITS_PER_COARSE, Tuning};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Inject(f64),
    Tick,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-600.0f64..600.0).prop_map(Step::Inject),
        Just(Step::Tick),
    ]
}

proptest! {
    /// No units are created or lost at the fine/coarse boundary: while an
    /// axis is in motion, the carry always equals the fine units emitted
    /// since it last rested minus 120 per coarse detent emitted.
    #[test]
    fn fine_coarse_conservation(steps in proptest::collection::vec(step_strategy(), 1..300)) {
        let tuning = Tuning::default();
        let mut axis = AxisMotion::new();
        let mut fine_sum = 0i64;
        let mut coarse_sum = 0i64;

        for step in steps {
            let emission = match step {
                Step::Inject(raw) => axis.inject(raw, 1.0, &tuning),
                Step::Tick => axis.tick_emit(&tuning),
            };
            fine_sum += i64::from(emission.fine);
            coarse_sum += i64::from(emission.coarse);

            if axis.is_at_rest() {
                // Settling deliberately drops the sub-detent residue.
                fine_sum = 0;
                coarse_sum = 0;
            } else {
                prop_assert_eq!(
                    i64::from(axis.low_res_carry()),
                    fine_sum - coarse_sum * i64::from(FINE_UNITS_PER_COARSE)
                );
            }
        }
    }

    /// After any input sequence, letting the axis coast always reaches rest
    /// in bounded time, with the velocity magnitude never increasing.
    #[test]
    fn coasting_settles_monotonically(
        raw in -10_000.0f64..10_000.0,
        friction in 0.01f64..0.2,
    ) {
        let tuning = Tuning { friction, multiplier: 1.0, ..Tuning::default() }.clamped();
        let mut axis = AxisMotion::new();
        let _ = axis.inject(raw, 1.0, &tuning);

        let mut previous = axis.velocity().abs();
        for _ in 0..10_000 {
            if axis.is_at_rest() {
                break;
            }
            let _ = axis.tick_emit(&tuning);
            let current = axis.velocity().abs();
            prop_assert!(current <= previous + 1e-9);
            previous = current;
        }
        prop_assert!(axis.is_at_rest());
    }

    /// The sub-unit remainder never leaves (-1, 1) and emitted fine units
    /// always carry the velocity's sign.
    #[test]
    fn remainder_bounded_and_sign_correct(steps in proptest::collection::vec(step_strategy(), 1..200)) {
        let tuning = Tuning::default();
        let mut axis = AxisMotion::new();

        for step in steps {
            let before = axis.velocity();
            let emission = match step {
                Step::Inject(raw) => axis.inject(raw, 1.0, &tuning),
                Step::Tick => axis.tick_emit(&tuning),
            };
            prop_assert!(axis.fractional_remainder().abs() < 1.0);
            if let Step::Tick = step {
                if emission.fine != 0 {
                    prop_assert_eq!(emission.fine.signum() as f64, before.signum());
                }
            }
        }
    }

    /// Rest is idempotent: once settled, ticking never mutates state.
    #[test]
    fn rest_is_idempotent(ticks in 1usize..100) {
        let tuning = Tuning::default();
        let mut axis = AxisMotion::new();
        for _ in 0..ticks {
            prop_assert!(axis.tick_emit(&tuning).is_empty());
            prop_assert!(axis.is_at_rest());
        }
    }
}
