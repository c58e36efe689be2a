//! Property tests for the dampening curve and rate tracker.

use std::time::{Duration, Instant};

use glidewheel_curves::{DampeningCurve, RateTracker};
use proptest::prelude::*;

proptest! {
    #[test]
    fn scale_is_bounded(
        low in 0.1f64..50.0,
        band in 0.1f64..100.0,
        min_scale in 0.01f64..1.0,
        rate in -10.0f64..500.0,
    ) {
        let curve = DampeningCurve::new(low, low + band, min_scale);
        let s = curve.scale(rate);
        prop_assert!(s >= curve.min_scale() - 1e-12);
        prop_assert!(s <= 1.0 + 1e-12);
    }

    #[test]
    fn scale_is_non_increasing(
        low in 0.1f64..50.0,
        band in 0.1f64..100.0,
        min_scale in 0.01f64..1.0,
        a in 0.0f64..500.0,
        delta in 0.0f64..100.0,
    ) {
        let curve = DampeningCurve::new(low, low + band, min_scale);
        prop_assert!(curve.scale(a + delta) <= curve.scale(a) + 1e-12);
    }

    #[test]
    fn rate_estimate_is_finite_and_non_negative(
        offsets in proptest::collection::vec(0u64..300_000u64, 0..200),
    ) {
        let base = Instant::now();
        let mut tracker = RateTracker::new();
        for us in &offsets {
            tracker.record(base + Duration::from_micros(*us));
        }
        let rate = tracker.rate(base + Duration::from_millis(300));
        prop_assert!(rate.is_finite());
        prop_assert!(rate >= 0.0);
    }
}
