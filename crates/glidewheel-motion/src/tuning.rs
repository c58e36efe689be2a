//! Daemon tuning parameters with clamping validation.

use std::time::Duration;

use glidewheel_curves::DampeningCurve;

/// Feel parameters for the smoothing engine, immutable once validated.
///
/// This is a tunable-feel daemon, not a correctness-critical one, so
/// out-of-range values are clamped rather than rejected: a bad flag gives a
/// usable daemon with the nearest sane value, never a refusal to start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Fraction of velocity removed (and emitted) per tick, `(0.01, 0.2]`.
    /// Lower values glide longer after release; higher stop faster.
    pub friction: f64,
    /// Scheduler period, `1..=50` ms.
    pub tick_interval: Duration,
    /// Impulse rate (events/sec) below which no dampening applies.
    pub low_rate: f64,
    /// Impulse rate (events/sec) at which dampening saturates.
    pub high_rate: f64,
    /// Dampening floor applied at or above `high_rate`, `(0, 1]`.
    pub min_scale: f64,
    /// Velocity magnitude below which an axis settles to rest.
    pub stop_threshold: f64,
    /// Global gain applied to every injected impulse, `(0.01, 10]`.
    pub multiplier: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            friction: 0.078,
            tick_interval: Duration::from_millis(4),
            low_rate: 5.0,
            high_rate: 30.0,
            min_scale: 0.3,
            stop_threshold: 0.5,
            multiplier: 0.5,
        }
    }
}

impl Tuning {
    /// Clamp every field into its valid range.
    #[must_use]
    pub fn clamped(self) -> Self {
        let low_rate = self.low_rate.max(0.0);
        let high_rate = if self.high_rate > low_rate {
            self.high_rate
        } else {
            low_rate + 1.0
        };
        Self {
            friction: self.friction.clamp(0.01, 0.2),
            tick_interval: self
                .tick_interval
                .clamp(Duration::from_millis(1), Duration::from_millis(50)),
            low_rate,
            high_rate,
            min_scale: self.min_scale.clamp(f64::EPSILON, 1.0),
            stop_threshold: self.stop_threshold.max(0.01),
            multiplier: self.multiplier.clamp(0.01, 10.0),
        }
    }

    /// Dampening curve described by this tuning.
    pub fn curve(&self) -> DampeningCurve {
        DampeningCurve::new(self.low_rate, self.high_rate, self.min_scale)
    }
}
