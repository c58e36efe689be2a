//! Axis motion state: inject, decay, emit.

use std::time::Instant;

use glidewheel_curves::RateTracker;

use crate::{FINE_UNITS_PER_COARSE, Tuning};

/// Motion emitted by one step, as signed unit counts.
///
/// `fine` is the hi-res delta for this step; `coarse` is how many whole
/// wheel detents the low-res carry crossed while absorbing it. Downstream
/// consumers are split between the two resolutions, so both must be driven
/// consistently from the same accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Emission {
    /// Hi-res units to emit on this axis (may be 0).
    pub fine: i32,
    /// Whole coarse detents to emit, sign matching `fine`'s direction.
    pub coarse: i32,
}

impl Emission {
    /// An emission carrying no motion.
    pub const NONE: Self = Self { fine: 0, coarse: 0 };

    /// Whether this step produced any motion at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fine == 0 && self.coarse == 0
    }
}

/// Physical state of one scroll axis.
///
/// Two independent instances exist, vertical and horizontal; they share no
/// state and have no ordering dependency. Each holds a decaying velocity, a
/// sub-unit remainder so fractional extraction never stutters, an integer
/// carry toward the next coarse detent, and the axis's impulse-rate history.
#[derive(Debug, Clone)]
pub struct AxisMotion {
    velocity: f64,
    fractional_remainder: f64,
    low_res_carry: i32,
    rate: RateTracker,
}

impl AxisMotion {
    /// Create an axis at rest.
    pub fn new() -> Self {
        Self {
            velocity: 0.0,
            fractional_remainder: 0.0,
            low_res_carry: 0,
            rate: RateTracker::new(),
        }
    }

    /// Record an impulse timestamp and return the current impulse rate.
    pub fn record_impulse(&mut self, ts: Instant) -> f64 {
        self.rate.record(ts);
        self.rate.rate(ts)
    }

    /// Inject a scaled impulse and immediately emit the first quantum.
    ///
    /// `raw_fine_units` is the impulse magnitude in fine units (a coarse
    /// wheel click is worth 120). The immediate emission runs the same
    /// decay/emit routine as the periodic tick, so the very first pulse of a
    /// gesture produces visible output in the same scheduling pass instead
    /// of waiting up to one tick interval. An impulse landing just before a
    /// tick therefore decays twice in quick succession; that sharper initial
    /// response is intended behavior, not an artifact to smooth out.
    ///
    /// When the decay-derived extraction stays below one whole unit but the
    /// velocity is above the stop threshold, exactly one unit is emitted in
    /// the velocity's direction and debited from the velocity directly. This
    /// guarantees even the smallest impulse gives instant visible feedback,
    /// which matters for slow precise scrolling with tiny deltas.
    pub fn inject(&mut self, raw_fine_units: f64, scale: f64, tuning: &Tuning) -> Emission {
        self.velocity += raw_fine_units * scale * tuning.multiplier;

        let emission = self.tick_emit(tuning);
        if !emission.is_empty() || self.velocity.abs() < tuning.stop_threshold {
            return emission;
        }

        // Force-emit path: one unit, debited outside the decay/remainder
        // bookkeeping. The carry still absorbs the unit so the fine/coarse
        // accounting stays balanced.
        let dir = if self.velocity > 0.0 { 1 } else { -1 };
        self.low_res_carry += dir;
        self.velocity -= f64::from(dir);
        self.fractional_remainder = 0.0;
        Emission {
            fine: dir,
            coarse: 0,
        }
    }

    /// Run one decay step and return the motion to emit.
    ///
    /// Below the stop threshold the axis settles: every numeric field is
    /// zeroed so no infinitesimal residue can drift out later. Otherwise a
    /// `friction` fraction of the velocity is extracted, accumulated into
    /// the sub-unit remainder, and the whole part (truncated toward zero,
    /// keeping both scroll directions symmetric) becomes this tick's fine
    /// emission. Fine units feed the low-res carry, which yields one coarse
    /// detent per 120 accumulated; a burst tick can cross several detents.
    pub fn tick_emit(&mut self, tuning: &Tuning) -> Emission {
        if self.velocity.abs() < tuning.stop_threshold {
            self.velocity = 0.0;
            self.fractional_remainder = 0.0;
            self.low_res_carry = 0;
            return Emission::NONE;
        }

        let old_velocity = self.velocity;
        self.velocity *= 1.0 - tuning.friction;
        let extracted = old_velocity - self.velocity;

        self.fractional_remainder += extracted;
        let whole = self.fractional_remainder.trunc();
        self.fractional_remainder -= whole;
        let fine = whole as i32;

        if fine == 0 {
            return Emission::NONE;
        }

        let mut coarse = 0;
        self.low_res_carry += fine;
        while self.low_res_carry >= FINE_UNITS_PER_COARSE {
            coarse += 1;
            self.low_res_carry -= FINE_UNITS_PER_COARSE;
        }
        while self.low_res_carry <= -FINE_UNITS_PER_COARSE {
            coarse -= 1;
            self.low_res_carry += FINE_UNITS_PER_COARSE;
        }

        Emission { fine, coarse }
    }

    /// Current velocity in fine units of extraction potential.
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Sub-unit emission remainder, always in `(-1, 1)`.
    #[inline]
    pub fn fractional_remainder(&self) -> f64 {
        self.fractional_remainder
    }

    /// Fine units accumulated toward the next coarse detent.
    #[inline]
    pub fn low_res_carry(&self) -> i32 {
        self.low_res_carry
    }

    /// Whether the axis is fully settled.
    #[inline]
    pub fn is_at_rest(&self) -> bool {
        self.velocity == 0.0 && self.fractional_remainder == 0.0 && self.low_res_carry == 0
    }
}

impl Default for AxisMotion {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn rest_axis_ticks_to_nothing() {
        let mut axis = AxisMotion::new();
        for _ in 0..10 {
            assert_eq!(axis.tick_emit(&tuning()), Emission::NONE);
        }
        assert!(axis.is_at_rest());
    }

    #[test]
    fn settling_zeroes_all_state() {
        let mut axis = AxisMotion::new();
        // Below stop threshold but with stale remainder/carry.
        axis.velocity = 0.2;
        axis.fractional_remainder = 0.7;
        axis.low_res_carry = 40;

        assert_eq!(axis.tick_emit(&tuning()), Emission::NONE);
        assert!(axis.is_at_rest());
    }

    #[test]
    fn decay_is_geometric_and_terminates() {
        let mut axis = AxisMotion::new();
        axis.velocity = 600.0;

        let mut previous = axis.velocity();
        let mut ticks = 0;
        while !axis.is_at_rest() {
            let _ = axis.tick_emit(&tuning());
            assert!(axis.velocity() <= previous);
            previous = axis.velocity();
            ticks += 1;
            assert!(ticks < 1_000, "axis failed to settle");
        }
    }

    #[test]
    fn remainder_stays_sub_unit() {
        let mut axis = AxisMotion::new();
        axis.velocity = 137.3;
        while !axis.is_at_rest() {
            let _ = axis.tick_emit(&tuning());
            assert!(axis.fractional_remainder().abs() < 1.0);
        }
    }

    #[test]
    fn truncation_is_sign_symmetric() {
        let tuning = tuning();
        let mut up = AxisMotion::new();
        let mut down = AxisMotion::new();
        up.velocity = 240.0;
        down.velocity = -240.0;

        let mut up_total = 0i64;
        let mut down_total = 0i64;
        while !(up.is_at_rest() && down.is_at_rest()) {
            up_total += i64::from(up.tick_emit(&tuning).fine);
            down_total += i64::from(down.tick_emit(&tuning).fine);
        }
        assert_eq!(up_total, -down_total);
    }

    #[test]
    fn coarse_detent_crossing_both_signs() {
        let tuning = tuning();
        let mut axis = AxisMotion::new();
        axis.velocity = 5_000.0;

        let first = axis.tick_emit(&tuning);
        // 7.8% of 5000 is 390 fine units: three whole detents.
        assert_eq!(first.fine, 390);
        assert_eq!(first.coarse, 3);
        assert_eq!(axis.low_res_carry(), 30);

        let mut negative = AxisMotion::new();
        negative.velocity = -5_000.0;
        let first = negative.tick_emit(&tuning);
        assert_eq!(first.fine, -390);
        assert_eq!(first.coarse, -3);
        assert_eq!(negative.low_res_carry(), -30);
    }

    #[test]
    fn force_emit_for_tiny_impulse() {
        let tuning = Tuning {
            friction: 0.078,
            stop_threshold: 0.5,
            multiplier: 1.0,
            ..Tuning::default()
        };
        let mut axis = AxisMotion::new();

        // 2 fine units: decay extracts ~0.16, rounds to zero, but the
        // velocity is above the stop threshold.
        let emission = axis.inject(2.0, 1.0, &tuning);
        assert_eq!(emission, Emission { fine: 1, coarse: 0 });
        // Exactly one unit debited from velocity, remainder cleared.
        assert!((axis.velocity() - (2.0 * (1.0 - tuning.friction) - 1.0)).abs() < 1e-9);
        assert_eq!(axis.fractional_remainder(), 0.0);
        assert_eq!(axis.low_res_carry(), 1);
    }

    #[test]
    fn force_emit_negative_direction() {
        let tuning = Tuning {
            multiplier: 1.0,
            ..Tuning::default()
        };
        let mut axis = AxisMotion::new();
        let emission = axis.inject(-2.0, 1.0, &tuning);
        assert_eq!(
            emission,
            Emission {
                fine: -1,
                coarse: 0
            }
        );
        assert_eq!(axis.low_res_carry(), -1);
    }

    #[test]
    fn sub_threshold_impulse_emits_nothing() {
        let tuning = Tuning {
            multiplier: 1.0,
            ..Tuning::default()
        };
        let mut axis = AxisMotion::new();
        // 0.3 fine units stays below the 0.5 stop threshold: the axis
        // settles instead of force-emitting.
        assert_eq!(axis.inject(0.3, 1.0, &tuning), Emission::NONE);
        assert!(axis.is_at_rest());
    }

    #[test]
    fn large_impulse_emits_immediately() {
        let tuning = Tuning {
            multiplier: 1.0,
            ..Tuning::default()
        };
        let mut axis = AxisMotion::new();
        let emission = axis.inject(120.0, 1.0, &tuning);
        // 7.8% of 120 is ~9.36 fine units extracted in the same pass.
        assert_eq!(emission.fine, 9);
        assert_eq!(emission.coarse, 0);
        assert!(axis.velocity() > 0.0);
    }
}
