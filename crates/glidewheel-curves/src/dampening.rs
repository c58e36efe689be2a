//! Rate-driven dampening curve.

/// Non-linear attenuation curve driven by the measured impulse rate.
///
/// Below `low_rate` the curve passes impulses through unscaled; at or above
/// `high_rate` it applies maximum attenuation (`min_scale`). In the
/// transition band the factor follows a square-root curve, which front-loads
/// the attenuation: a mild rate increase already triggers most of the
/// dampening, keeping single deliberate pulses crisp while a sustained fast
/// train is quickly tamed.
///
/// # RT-Safety
///
/// - O(1), allocation-free, total
///
/// # Example
///
/// ```
/// use glidewheel_curves::DampeningCurve;
///
/// let curve = DampeningCurve::new(5.0, 30.0, 0.3);
/// assert_eq!(curve.scale(1.0), 1.0);
/// assert_eq!(curve.scale(100.0), 0.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampeningCurve {
    low_rate: f64,
    high_rate: f64,
    min_scale: f64,
}

impl DampeningCurve {
    /// Create a curve from rate thresholds (events/sec) and a dampening floor.
    ///
    /// Inputs are normalized rather than rejected: `min_scale` is clamped
    /// into `(0, 1]` and `high_rate` is forced strictly above `low_rate`, so
    /// the curve is well-defined for any configuration that survives the
    /// clamping in the daemon's tuning layer.
    pub fn new(low_rate: f64, high_rate: f64, min_scale: f64) -> Self {
        let min_scale = min_scale.clamp(f64::EPSILON, 1.0);
        let high_rate = if high_rate > low_rate {
            high_rate
        } else {
            low_rate + 1.0
        };
        Self {
            low_rate,
            high_rate,
            min_scale,
        }
    }

    /// Evaluate the attenuation factor for an impulse rate.
    ///
    /// Returns a value in `[min_scale, 1.0]`; continuous and non-increasing
    /// across the whole domain.
    #[inline]
    pub fn scale(&self, rate: f64) -> f64 {
        if rate <= self.low_rate {
            return 1.0;
        }
        if rate >= self.high_rate {
            return self.min_scale;
        }

        let t = (rate - self.low_rate) / (self.high_rate - self.low_rate);
        1.0 - (1.0 - self.min_scale) * t.sqrt()
    }

    /// Rate threshold below which no attenuation applies.
    #[inline]
    pub fn low_rate(&self) -> f64 {
        self.low_rate
    }

    /// Rate threshold at which attenuation saturates.
    #[inline]
    pub fn high_rate(&self) -> f64 {
        self.high_rate
    }

    /// Attenuation floor applied at or above `high_rate`.
    #[inline]
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }
}
