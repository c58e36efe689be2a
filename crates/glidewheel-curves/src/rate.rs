//! Impulse-rate tracking over a trailing window.

use std::time::{Duration, Instant};

/// Ring capacity. Generous for any realistic pulse train: at the default
/// 300 ms window this holds bursts beyond 400 events/sec.
const RING_SIZE: usize = 128;

/// Trailing window considered when estimating the rate.
const RATE_WINDOW: Duration = Duration::from_millis(300);

/// Fixed-capacity history of impulse timestamps with rate estimation.
///
/// Records a monotonic timestamp per impulse and computes events-per-second
/// over the samples that fall within the trailing [`RATE_WINDOW`]. Older
/// entries are evicted by ring overwrite; nothing is ever freed.
///
/// # RT-Safety
///
/// - `record` is O(1), `rate` is O(window-bounded-count)
/// - No allocations; the ring is inline storage
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use glidewheel_curves::RateTracker;
///
/// let mut tracker = RateTracker::new();
/// let now = Instant::now();
/// tracker.record(now);
/// // A single sample is not enough to estimate a rate.
/// assert_eq!(tracker.rate(now), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct RateTracker {
    timestamps: [Option<Instant>; RING_SIZE],
    head: usize,
    count: usize,
}

impl RateTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            timestamps: [None; RING_SIZE],
            head: 0,
            count: 0,
        }
    }

    /// Append an impulse timestamp, overwriting the oldest entry when full.
    pub fn record(&mut self, ts: Instant) {
        self.timestamps[self.head] = Some(ts);
        self.head = (self.head + 1) % RING_SIZE;
        if self.count < RING_SIZE {
            self.count += 1;
        }
    }

    /// Estimate the impulse rate in events per second as of `now`.
    ///
    /// Only samples within the trailing window contribute. Returns 0.0 when
    /// fewer than two samples fall in the window; the dampening curve treats
    /// that as "below `low_rate`", i.e. full responsiveness, so an underfull
    /// window is a safe default rather than an error.
    pub fn rate(&self, now: Instant) -> f64 {
        let mut in_window = 0u32;
        let mut oldest = now;

        for i in 0..self.count {
            let idx = (self.head + RING_SIZE - 1 - i) % RING_SIZE;
            let Some(ts) = self.timestamps[idx] else {
                continue;
            };
            if now.saturating_duration_since(ts) <= RATE_WINDOW {
                in_window += 1;
                if ts < oldest {
                    oldest = ts;
                }
            }
        }

        if in_window < 2 {
            return 0.0;
        }

        let elapsed = now.saturating_duration_since(oldest).as_secs_f64();
        if elapsed < 1e-6 {
            return 0.0;
        }

        f64::from(in_window) / elapsed
    }

    /// Number of samples currently retained (windowed or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no samples have been recorded yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new()
    }
}
