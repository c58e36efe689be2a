//! Scroll channel decode: which event codes are wheel impulses.

use evdev::RelativeAxisType;
use glidewheel_motion::FINE_UNITS_PER_COARSE;

/// Scroll axis. Exactly two exist and they are fully independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// REL_WHEEL / REL_WHEEL_HI_RES.
    Vertical,
    /// REL_HWHEEL / REL_HWHEEL_HI_RES.
    Horizontal,
}

impl Axis {
    /// Both axes, in emission order.
    pub const ALL: [Axis; 2] = [Axis::Vertical, Axis::Horizontal];

    /// Hi-res output code for this axis.
    pub fn fine_code(self) -> RelativeAxisType {
        match self {
            Axis::Vertical => RelativeAxisType::REL_WHEEL_HI_RES,
            Axis::Horizontal => RelativeAxisType::REL_HWHEEL_HI_RES,
        }
    }

    /// Legacy low-res output code for this axis.
    pub fn coarse_code(self) -> RelativeAxisType {
        match self {
            Axis::Vertical => RelativeAxisType::REL_WHEEL,
            Axis::Horizontal => RelativeAxisType::REL_HWHEEL,
        }
    }

    /// Short label for diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Axis::Vertical => "vert",
            Axis::Horizontal => "horiz",
        }
    }
}

/// Granularity of an incoming scroll impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// One unit is one whole wheel detent (worth 120 fine units).
    Coarse,
    /// One unit is one hi-res step.
    Fine,
}

/// A decoded scroll channel: which axis an EV_REL code feeds, at which
/// granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollChannel {
    /// Axis this channel feeds.
    pub axis: Axis,
    /// Granularity of the channel's unit.
    pub resolution: Resolution,
}

impl ScrollChannel {
    /// Decode an EV_REL code. Returns `None` for non-scroll relative axes
    /// (pointer motion etc.), which the engine forwards verbatim.
    pub fn from_code(code: u16) -> Option<Self> {
        let (axis, resolution) = match RelativeAxisType(code) {
            RelativeAxisType::REL_WHEEL => (Axis::Vertical, Resolution::Coarse),
            RelativeAxisType::REL_HWHEEL => (Axis::Horizontal, Resolution::Coarse),
            RelativeAxisType::REL_WHEEL_HI_RES => (Axis::Vertical, Resolution::Fine),
            RelativeAxisType::REL_HWHEEL_HI_RES => (Axis::Horizontal, Resolution::Fine),
            _ => return None,
        };
        Some(Self { axis, resolution })
    }

    /// Impulse magnitude in fine units for a raw event value.
    pub fn fine_units(&self, value: i32) -> f64 {
        match self.resolution {
            Resolution::Coarse => f64::from(value) * f64::from(FINE_UNITS_PER_COARSE),
            Resolution::Fine => f64::from(value),
        }
    }
}
