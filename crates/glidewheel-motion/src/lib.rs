//! Per-axis velocity state, decay and emission physics for GlideWheel.
//!
//! This crate owns the algorithmic core of the daemon: how much motion to
//! emit on every discrete input impulse and on every fixed scheduler tick.
//! The physics is exponential: each tick removes a fixed *fraction* of the
//! velocity and emits that extracted amount, so large velocities decelerate
//! proportionally faster and the glide tail tapers smoothly.
//!
//! Emission is returned as plain data ([`Emission`]) rather than written to
//! a device, which keeps everything here total, I/O-free and testable.
//!
//! # RT-Safety Guarantees
//!
//! - No heap allocations
//! - O(1) per injection and per tick (rate estimation aside)
//! - No syscalls; the caller supplies timestamps

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod axis;
pub mod tuning;

pub use axis::{AxisMotion, Emission};
pub use tuning::Tuning;

/// Fine-resolution units per coarse wheel detent (kernel ABI constant:
/// one REL_WHEEL click equals 120 REL_WHEEL_HI_RES units).
pub const FINE_UNITS_PER_COARSE: i32 = 120;
