//! Input-rate tracking and dampening curve evaluation for GlideWheel.
//!
//! This crate holds the two pure building blocks of the scroll smoothing
//! pipeline:
//!
//! - [`RateTracker`]: a fixed-capacity ring of impulse timestamps that
//!   estimates the instantaneous input rate over a trailing window
//! - [`DampeningCurve`]: maps that rate to an attenuation factor in
//!   `[min_scale, 1.0]`
//!
//! Input *rate*, not impulse magnitude, is the dampening signal: a wheel
//! always reports unit pulses, so "how fast" substitutes for "how hard".
//!
//! # RT-Safety Guarantees
//!
//! - No heap allocations anywhere in this crate
//! - O(window-bounded-count) worst case for rate estimation
//! - All operations are total; there is no error type

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod dampening;
pub mod rate;

pub use dampening::DampeningCurve;
pub use rate::RateTracker;
