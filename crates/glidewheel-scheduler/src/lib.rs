//! Drift-free absolute-deadline tick timer and readiness multiplexing.
//!
//! The smoothing loop is strictly single-threaded and reactive: one epoll
//! wait multiplexes the input device and a periodic timer, and everything
//! else is non-blocking. This crate provides that plumbing:
//!
//! - [`TickTimer`]: a CLOCK_MONOTONIC timerfd armed with absolute deadlines.
//!   Each tick is rescheduled as `previous_target + period`, never relative
//!   to the wake time, so scheduling latency in one tick can not shift any
//!   subsequent tick. This is the anti-drift scheme that keeps emission
//!   cadence exact under jitter.
//! - [`Poller`]: a minimal epoll wrapper for exactly two readiness sources.
//! - [`CancelToken`]: a cloneable stop flag checked between readiness waits.
//! - [`fd::set_nonblocking`]: helper for putting the source fd in
//!   non-blocking mode so drains never stall the loop.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cancel;
pub mod error;
pub mod fd;
pub mod poll;
pub mod timer;

pub use cancel::CancelToken;
pub use error::{SchedulerError, SchedulerResult};
pub use poll::{Poller, ReadyBatch, Readiness};
pub use timer::TickTimer;
