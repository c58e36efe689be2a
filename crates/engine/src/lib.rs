//! Single-threaded smoothing engine.
//!
//! The engine is the reactive control loop of the daemon: one epoll wait
//! multiplexes the grabbed source device and a fixed-interval drift-free
//! timer. Source readiness drains every available event in stream order,
//! routing wheel impulses through rate → scale → inject (with immediate
//! partial emission) and relaying everything else untouched; timer
//! readiness decays both axes and emits their next motion quantum.
//!
//! All state mutation happens on this one thread, so the core needs no
//! locking anywhere; the only blocking point is the readiness wait itself.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod engine;
pub mod error;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
