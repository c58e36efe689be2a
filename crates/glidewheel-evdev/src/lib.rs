//! Source device discovery and virtual uinput sink construction.
//!
//! The smoothing engine only needs an opened, readable input handle and an
//! opaque sink that accepts discrete scroll emissions plus a frame sync.
//! This crate provides both ends of that contract for the kernel input
//! layer:
//!
//! - [`discover`]: scan `/dev/input` for the VM pointer device
//! - [`ScrollSource`]: the grabbed, non-blocking evdev source
//! - [`VirtualSink`]: a uinput clone of the source with hi-res wheel axes
//! - [`ScrollChannel`]: which event codes are scroll impulses, their axis
//!   and fine-unit weight
//! - [`EventSink`]: the sink trait, with an in-memory mock for tests

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod channel;
pub mod discover;
pub mod error;
pub mod sink;
pub mod source;

pub use channel::{Axis, Resolution, ScrollChannel};
pub use discover::find_scroll_device;
pub use error::{DeviceError, DeviceResult};
pub use sink::{EventSink, VirtualSink, mock::MockSink};
pub use source::ScrollSource;
