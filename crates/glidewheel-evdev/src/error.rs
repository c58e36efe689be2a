//! Error types for device acquisition and the sink boundary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures at the device boundary.
///
/// Everything here is either resource acquisition (fatal before the loop
/// starts) or a sink write (reported, non-fatal). Transient would-block
/// reads never surface as errors.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Scanning /dev/input failed outright.
    #[error("failed to scan /dev/input: {0}")]
    Scan(#[source] io::Error),

    /// No device matched the VM pointer heuristics.
    #[error(
        "no SPICE/QEMU/VirtIO scroll device found; pass an explicit \
         /dev/input/eventN path (see /proc/bus/input/devices)"
    )]
    NoDeviceFound,

    /// Opening the source device failed.
    #[error("failed to open {path}: {source}")]
    Open {
        /// Device node that failed to open.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Taking the exclusive grab on the source failed.
    #[error("failed to grab source device: {0}")]
    Grab(#[source] io::Error),

    /// Building the uinput virtual device failed.
    #[error("failed to create virtual device: {0}")]
    SinkCreate(#[source] io::Error),
}

/// Result alias for device operations.
pub type DeviceResult<T = ()> = Result<T, DeviceError>;
