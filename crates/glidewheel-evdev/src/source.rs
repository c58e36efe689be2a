//! The grabbed, non-blocking source device.

use std::fmt;
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

use evdev::{Device, FetchEventsSynced};
use glidewheel_scheduler::fd::set_nonblocking;
use tracing::info;

use crate::error::{DeviceError, DeviceResult};

/// The intercepted pointer device.
///
/// Opened non-blocking so the engine's drain phase can read to exhaustion
/// without ever stalling the loop. The exclusive grab is taken separately
/// (after the virtual sink exists) so libinput has a moment to pick up the
/// replacement device before the original goes silent.
pub struct ScrollSource {
    device: Device,
    path: PathBuf,
    grabbed: bool,
}

impl fmt::Debug for ScrollSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSource")
            .field("path", &self.path)
            .field("grabbed", &self.grabbed)
            .finish_non_exhaustive()
    }
}

impl ScrollSource {
    /// Open the device node and put its fd in non-blocking mode.
    pub fn open(path: &Path) -> DeviceResult<Self> {
        let device = Device::open(path).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        set_nonblocking(device.as_raw_fd()).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Self {
            device,
            path: path.to_path_buf(),
            grabbed: false,
        };
        info!(path = %source.path.display(), name = source.name(), "opened source device");
        Ok(source)
    }

    /// Take the exclusive grab: events stop reaching other consumers and
    /// arrive only here.
    pub fn grab(&mut self) -> DeviceResult {
        self.device.grab().map_err(DeviceError::Grab)?;
        self.grabbed = true;
        info!("grabbed source device, scroll smoothing active");
        Ok(())
    }

    /// Release the grab so the device works normally again. Harmless if
    /// the grab was never taken.
    pub fn ungrab(&mut self) {
        if self.grabbed {
            if let Err(err) = self.device.ungrab() {
                tracing::warn!(%err, "failed to ungrab source device");
            }
            self.grabbed = false;
        }
    }

    /// Fetch the currently readable chunk of events.
    ///
    /// Returns `WouldBlock` when the fd has nothing more to read; the
    /// engine treats that as the end of a drain batch, not an error.
    pub fn fetch_events(&mut self) -> io::Result<FetchEventsSynced<'_>> {
        self.device.fetch_events()
    }

    /// Human-readable device name.
    pub fn name(&self) -> &str {
        self.device.name().unwrap_or("Unknown")
    }

    /// Device node this source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying evdev device, for capability mirroring.
    pub fn raw_device(&self) -> &Device {
        &self.device
    }
}

impl AsRawFd for ScrollSource {
    fn as_raw_fd(&self) -> RawFd {
        self.device.as_raw_fd()
    }
}

impl Drop for ScrollSource {
    fn drop(&mut self) {
        self.ungrab();
    }
}
