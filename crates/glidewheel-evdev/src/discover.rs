//! VM pointer device auto-detection.

use std::fs;
use std::path::PathBuf;

use evdev::{Device, RelativeAxisType};
use tracing::{debug, info};

use crate::error::{DeviceError, DeviceResult};

/// Device-name substrings (case-insensitive) that identify the virtualized
/// pointer devices this daemon targets.
const VM_KEYWORDS: [&str; 3] = ["spice", "qemu", "virtio"];

/// Whether a device name looks like a VM pointer device.
fn name_matches(name: &str) -> bool {
    let lowered = name.to_lowercase();
    VM_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Scan `/dev/input/event*` for a SPICE/QEMU/VirtIO device with a wheel.
///
/// Nodes that cannot be opened (typically permissions) are skipped, not
/// fatal: only an unreadable directory or a fruitless scan is an error.
pub fn find_scroll_device() -> DeviceResult<PathBuf> {
    scan_dir("/dev/input")
}

fn scan_dir(dir: &str) -> DeviceResult<PathBuf> {
    let entries = fs::read_dir(dir).map_err(DeviceError::Scan)?;

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if !file_name.starts_with("event") {
            continue;
        }

        let path = entry.path();
        let Ok(device) = Device::open(&path) else {
            continue;
        };
        let name = device.name().unwrap_or("");
        if !name_matches(name) {
            debug!(path = %path.display(), name, "skipping: name mismatch");
            continue;
        }

        let has_wheel = device
            .supported_relative_axes()
            .is_some_and(|axes| axes.contains(RelativeAxisType::REL_WHEEL));
        if !has_wheel {
            debug!(path = %path.display(), name, "skipping: no REL_WHEEL");
            continue;
        }

        info!(path = %path.display(), name, "auto-detected scroll device");
        return Ok(path);
    }

    Err(DeviceError::NoDeviceFound)
}
