//! Output sink: the uinput virtual device and its test mock.

use std::fmt;
use std::io;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{
    AbsInfo, AttributeSet, EventType, InputEvent, RelativeAxisType, Synchronization,
    UinputAbsSetup,
};
use glidewheel_motion::Emission;
use tracing::info;

use crate::channel::Axis;
use crate::error::{DeviceError, DeviceResult};
use crate::source::ScrollSource;

/// Where synthesized motion and relayed events go.
///
/// Emissions are buffered by the kernel until [`sync`](Self::sync) closes
/// the frame; the engine calls it once per logical frame, never per event.
pub trait EventSink {
    /// Emit one step of scroll motion on an axis: the fine delta as a
    /// single hi-res event, then one legacy detent event per coarse unit.
    fn emit_scroll(&mut self, axis: Axis, emission: Emission) -> io::Result<()>;

    /// Relay a non-scroll event from the source verbatim.
    fn forward(&mut self, event_type: u16, code: u16, value: i32) -> io::Result<()>;

    /// Close the current frame, making buffered emissions visible.
    fn sync(&mut self) -> io::Result<()>;
}

/// uinput clone of the source device, extended with hi-res wheel axes.
pub struct VirtualSink {
    device: VirtualDevice,
}

impl fmt::Debug for VirtualSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualSink").finish_non_exhaustive()
    }
}

impl VirtualSink {
    /// Build a virtual device mirroring the source's identity and
    /// capabilities (keys, relative and absolute axes, switches), plus
    /// REL_WHEEL_HI_RES and REL_HWHEEL_HI_RES. Consumers downstream see a
    /// device indistinguishable from the source, with smooth scroll on top.
    pub fn clone_of(source: &ScrollSource) -> DeviceResult<Self> {
        let raw = source.raw_device();
        let name = format!("{} (smooth scroll)", source.name());

        let mut builder = VirtualDeviceBuilder::new()
            .map_err(DeviceError::SinkCreate)?
            .name(&name)
            .input_id(raw.input_id());

        if let Some(keys) = raw.supported_keys() {
            builder = builder.with_keys(keys).map_err(DeviceError::SinkCreate)?;
        }

        let mut rel: AttributeSet<RelativeAxisType> = AttributeSet::new();
        if let Some(axes) = raw.supported_relative_axes() {
            for axis in axes.iter() {
                rel.insert(axis);
            }
        }
        rel.insert(RelativeAxisType::REL_WHEEL_HI_RES);
        rel.insert(RelativeAxisType::REL_HWHEEL_HI_RES);
        builder = builder
            .with_relative_axes(&rel)
            .map_err(DeviceError::SinkCreate)?;

        if let Some(axes) = raw.supported_absolute_axes() {
            let state = raw.get_abs_state().map_err(DeviceError::SinkCreate)?;
            for axis in axes.iter() {
                let info = state[axis.0 as usize];
                let setup = UinputAbsSetup::new(
                    axis,
                    AbsInfo::new(
                        info.value,
                        info.minimum,
                        info.maximum,
                        info.fuzz,
                        info.flat,
                        info.resolution,
                    ),
                );
                builder = builder
                    .with_absolute_axis(&setup)
                    .map_err(DeviceError::SinkCreate)?;
            }
        }

        if let Some(switches) = raw.supported_switches() {
            builder = builder
                .with_switches(switches)
                .map_err(DeviceError::SinkCreate)?;
        }

        let device = builder.build().map_err(DeviceError::SinkCreate)?;
        info!(name, "created virtual device");
        Ok(Self { device })
    }
}

impl EventSink for VirtualSink {
    fn emit_scroll(&mut self, axis: Axis, emission: Emission) -> io::Result<()> {
        if emission.fine != 0 {
            self.device.emit(&[InputEvent::new(
                EventType::RELATIVE,
                axis.fine_code().0,
                emission.fine,
            )])?;
        }

        let coarse_step = emission.coarse.signum();
        for _ in 0..emission.coarse.abs() {
            self.device.emit(&[InputEvent::new(
                EventType::RELATIVE,
                axis.coarse_code().0,
                coarse_step,
            )])?;
        }
        Ok(())
    }

    fn forward(&mut self, event_type: u16, code: u16, value: i32) -> io::Result<()> {
        self.device
            .emit(&[InputEvent::new(EventType(event_type), code, value)])
    }

    fn sync(&mut self) -> io::Result<()> {
        self.device.emit(&[InputEvent::new(
            EventType::SYNCHRONIZATION,
            Synchronization::SYN_REPORT.0,
            0,
        )])
    }
}

/// In-memory sink for engine tests.
pub mod mock {
    use super::*;

    /// Everything a sink can be asked to do, recorded in order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SinkCall {
        /// Hi-res scroll event.
        Fine(Axis, i32),
        /// Legacy detent event.
        Coarse(Axis, i32),
        /// Verbatim passthrough.
        Forward(u16, u16, i32),
        /// Frame boundary.
        Sync,
    }

    /// Sink that records calls instead of writing to uinput.
    #[derive(Debug, Default)]
    pub struct MockSink {
        /// Recorded calls in arrival order.
        pub calls: Vec<SinkCall>,
        /// When set, every write reports this io error kind once.
        pub fail_writes: bool,
    }

    impl MockSink {
        /// Create an empty recorder.
        pub fn new() -> Self {
            Self::default()
        }

        /// Total fine units emitted on an axis.
        pub fn fine_total(&self, axis: Axis) -> i64 {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    SinkCall::Fine(a, v) if *a == axis => Some(i64::from(*v)),
                    _ => None,
                })
                .sum()
        }

        /// Number of sync frames emitted.
        pub fn sync_count(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, SinkCall::Sync))
                .count()
        }
    }

    impl EventSink for MockSink {
        fn emit_scroll(&mut self, axis: Axis, emission: Emission) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock failure"));
            }
            if emission.fine != 0 {
                self.calls.push(SinkCall::Fine(axis, emission.fine));
            }
            for _ in 0..emission.coarse.abs() {
                self.calls.push(SinkCall::Coarse(axis, emission.coarse.signum()));
            }
            Ok(())
        }

        fn forward(&mut self, event_type: u16, code: u16, value: i32) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock failure"));
            }
            self.calls.push(SinkCall::Forward(event_type, code, value));
            Ok(())
        }

        fn sync(&mut self) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock failure"));
            }
            self.calls.push(SinkCall::Sync);
            Ok(())
        }
    }
}
