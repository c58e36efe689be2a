//! The smoothing loop: drain, inject, tick, sync.

use std::io;
use std::os::fd::AsRawFd;
use std::time::Instant;

use evdev::{EventType, InputEvent, Synchronization};
use glidewheel_curves::DampeningCurve;
use glidewheel_evdev::{Axis, EventSink, ScrollChannel, ScrollSource};
use glidewheel_motion::{AxisMotion, Tuning};
use glidewheel_scheduler::{CancelToken, Poller, Readiness, TickTimer};
use tracing::{debug, trace, warn};

use crate::error::{EngineError, EngineResult};

/// The smoothing engine: two independent axis states behind one sink.
///
/// Generic over the sink so the full impulse and tick paths run against an
/// in-memory recorder in tests; production wires in the uinput sink.
#[derive(Debug)]
pub struct Engine<S: EventSink> {
    tuning: Tuning,
    curve: DampeningCurve,
    vertical: AxisMotion,
    horizontal: AxisMotion,
    sink: S,
    cancel: CancelToken,
    /// Whether the current source frame relayed any non-scroll event.
    /// Decides if the source's own SYN_REPORT is forwarded or suppressed,
    /// coalescing any number of relayed events into one sync per frame.
    had_non_scroll: bool,
}

impl<S: EventSink> Engine<S> {
    /// Create an engine with both axes at rest.
    pub fn new(tuning: Tuning, sink: S, cancel: CancelToken) -> Self {
        let tuning = tuning.clamped();
        Self {
            curve: tuning.curve(),
            tuning,
            vertical: AxisMotion::new(),
            horizontal: AxisMotion::new(),
            sink,
            cancel,
            had_non_scroll: false,
        }
    }

    /// Run until the cancel token fires or the source dies.
    ///
    /// The token is checked only between readiness waits: an in-flight
    /// drain or tick always completes first, so no output frame is ever
    /// left half-written.
    pub fn run(
        &mut self,
        source: &mut ScrollSource,
        poller: &mut Poller,
        timer: &mut TickTimer,
    ) -> EngineResult {
        while !self.cancel.is_cancelled() {
            let batch = poller.wait()?;
            // Impulses delivered in the same batch as a tick are always
            // injected before the tick decays them, regardless of the
            // order epoll reported the two sources in.
            if batch.iter().any(|r| r == Readiness::Input) {
                self.drain_source(source)?;
            }
            if batch.iter().any(|r| r == Readiness::Timer) {
                timer.acknowledge()?;
                self.handle_tick();
            }
        }
        debug!("engine loop exited on cancellation");
        Ok(())
    }

    /// Read the source to exhaustion, processing events in stream order.
    fn drain_source(&mut self, source: &mut ScrollSource) -> EngineResult {
        loop {
            match source.fetch_events() {
                Ok(events) => {
                    for event in events {
                        self.handle_source_event(event, Instant::now());
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(err) => return Err(EngineError::SourceRead(err)),
            }
        }
    }

    /// Route one source event: frame boundary, scroll impulse, or relay.
    pub fn handle_source_event(&mut self, event: InputEvent, now: Instant) {
        if event.event_type() == EventType::SYNCHRONIZATION {
            if event.code() == Synchronization::SYN_REPORT.0 {
                if self.had_non_scroll {
                    self.sink_write(|sink| sink.sync());
                }
                self.had_non_scroll = false;
            }
            return;
        }

        if event.event_type() == EventType::RELATIVE {
            if let Some(channel) = ScrollChannel::from_code(event.code()) {
                self.handle_impulse(channel, event.value(), now);
                return;
            }
        }

        self.sink_write(|sink| sink.forward(event.event_type().0, event.code(), event.value()));
        self.had_non_scroll = true;
    }

    /// Record, scale and inject a scroll impulse, emitting immediately.
    fn handle_impulse(&mut self, channel: ScrollChannel, value: i32, now: Instant) {
        let raw = channel.fine_units(value);
        let tuning = self.tuning;
        let curve = self.curve;
        let axis_state = self.axis_mut(channel.axis);

        let rate = axis_state.record_impulse(now);
        let scale = curve.scale(rate);
        let emission = axis_state.inject(raw, scale, &tuning);
        trace!(
            axis = channel.axis.label(),
            value,
            raw,
            rate,
            scale,
            velocity = axis_state.velocity(),
            "impulse"
        );

        if !emission.is_empty() {
            self.sink_write(|sink| sink.emit_scroll(channel.axis, emission));
            self.sink_write(|sink| sink.sync());
        }
    }

    /// Decay both axes one step; one sync if anything moved.
    pub fn handle_tick(&mut self) {
        let tuning = self.tuning;
        let mut emitted = false;

        for axis in Axis::ALL {
            let emission = self.axis_mut(axis).tick_emit(&tuning);
            if !emission.is_empty() {
                trace!(
                    axis = axis.label(),
                    fine = emission.fine,
                    coarse = emission.coarse,
                    "tick emit"
                );
                self.sink_write(|sink| sink.emit_scroll(axis, emission));
                emitted = true;
            }
        }

        if emitted {
            self.sink_write(|sink| sink.sync());
        }
    }

    /// Register the engine's readiness sources with a poller.
    pub fn register_sources(
        &self,
        poller: &Poller,
        source: &ScrollSource,
        timer: &TickTimer,
    ) -> EngineResult {
        poller.register(source.as_raw_fd(), Readiness::Input)?;
        poller.register(timer.as_raw_fd(), Readiness::Timer)?;
        Ok(())
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisMotion {
        match axis {
            Axis::Vertical => &mut self.vertical,
            Axis::Horizontal => &mut self.horizontal,
        }
    }

    /// Sink writes are best-effort: failures are reported, never fatal.
    fn sink_write(&mut self, write: impl FnOnce(&mut S) -> io::Result<()>) {
        if let Err(err) = write(&mut self.sink) {
            warn!(%err, "sink write failed, dropping emission");
        }
    }

    /// The sink, for inspection in tests.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable sink access, for resetting recorders in tests.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Motion state of one axis, for inspection in tests.
    pub fn axis(&self, axis: Axis) -> &AxisMotion {
        match axis {
            Axis::Vertical => &self.vertical,
            Axis::Horizontal => &self.horizontal,
        }
    }
}
