//! Engine loop behavior against an in-memory sink: impulse routing,
//! passthrough coalescing, tick decay and sink fault tolerance.

use std::time::{Duration, Instant};

use evdev::{EventType, InputEvent, Key, RelativeAxisType, Synchronization};
use glidewheel_engine::Engine;
use glidewheel_evdev::sink::mock::{MockSink, SinkCall};
use glidewheel_evdev::Axis;
use glidewheel_motion::Tuning;
use glidewheel_scheduler::CancelToken;

fn engine() -> Engine<MockSink> {
    Engine::new(Tuning::default(), MockSink::new(), CancelToken::new())
}

fn coarse_click(value: i32) -> InputEvent {
    InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_WHEEL.0, value)
}

fn syn_report() -> InputEvent {
    InputEvent::new(
        EventType::SYNCHRONIZATION,
        Synchronization::SYN_REPORT.0,
        0,
    )
}

#[test]
fn coarse_click_emits_partial_motion_immediately() {
    let mut engine = engine();
    engine.handle_source_event(coarse_click(1), Instant::now());

    // One detent at default gain: 120 fine units * 0.5 = 60 velocity,
    // first extraction 60 * 0.078 = 4.68, truncated to 4.
    assert_eq!(
        engine.sink().calls,
        vec![SinkCall::Fine(Axis::Vertical, 4), SinkCall::Sync]
    );
    assert!(engine.axis(Axis::Vertical).velocity() > 0.0);
    assert!(engine.axis(Axis::Horizontal).is_at_rest());
}

#[test]
fn hi_res_impulse_routes_to_horizontal_axis() {
    let mut engine = engine();
    let event = InputEvent::new(
        EventType::RELATIVE,
        RelativeAxisType::REL_HWHEEL_HI_RES.0,
        30,
    );
    engine.handle_source_event(event, Instant::now());

    // 30 fine units * 0.5 gain = 15 velocity, extraction 1.17 -> 1.
    assert_eq!(
        engine.sink().calls,
        vec![SinkCall::Fine(Axis::Horizontal, 1), SinkCall::Sync]
    );
    assert!(engine.axis(Axis::Vertical).is_at_rest());
}

#[test]
fn ticks_taper_motion_to_rest() {
    let mut engine = engine();
    engine.handle_source_event(coarse_click(1), Instant::now());
    engine.sink_mut().calls.clear();

    let mut previous = i32::MAX;
    for _ in 0..200 {
        engine.handle_tick();
        if engine.axis(Axis::Vertical).is_at_rest() {
            break;
        }
        let fine = latest_fine(engine.sink());
        if let Some(fine) = fine {
            assert!(fine > 0, "decay must keep the impulse's sign");
            assert!(fine <= previous, "decay emissions must not grow");
            previous = fine;
        }
    }
    assert!(engine.axis(Axis::Vertical).is_at_rest());

    // Each emitting tick closed exactly one frame.
    let frames = engine.sink().sync_count();
    let emitting_ticks = engine
        .sink()
        .calls
        .iter()
        .filter(|call| matches!(call, SinkCall::Fine(..)))
        .count();
    assert_eq!(frames, emitting_ticks);
}

#[test]
fn quiet_tick_emits_nothing() {
    let mut engine = engine();
    engine.handle_tick();
    assert!(engine.sink().calls.is_empty());
}

#[test]
fn passthrough_frame_gets_one_sync() {
    let mut engine = engine();
    let press = InputEvent::new(EventType::KEY, Key::BTN_LEFT.code(), 1);
    let motion = InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, 3);

    engine.handle_source_event(press, Instant::now());
    engine.handle_source_event(motion, Instant::now());
    engine.handle_source_event(syn_report(), Instant::now());

    assert_eq!(
        engine.sink().calls,
        vec![
            SinkCall::Forward(EventType::KEY.0, Key::BTN_LEFT.code(), 1),
            SinkCall::Forward(EventType::RELATIVE.0, RelativeAxisType::REL_X.0, 3),
            SinkCall::Sync,
        ]
    );
}

#[test]
fn scroll_only_frame_suppresses_source_sync() {
    let mut engine = engine();
    engine.handle_source_event(coarse_click(1), Instant::now());
    let after_impulse = engine.sink().sync_count();

    // The source's own frame boundary carries nothing we relayed.
    engine.handle_source_event(syn_report(), Instant::now());
    assert_eq!(engine.sink().sync_count(), after_impulse);
}

#[test]
fn sync_suppression_resets_per_frame() {
    let mut engine = engine();
    let press = InputEvent::new(EventType::KEY, Key::BTN_LEFT.code(), 1);

    engine.handle_source_event(press, Instant::now());
    engine.handle_source_event(syn_report(), Instant::now());
    assert_eq!(engine.sink().sync_count(), 1);

    // Empty frame after a relayed one: still no spurious sync.
    engine.handle_source_event(syn_report(), Instant::now());
    assert_eq!(engine.sink().sync_count(), 1);
}

#[test]
fn rapid_clicks_are_dampened() {
    let mut slow = engine();
    let mut fast = engine();

    let start = Instant::now();
    for i in 0..20 {
        slow.handle_source_event(coarse_click(1), start + Duration::from_secs(i));
        fast.handle_source_event(coarse_click(1), start + Duration::from_millis(i * 5));
    }
    drain(&mut slow);
    drain(&mut fast);

    let slow_total = slow.sink().fine_total(Axis::Vertical);
    let fast_total = fast.sink().fine_total(Axis::Vertical);
    assert!(
        fast_total < slow_total,
        "rapid train must travel less: fast {fast_total}, slow {slow_total}"
    );
}

#[test]
fn sink_failures_do_not_stop_the_engine() {
    let mut engine = Engine::new(
        Tuning::default(),
        MockSink {
            fail_writes: true,
            ..MockSink::new()
        },
        CancelToken::new(),
    );

    engine.handle_source_event(coarse_click(1), Instant::now());
    engine.handle_tick();

    // Nothing was recorded, but the physics advanced regardless.
    assert!(engine.sink().calls.is_empty());
    assert!(engine.axis(Axis::Vertical).velocity() > 0.0);
}

fn latest_fine(sink: &MockSink) -> Option<i32> {
    sink.calls.iter().rev().find_map(|call| match call {
        SinkCall::Fine(Axis::Vertical, v) => Some(*v),
        _ => None,
    })
}

fn drain(engine: &mut Engine<MockSink>) {
    for _ in 0..2000 {
        engine.handle_tick();
        if engine.axis(Axis::Vertical).is_at_rest() {
            return;
        }
    }
    assert!(
        engine.axis(Axis::Vertical).is_at_rest(),
        "axis failed to settle"
    );
}
