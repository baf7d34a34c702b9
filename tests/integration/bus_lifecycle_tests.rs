//! Bus selection and controller lifecycle tests.

use dualbus::app::events::AppEvent;
use dualbus::app::service::BusController;
use dualbus::bus::{ActiveBus, BusKind, ClockProfile, ClockSwitcher, FixedClock, Peripheral};
use dualbus::config::FirmwareConfig;
use dualbus::debounce::RawButtons;
use dualbus::drivers::status_led::StatusLed;
use dualbus::error::Error;
use dualbus::events::Keys;
use dualbus::indicator::LedConditions;
use dualbus::system_tick::{SystemTick, TickHandler, TickShared};

use crate::mock_hw::{
    Call, LedPin, MockClock, MockDiag, RecordingBus, RecordingSink, ScriptedButtons, journal,
};

fn switcher(journal: &crate::mock_hw::Journal, reject: bool) -> ClockSwitcher<MockClock, MockDiag> {
    ClockSwitcher::new(
        MockClock {
            journal: journal.clone(),
            reject,
        },
        MockDiag(journal.clone()),
    )
}

fn clock_sequence(profile: ClockProfile) -> Vec<Call> {
    let mut calls = vec![Call::Flush, Call::SetProfile(profile)];
    calls.extend(Peripheral::ALL.into_iter().map(Call::Resync));
    calls
}

#[test]
fn single_bus_board_runs_only_its_bus() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Serial,
        journal: log.clone(),
    };
    let mut controller = BusController::start(bus, FixedClock, &mut sink);

    for _ in 0..100 {
        controller.run_once(&mut sink);
    }

    let calls = log.borrow();
    assert_eq!(calls[0], Call::InterfaceInit(BusKind::Serial));
    assert_eq!(calls[1], Call::Init(BusKind::Serial));
    assert_eq!(calls.len(), 102);
    assert!(calls[2..].iter().all(|c| *c == Call::MainLoop(BusKind::Serial)));
    assert_eq!(sink.events, vec![AppEvent::BusStarted(BusKind::Serial)]);
}

#[test]
fn dual_bus_selection_never_touches_other_bus() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = ActiveBus::select(
        BusKind::Parallel,
        || -> RecordingBus { panic!("serial front end must not be constructed") },
        || RecordingBus {
            kind: BusKind::Parallel,
            journal: log.clone(),
        },
    );
    let mut controller = BusController::start(bus, FixedClock, &mut sink);
    assert_eq!(controller.kind(), BusKind::Parallel);

    for _ in 0..50 {
        controller.run_once(&mut sink);
    }
    controller.set_sleep(true, &mut sink);

    let calls = log.borrow();
    assert!(calls.iter().all(|c| !matches!(
        c,
        Call::InterfaceInit(BusKind::Serial)
            | Call::Init(BusKind::Serial)
            | Call::MainLoop(BusKind::Serial)
            | Call::Sleep(BusKind::Serial, _)
    )));
    assert_eq!(calls.last(), Some(&Call::Sleep(BusKind::Parallel, true)));
}

#[test]
fn serial_bus_clock_applied_once_while_unchanged() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Serial,
        journal: log.clone(),
    };
    let mut controller = BusController::start(bus, switcher(&log, false), &mut sink);
    log.borrow_mut().clear();

    for _ in 0..20 {
        controller.run_once(&mut sink);
    }

    let mut expected = clock_sequence(ClockProfile::HALF);
    expected.extend(std::iter::repeat_n(Call::MainLoop(BusKind::Serial), 20));
    assert_eq!(*log.borrow(), expected);

    let applied = AppEvent::ClockApplied {
        bus: BusKind::Serial,
        profile: ClockProfile::HALF,
    };
    assert_eq!(sink.events[1..], [applied]);
}

#[test]
fn clock_applied_after_sleep_wake_cycle_only_once() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Parallel,
        journal: log.clone(),
    };
    let mut controller = BusController::start(bus, switcher(&log, false), &mut sink);
    controller.run_once(&mut sink);
    controller.service_keys(Keys::SLEEP, &mut sink);
    controller.service_keys(Keys::SLEEP, &mut sink);
    log.borrow_mut().clear();

    controller.run_once(&mut sink);
    assert_eq!(*log.borrow(), vec![Call::MainLoop(BusKind::Parallel)]);
}

#[test]
fn parallel_bus_runs_at_full_clock() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Parallel,
        journal: log.clone(),
    };
    let mut controller = BusController::start(bus, switcher(&log, false), &mut sink);
    log.borrow_mut().clear();

    controller.run_once(&mut sink);

    let mut expected = clock_sequence(ClockProfile::FULL);
    expected.push(Call::MainLoop(BusKind::Parallel));
    assert_eq!(*log.borrow(), expected);
}

#[test]
fn rejected_clock_skips_resync_but_still_runs_bus() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Serial,
        journal: log.clone(),
    };
    let mut controller = BusController::start(bus, switcher(&log, true), &mut sink);
    log.borrow_mut().clear();

    controller.run_once(&mut sink);

    assert_eq!(
        *log.borrow(),
        vec![
            Call::Flush,
            Call::SetProfile(ClockProfile::HALF),
            Call::MainLoop(BusKind::Serial),
        ]
    );
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::ClockFailed {
            bus: BusKind::Serial,
            error: Error::Clock(-1),
        })
    );
}

#[test]
fn disabled_clock_switching_leaves_clock_alone() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Serial,
        journal: log.clone(),
    };
    let timing: Option<ClockSwitcher<MockClock, MockDiag>> = None;
    let mut controller = BusController::start(bus, timing, &mut sink);
    controller.run_once(&mut sink);

    assert!(log.borrow().iter().all(|c| !matches!(
        c,
        Call::Flush | Call::SetProfile(_) | Call::Resync(_)
    )));
}

#[test]
fn sleep_key_toggles_bus_sleep() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Serial,
        journal: log.clone(),
    };
    let mut controller = BusController::start(bus, FixedClock, &mut sink);

    let rest = controller.service_keys(Keys::SLEEP, &mut sink);
    assert!(rest.is_empty());
    assert!(controller.is_sleeping());

    let rest = controller.service_keys(Keys::SLEEP | Keys::NEXT, &mut sink);
    assert_eq!(rest, Keys::NEXT);
    assert!(!controller.is_sleeping());

    assert_eq!(
        sink.events[1..],
        [
            AppEvent::SleepChanged {
                bus: BusKind::Serial,
                sleeping: true
            },
            AppEvent::SleepChanged {
                bus: BusKind::Serial,
                sleeping: false
            },
            AppEvent::KeysForwarded(Keys::NEXT),
        ]
    );
}

#[test]
fn set_sleep_is_idempotent() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Serial,
        journal: log.clone(),
    };
    let mut controller = BusController::start(bus, FixedClock, &mut sink);

    controller.set_sleep(false, &mut sink);
    controller.set_sleep(true, &mut sink);
    controller.set_sleep(true, &mut sink);

    let sleeps = log
        .borrow()
        .iter()
        .filter(|c| matches!(c, Call::Sleep(..)))
        .count();
    assert_eq!(sleeps, 1);
}

#[test]
fn empty_key_set_emits_nothing() {
    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Serial,
        journal: log,
    };
    let mut controller = BusController::start(bus, FixedClock, &mut sink);

    assert!(controller.service_keys(Keys::NONE, &mut sink).is_empty());
    assert_eq!(sink.events.len(), 1);
}

#[test]
fn poll_sleeps_bus_without_touching_status_flags() {
    let shared = TickShared::new();
    let config = FirmwareConfig::default();
    let (buttons, raw) = ScriptedButtons::new(true);
    let dirty = LedPin::default();
    let led = StatusLed::dual(LedPin::default(), dirty.clone());
    let mut tick = SystemTick::new(&shared, &config, buttons, led);

    let log = journal();
    let mut sink = RecordingSink::default();
    let bus = RecordingBus {
        kind: BusKind::Serial,
        journal: log.clone(),
    };
    let mut controller = BusController::start(bus, FixedClock, &mut sink);

    // Storage layer owns DIRTY; leave it clear and hold for SLEEP.
    raw.set(RawButtons::NEXT);
    for _ in 0..=config.timing.sleep_hold_ticks {
        tick.on_tick();
    }
    let menu = controller.poll(&shared.keys, &mut sink);
    assert!(menu.is_empty());
    assert!(controller.is_sleeping());

    tick.on_tick();
    let cleared = LedConditions {
        busy: false,
        dirty: false,
        error: false,
    };
    assert_eq!(shared.leds.snapshot(), cleared);
    assert!(!dirty.level.get());

    // A DIRTY raised by its owner survives the wake-up pass.
    shared.leds.set_dirty(true);
    shared.keys.raise(Keys::SLEEP);
    controller.poll(&shared.keys, &mut sink);
    assert!(!controller.is_sleeping());
    assert!(shared.leds.snapshot().dirty);
}
