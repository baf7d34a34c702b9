//! Bus controller, the foreground control flow.
//!
//! [`BusController`] owns the active bus front end and its timing
//! adapter.  Construction runs the one-time lifecycle; after that the
//! main loop calls [`BusController::poll`], which alternates between
//! [`BusController::run_once`] and [`BusController::service_keys`].
//! The controller never writes the status condition flags; those belong
//! to the subsystems that own busy/dirty/error.
//!
//! ```text
//!   start: interface_init ─▶ init
//!   poll:  timing.prepare ─▶ main_loop ─▶ service_keys(take()) ─┐
//!            ▲                                                   │
//!            └───────────────────────────────────────────────────┘
//! ```

use log::info;

use crate::bus::{BusKind, TimingAdapter};
use crate::events::{KeyEvents, Keys};

use super::events::AppEvent;
use super::ports::{BusFrontEnd, EventSink};

/// Sequences one bus front end through its lifecycle.
pub struct BusController<B, T> {
    bus: B,
    timing: T,
    sleeping: bool,
}

impl<B: BusFrontEnd, T: TimingAdapter> BusController<B, T> {
    /// Take ownership of an already-selected bus and bring it up.
    pub fn start(mut bus: B, timing: T, sink: &mut impl EventSink) -> Self {
        bus.interface_init();
        bus.init();
        let kind = bus.kind();
        sink.emit(&AppEvent::BusStarted(kind));
        info!("BusController started on {} bus", kind.name());
        Self {
            bus,
            timing,
            sleeping: false,
        }
    }

    pub fn kind(&self) -> BusKind {
        self.bus.kind()
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Match the clock to the bus, then enter its main loop.
    ///
    /// The timing adapter is consulted on every entry because the loop
    /// may be re-entered after a sleep/wake cycle; it only reprograms
    /// the clock when the bus needs a different profile.
    pub fn run_once(&mut self, sink: &mut impl EventSink) {
        let bus = self.bus.kind();
        match self.timing.prepare(bus) {
            Some(Ok(profile)) => sink.emit(&AppEvent::ClockApplied { bus, profile }),
            Some(Err(error)) => sink.emit(&AppEvent::ClockFailed { bus, error }),
            None => {}
        }
        self.bus.main_loop();
    }

    /// Put the bus to sleep or wake it.  No-op if already in that state.
    pub fn set_sleep(&mut self, sleep: bool, sink: &mut impl EventSink) {
        if self.sleeping == sleep {
            return;
        }
        self.sleeping = sleep;
        self.bus.set_sleep(sleep);
        sink.emit(&AppEvent::SleepChanged {
            bus: self.bus.kind(),
            sleeping: sleep,
        });
    }

    /// Handle the keys drained from the tick handler.
    ///
    /// SLEEP toggles the bus sleep state.  Everything else is returned
    /// for the menu/UI consumer.
    pub fn service_keys(&mut self, keys: Keys, sink: &mut impl EventSink) -> Keys {
        if keys.contains(Keys::SLEEP) {
            let sleep = !self.sleeping;
            self.set_sleep(sleep, sink);
        }
        let rest = keys.without(Keys::SLEEP);
        if !rest.is_empty() {
            sink.emit(&AppEvent::KeysForwarded(rest));
        }
        rest
    }

    /// One foreground pass: run the bus, then drain and service the keys
    /// raised by the tick handler.  Returns the keys left for the menu.
    pub fn poll(&mut self, keys: &KeyEvents, sink: &mut impl EventSink) -> Keys {
        self.run_once(sink);
        let pending = keys.take();
        self.service_keys(pending, sink)
    }
}
