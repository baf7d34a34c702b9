//! Mock hardware for integration tests.
//!
//! Every mock records into a shared journal so tests can assert on the
//! full, ordered call history across bus, clock and diagnostics ports
//! without touching real GPIO or timers.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use dualbus::app::events::AppEvent;
use dualbus::app::ports::{
    BusFrontEnd, ButtonSampler, ClockPort, DiagnosticPort, DisplayAttention, EventSink, TickHook,
};
use dualbus::bus::{BusKind, ClockProfile, Peripheral};
use dualbus::debounce::RawButtons;
use dualbus::error::{Error, Result};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

// ── Call journal ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    InterfaceInit(BusKind),
    Init(BusKind),
    MainLoop(BusKind),
    Sleep(BusKind, bool),
    Flush,
    SetProfile(ClockProfile),
    Resync(Peripheral),
}

pub type Journal = Rc<RefCell<Vec<Call>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

// ── Buttons ───────────────────────────────────────────────────

/// Sampler whose raw state the test sets between ticks.
pub struct ScriptedButtons {
    pub raw: Rc<Cell<RawButtons>>,
    pub secondary: bool,
}

impl ScriptedButtons {
    pub fn new(secondary: bool) -> (Self, Rc<Cell<RawButtons>>) {
        let raw = Rc::new(Cell::new(RawButtons::NONE));
        (
            Self {
                raw: raw.clone(),
                secondary,
            },
            raw,
        )
    }
}

impl ButtonSampler for ScriptedButtons {
    fn sample(&mut self) -> RawButtons {
        self.raw.get()
    }

    fn has_secondary(&self) -> bool {
        self.secondary
    }
}

/// Input pin whose electrical level the test controls (`true` = high).
#[derive(Clone)]
pub struct LevelPin(pub Rc<Cell<bool>>);

impl LevelPin {
    pub fn released() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn press(&self) {
        self.0.set(false);
    }

    pub fn release(&self) {
        self.0.set(true);
    }
}

impl ErrorType for LevelPin {
    type Error = Infallible;
}

impl InputPin for LevelPin {
    fn is_high(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> core::result::Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

// ── LEDs ──────────────────────────────────────────────────────

/// Output pin recording its level and how often it was written.
#[derive(Clone, Default)]
pub struct LedPin {
    pub level: Rc<Cell<bool>>,
    pub writes: Rc<Cell<u32>>,
}

impl ErrorType for LedPin {
    type Error = Infallible;
}

impl OutputPin for LedPin {
    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.level.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.level.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

// ── Tick collaborators ────────────────────────────────────────

#[derive(Default)]
pub struct CountingRtc {
    pub ticks: u32,
}

impl TickHook for CountingRtc {
    fn on_tick(&mut self) {
        self.ticks += 1;
    }
}

pub struct AttentionLine(pub Rc<Cell<bool>>);

impl DisplayAttention for AttentionLine {
    fn wants_attention(&mut self) -> bool {
        self.0.get()
    }
}

// ── Bus, clock, diagnostics ───────────────────────────────────

pub struct RecordingBus {
    pub kind: BusKind,
    pub journal: Journal,
}

impl BusFrontEnd for RecordingBus {
    fn kind(&self) -> BusKind {
        self.kind
    }

    fn interface_init(&mut self) {
        self.journal.borrow_mut().push(Call::InterfaceInit(self.kind));
    }

    fn init(&mut self) {
        self.journal.borrow_mut().push(Call::Init(self.kind));
    }

    fn main_loop(&mut self) {
        self.journal.borrow_mut().push(Call::MainLoop(self.kind));
    }

    fn set_sleep(&mut self, sleep: bool) {
        self.journal.borrow_mut().push(Call::Sleep(self.kind, sleep));
    }
}

pub struct MockClock {
    pub journal: Journal,
    pub reject: bool,
}

impl ClockPort for MockClock {
    fn set_profile(&mut self, profile: ClockProfile) -> Result<()> {
        self.journal.borrow_mut().push(Call::SetProfile(profile));
        if self.reject {
            Err(Error::Clock(-1))
        } else {
            Ok(())
        }
    }

    fn resync(&mut self, peripheral: Peripheral, _profile: ClockProfile) {
        self.journal.borrow_mut().push(Call::Resync(peripheral));
    }
}

pub struct MockDiag(pub Journal);

impl core::fmt::Write for MockDiag {
    fn write_str(&mut self, _s: &str) -> core::fmt::Result {
        Ok(())
    }
}

impl DiagnosticPort for MockDiag {
    fn flush(&mut self) {
        self.0.borrow_mut().push(Call::Flush);
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
