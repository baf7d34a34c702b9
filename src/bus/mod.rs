//! Bus front-end selection.
//!
//! Two mutually exclusive front ends share the board: a byte-serial
//! protocol bus and a parallel instrumentation bus.  Exactly one is live
//! for the whole run.
//!
//! - A board with a single front end passes it straight to the
//!   [`BusController`](crate::app::service::BusController); dispatch is a
//!   direct, monomorphised call.
//! - A board with both builds an [`ActiveBus`] once at startup.  Only the
//!   chosen front end is ever constructed and the variant cannot change
//!   afterwards, so no caller can observe two bus kinds in one run.

pub mod clock;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::ports::BusFrontEnd;

pub use clock::{ClockProfile, ClockSwitcher, FixedClock, Peripheral, TimingAdapter};

/// Which bus front end is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusKind {
    /// Byte-serial protocol bus (three-wire, bit-banged).
    Serial,
    /// Parallel instrumentation-style bus (eight data lines + handshake).
    Parallel,
}

impl BusKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Parallel => "parallel",
        }
    }
}

/// Runtime choice between two compiled-in front ends.
pub enum ActiveBus<S, P> {
    Serial(S),
    Parallel(P),
}

impl<S: BusFrontEnd, P: BusFrontEnd> ActiveBus<S, P> {
    /// Fix the active bus.  Only the selected constructor runs.
    pub fn select(
        kind: BusKind,
        make_serial: impl FnOnce() -> S,
        make_parallel: impl FnOnce() -> P,
    ) -> Self {
        log::info!("bus: {} front end selected", kind.name());
        match kind {
            BusKind::Serial => Self::Serial(make_serial()),
            BusKind::Parallel => Self::Parallel(make_parallel()),
        }
    }
}

impl<S: BusFrontEnd, P: BusFrontEnd> BusFrontEnd for ActiveBus<S, P> {
    fn kind(&self) -> BusKind {
        match self {
            Self::Serial(_) => BusKind::Serial,
            Self::Parallel(_) => BusKind::Parallel,
        }
    }

    fn interface_init(&mut self) {
        debug!("bus interface_init -> {}", self.kind().name());
        match self {
            Self::Serial(bus) => bus.interface_init(),
            Self::Parallel(bus) => bus.interface_init(),
        }
    }

    fn init(&mut self) {
        debug!("bus init -> {}", self.kind().name());
        match self {
            Self::Serial(bus) => bus.init(),
            Self::Parallel(bus) => bus.init(),
        }
    }

    fn main_loop(&mut self) {
        debug!("bus main_loop -> {}", self.kind().name());
        match self {
            Self::Serial(bus) => bus.main_loop(),
            Self::Parallel(bus) => bus.main_loop(),
        }
    }

    fn set_sleep(&mut self, sleep: bool) {
        debug!("bus set_sleep({}) -> {}", sleep, self.kind().name());
        match self {
            Self::Serial(bus) => bus.set_sleep(sleep),
            Self::Parallel(bus) => bus.set_sleep(sleep),
        }
    }
}
