//! Clock/timing adaptation for the active bus.
//!
//! The serial bus is bit-banged against tight line timings that are
//! calibrated for a divided processor clock; the parallel bus wants the
//! full clock for throughput.  Before every entry into a bus main loop
//! the controller asks its [`TimingAdapter`] to make the clock match.
//!
//! ```text
//!  flush diag UART ──▶ set divisor ──▶ resync tick timer
//!                                  ──▶ resync diag UART
//!                                  ──▶ resync bus transport
//! ```
//!
//! The flush comes first: bytes still in the UART FIFO would go out at
//! the wrong baud rate once the divisor changes.  An entry whose bus
//! needs the profile already in force touches nothing.

use core::fmt::Write as _;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use super::BusKind;
use crate::app::ports::{ClockPort, DiagnosticPort};
use crate::error::Result;

/// Processor clock divisor for a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockProfile {
    pub divisor: u8,
}

impl ClockProfile {
    pub const FULL: Self = Self { divisor: 1 };
    pub const HALF: Self = Self { divisor: 2 };

    /// Serial bus runs divided, parallel bus at full speed.
    pub const fn for_bus(bus: BusKind) -> Self {
        match bus {
            BusKind::Serial => Self::HALF,
            BusKind::Parallel => Self::FULL,
        }
    }

    /// Resulting CPU frequency for a given undivided frequency.
    pub const fn cpu_mhz(self, max_mhz: u32) -> u32 {
        max_mhz / self.divisor as u32
    }
}

/// Peripherals whose timing derives from the processor clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    /// The system tick timer.
    TickTimer,
    /// Diagnostic serial output.
    DiagSerial,
    /// The bus transport's own clocking (SPI / line timing).
    BusTransport,
}

impl Peripheral {
    pub const ALL: [Self; 3] = [Self::TickTimer, Self::DiagSerial, Self::BusTransport];
}

/// Applied before every bus main-loop entry.
pub trait TimingAdapter {
    /// Match the clock to `bus`.  `None` when nothing needed changing.
    fn prepare(&mut self, bus: BusKind) -> Option<Result<ClockProfile>>;
}

/// Single-bus boards, or dual-bus boards whose buses share timing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedClock;

impl TimingAdapter for FixedClock {
    fn prepare(&mut self, _bus: BusKind) -> Option<Result<ClockProfile>> {
        None
    }
}

/// Runtime opt-in: `None` behaves like [`FixedClock`].
impl<T: TimingAdapter> TimingAdapter for Option<T> {
    fn prepare(&mut self, bus: BusKind) -> Option<Result<ClockProfile>> {
        self.as_mut().and_then(|adapter| adapter.prepare(bus))
    }
}

/// Reprograms the clock divisor for the active bus.
pub struct ClockSwitcher<C, D> {
    clock: C,
    diag: D,
    /// Profile in force; `None` until the first successful switch.
    applied: Option<ClockProfile>,
}

impl<C: ClockPort, D: DiagnosticPort> ClockSwitcher<C, D> {
    pub fn new(clock: C, diag: D) -> Self {
        Self {
            clock,
            diag,
            applied: None,
        }
    }

    pub fn applied(&self) -> Option<ClockProfile> {
        self.applied
    }

    pub fn into_parts(self) -> (C, D) {
        (self.clock, self.diag)
    }
}

impl<C: ClockPort, D: DiagnosticPort> TimingAdapter for ClockSwitcher<C, D> {
    fn prepare(&mut self, bus: BusKind) -> Option<Result<ClockProfile>> {
        let profile = ClockProfile::for_bus(bus);
        if self.applied == Some(profile) {
            debug!("clock: {} bus, divisor {} unchanged", bus.name(), profile.divisor);
            return None;
        }

        let _ = write!(self.diag, "clock: {} bus, divisor {}", bus.name(), profile.divisor);
        self.diag.flush();

        if let Err(e) = self.clock.set_profile(profile) {
            error!("clock: {} profile (div {}) rejected: {}", bus.name(), profile.divisor, e);
            return Some(Err(e));
        }
        for peripheral in Peripheral::ALL {
            self.clock.resync(peripheral, profile);
        }

        self.applied = Some(profile);
        Some(Ok(profile))
    }
}
