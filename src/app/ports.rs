//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SystemTick / BusController (domain)
//! ```
//!
//! Tick-side ports ([`ButtonSampler`], [`IndicatorOutput`], [`TickHook`],
//! [`DisplayAttention`]) are called from the tick handler and must do
//! bounded, non-blocking work.  Foreground ports ([`BusFrontEnd`],
//! [`ClockPort`], [`DiagnosticPort`], [`EventSink`]) may block.

use crate::bus::{BusKind, ClockProfile, Peripheral};
use crate::debounce::RawButtons;
use crate::error::Result;
use crate::indicator::{Indicator, IndicatorLayout};

// ───────────────────────────────────────────────────────────────
// Tick-side ports (called once per tick, interrupt context)
// ───────────────────────────────────────────────────────────────

/// Reads the physical button lines.
pub trait ButtonSampler {
    /// Current raw state, one bit per pressed line.
    fn sample(&mut self) -> RawButtons;

    /// Whether a secondary (PREV) line exists on this board.
    fn has_secondary(&self) -> bool;
}

/// Drives the status light(s).
pub trait IndicatorOutput {
    fn layout(&self) -> IndicatorLayout;

    fn show(&mut self, indicator: Indicator);
}

/// Per-tick notification for collaborators such as the software RTC.
pub trait TickHook {
    fn on_tick(&mut self);
}

impl TickHook for () {
    fn on_tick(&mut self) {}
}

/// Remote display "query me" line.
pub trait DisplayAttention {
    fn wants_attention(&mut self) -> bool;
}

impl DisplayAttention for () {
    fn wants_attention(&mut self) -> bool {
        false
    }
}

// ───────────────────────────────────────────────────────────────
// Bus front end (driven adapter: domain → bus protocol engine)
// ───────────────────────────────────────────────────────────────

/// Lifecycle of one bus front end.  The protocol state machine behind it
/// is outside this crate.
pub trait BusFrontEnd {
    fn kind(&self) -> BusKind;

    /// Configure the bus lines (directions, pull-ups).  Called once.
    fn interface_init(&mut self);

    /// Reset protocol state.  Called once, after `interface_init`.
    fn init(&mut self);

    /// Run the protocol main loop.  Returns when the bus wants the
    /// controller to service keys or re-enter (e.g. around sleep).
    fn main_loop(&mut self);

    /// Release (`true`) or re-acquire (`false`) the bus.
    fn set_sleep(&mut self, sleep: bool);
}

// ───────────────────────────────────────────────────────────────
// Clock + diagnostics (driven adapter: domain → SoC)
// ───────────────────────────────────────────────────────────────

/// Processor clock divisor and the peripherals that derive from it.
pub trait ClockPort {
    /// Reprogram the processor clock.
    fn set_profile(&mut self, profile: ClockProfile) -> Result<()>;

    /// Recompute a clock-derived peripheral's timing for `profile`.
    fn resync(&mut self, peripheral: Peripheral, profile: ClockProfile);
}

/// Outbound diagnostic channel (debug UART).
///
/// Text is queued through [`core::fmt::Write`]; nothing is guaranteed to
/// be on the wire until [`DiagnosticPort::flush`] returns.
pub trait DiagnosticPort: core::fmt::Write {
    /// Block until every queued byte has left the wire.
    fn flush(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
