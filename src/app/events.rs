//! Outbound application events.
//!
//! The [`BusController`](super::service::BusController) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::bus::{BusKind, ClockProfile};
use crate::error::Error;
use crate::events::Keys;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The selected bus finished interface-init and init.
    BusStarted(BusKind),

    /// The clock profile for the active bus was applied.
    ClockApplied { bus: BusKind, profile: ClockProfile },

    /// The clock driver rejected the profile; the bus runs anyway.
    ClockFailed { bus: BusKind, error: Error },

    /// The bus was put to sleep or woken.
    SleepChanged { bus: BusKind, sleeping: bool },

    /// Keys left over for the menu/UI consumer.
    KeysForwarded(Keys),
}
