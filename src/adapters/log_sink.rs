//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the logger
//! (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::BusStarted(bus) => {
                info!("BUS   | {} front end up", bus.name());
            }
            AppEvent::ClockApplied { bus, profile } => {
                info!("CLOCK | {} bus, divisor {}", bus.name(), profile.divisor);
            }
            AppEvent::ClockFailed { bus, error } => {
                warn!("CLOCK | {} bus profile not applied: {}", bus.name(), error);
            }
            AppEvent::SleepChanged { bus, sleeping } => {
                info!(
                    "SLEEP | {} bus {}",
                    bus.name(),
                    if *sleeping { "asleep" } else { "awake" }
                );
            }
            AppEvent::KeysForwarded(keys) => {
                info!("KEYS  | {:?}", keys);
            }
        }
    }
}
