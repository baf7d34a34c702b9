//! Status LED driver.
//!
//! One LED (shared busy/dirty) or two (busy + dirty), each on an
//! active-high `OutputPin`.  Write errors are dropped: the next tick
//! rewrites the level anyway.

use embedded_hal::digital::{OutputPin, PinState};

use crate::app::ports::IndicatorOutput;
use crate::indicator::{Indicator, IndicatorLayout};

pub struct StatusLed<P> {
    busy: P,
    dirty: Option<P>,
    /// Last levels written; `None` until the first tick.
    current: Option<Indicator>,
}

impl<P: OutputPin> StatusLed<P> {
    /// Board with a single shared status LED.
    pub fn single(led: P) -> Self {
        Self {
            busy: led,
            dirty: None,
            current: None,
        }
    }

    /// Board with separate busy and dirty LEDs.
    pub fn dual(busy: P, dirty: P) -> Self {
        Self {
            busy,
            dirty: Some(dirty),
            current: None,
        }
    }

    pub fn current(&self) -> Option<Indicator> {
        self.current
    }
}

impl<P: OutputPin> IndicatorOutput for StatusLed<P> {
    fn layout(&self) -> IndicatorLayout {
        if self.dirty.is_some() {
            IndicatorLayout::Dual
        } else {
            IndicatorLayout::Single
        }
    }

    fn show(&mut self, indicator: Indicator) {
        if self.current == Some(indicator) {
            return;
        }
        match indicator {
            Indicator::Single(on) => {
                let _ = self.busy.set_state(PinState::from(on));
            }
            Indicator::Dual { busy, dirty } => {
                let _ = self.busy.set_state(PinState::from(busy));
                if let Some(pin) = self.dirty.as_mut() {
                    let _ = pin.set_state(PinState::from(dirty));
                }
            }
        }
        self.current = Some(indicator);
    }
}
