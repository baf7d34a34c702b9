//! Status indicator pattern, derived from busy/dirty/error conditions.
//!
//! The conditions are owned by other subsystems (bus, storage) and
//! published through [`LedFlags`].  The tick handler calls
//! [`StatusIndicator::tick`] once per tick and hands the result to the
//! LED output.
//!
//! ## Priority (highest first)
//!
//! 1. **Error**: blink, toggling every `blink_ticks`
//! 2. **Busy / dirty**: steady on
//! 3. otherwise: off
//!
//! On boards with separate busy and dirty LEDs the error blink is shown
//! on the dirty LED and the busy LED keeps following BUSY.

use core::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::tick::Tick;

/// Status conditions written by the foreground, read by the tick handler.
pub struct LedFlags {
    bits: AtomicU8,
}

impl LedFlags {
    pub const BUSY: u8 = 1 << 0;
    pub const DIRTY: u8 = 1 << 1;
    pub const ERROR: u8 = 1 << 2;

    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    pub fn set_busy(&self, on: bool) {
        self.set(Self::BUSY, on);
    }

    pub fn set_dirty(&self, on: bool) {
        self.set(Self::DIRTY, on);
    }

    pub fn set_error(&self, on: bool) {
        self.set(Self::ERROR, on);
    }

    /// Point-in-time copy for the tick handler.
    pub fn snapshot(&self) -> LedConditions {
        let bits = self.bits.load(Ordering::Acquire);
        LedConditions {
            busy: bits & Self::BUSY != 0,
            dirty: bits & Self::DIRTY != 0,
            error: bits & Self::ERROR != 0,
        }
    }

    fn set(&self, mask: u8, on: bool) {
        if on {
            self.bits.fetch_or(mask, Ordering::AcqRel);
        } else {
            self.bits.fetch_and(!mask, Ordering::AcqRel);
        }
    }
}

impl Default for LedFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded status conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedConditions {
    pub busy: bool,
    pub dirty: bool,
    pub error: bool,
}

/// How many status LEDs the board has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorLayout {
    /// One shared LED: busy and dirty are OR-ed together.
    Single,
    /// Separate busy and dirty LEDs.
    Dual,
}

/// LED levels for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Single(bool),
    Dual { busy: bool, dirty: bool },
}

/// Blink/steady pattern generator.
#[derive(Debug)]
pub struct StatusIndicator {
    layout: IndicatorLayout,
    blink_ticks: Tick,
    /// Current phase of the error blink.
    blink_on: bool,
}

impl StatusIndicator {
    pub const fn new(layout: IndicatorLayout, blink_ticks: Tick) -> Self {
        Self {
            layout,
            blink_ticks,
            blink_on: false,
        }
    }

    pub fn layout(&self) -> IndicatorLayout {
        self.layout
    }

    /// Advance one tick.  `now` is the counter after this tick's increment.
    pub fn tick(&mut self, now: Tick, cond: LedConditions) -> Indicator {
        if cond.error {
            // A zero period never toggles: the error phase stays off.
            if now.checked_rem(self.blink_ticks) == Some(0) {
                self.blink_on = !self.blink_on;
            }
        } else {
            self.blink_on = false;
        }

        match self.layout {
            IndicatorLayout::Single => {
                if cond.error {
                    Indicator::Single(self.blink_on)
                } else {
                    Indicator::Single(cond.busy || cond.dirty)
                }
            }
            IndicatorLayout::Dual => Indicator::Dual {
                busy: cond.busy,
                dirty: if cond.error { self.blink_on } else { cond.dirty },
            },
        }
    }
}
