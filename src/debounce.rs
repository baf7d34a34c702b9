//! Tick-driven button debouncer and key-event classifier.
//!
//! ## Model
//!
//! The engine keeps the last sampled raw state as its baseline and the
//! tick at which that baseline was established.  A raw change is only
//! *classified* when the baseline had been stable for longer than the
//! debounce window; otherwise it just moves the baseline (contact
//! bounce).
//!
//! ## Classification (first match wins)
//!
//! | Condition                                           | Result              |
//! |-----------------------------------------------------|---------------------|
//! | IGNORE marker pending                               | clear marker, none  |
//! | secondary fitted, both lines held in baseline       | `HOME`              |
//! | primary held in baseline, released now              | `NEXT`              |
//! | secondary held in baseline, released, primary up    | `PREV`              |
//!
//! ## Long press
//!
//! With the primary line the only one held and the baseline older than
//! the sleep-hold window, `SLEEP | IGNORE` is raised and the baseline
//! timestamp is reset, so the release that follows does not also become
//! `NEXT` and the hold does not re-trigger for another window.

use crate::config::DebounceTiming;
use crate::events::{KeyEvents, Keys};
use crate::tick::{Tick, time_after};

/// Raw physical button lines, one bit per line, set = pressed.
///
/// Electrical polarity is the sampler's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawButtons(u8);

impl RawButtons {
    pub const NONE: Self = Self(0);
    /// Primary ("next") line.
    pub const NEXT: Self = Self(1 << 0);
    /// Secondary ("prev") line.
    pub const PREV: Self = Self(1 << 1);
    pub const BOTH: Self = Self(Self::NEXT.0 | Self::PREV.0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn is_held(self, line: Self) -> bool {
        self.0 & line.0 == line.0
    }

    pub const fn with(self, line: Self) -> Self {
        Self(self.0 | line.0)
    }
}

/// Debounce and key-event state owned by the tick handler.
#[derive(Debug)]
pub struct Debouncer {
    timing: DebounceTiming,
    has_secondary: bool,
    /// Baseline raw state.
    state: RawButtons,
    /// Tick at which `state` was established.
    last_change: Tick,
}

impl Debouncer {
    pub const fn new(timing: DebounceTiming, has_secondary: bool) -> Self {
        Self {
            timing,
            has_secondary,
            state: RawButtons::NONE,
            last_change: 0,
        }
    }

    /// Baseline raw state.
    pub fn state(&self) -> RawButtons {
        self.state
    }

    /// Tick of the most recent observed raw change.
    pub fn last_change(&self) -> Tick {
        self.last_change
    }

    /// Feed this tick's sample.  `now` is the counter *before* this
    /// tick's increment.  Returns `true` if the raw state changed.
    pub fn sample(&mut self, raw: RawButtons, now: Tick, keys: &KeyEvents) -> bool {
        let raw = self.mask(raw);
        if raw == self.state {
            return false;
        }

        if time_after(now, self.last_change.wrapping_add(self.timing.debounce_ticks)) {
            if let Some(key) = self.classify(raw, keys) {
                keys.raise(key);
            }
        }

        self.last_change = now;
        self.state = raw;
        true
    }

    /// Long-press check.  `now` is the counter *after* this tick's
    /// increment.  Runs every tick whether or not the state changed.
    pub fn check_hold(&mut self, now: Tick, keys: &KeyEvents) {
        let primary_only = if self.has_secondary {
            self.state == RawButtons::NEXT
        } else {
            self.state.is_held(RawButtons::NEXT)
        };
        if !primary_only || keys.contains(Keys::SLEEP) {
            return;
        }
        if time_after(now, self.last_change.wrapping_add(self.timing.sleep_hold_ticks)) {
            keys.raise(Keys::SLEEP | Keys::IGNORE);
            self.last_change = now;
        }
    }

    fn classify(&self, raw: RawButtons, keys: &KeyEvents) -> Option<Keys> {
        let prev = self.state;

        if keys.contains(Keys::IGNORE) {
            keys.clear(Keys::IGNORE);
            return None;
        }
        if self.has_secondary && prev.is_held(RawButtons::BOTH) {
            return Some(Keys::HOME);
        }
        if prev.is_held(RawButtons::NEXT) && !raw.is_held(RawButtons::NEXT) {
            return Some(Keys::NEXT);
        }
        if self.has_secondary
            && prev.is_held(RawButtons::PREV)
            && !raw.is_held(RawButtons::PREV)
            && !raw.is_held(RawButtons::NEXT)
        {
            return Some(Keys::PREV);
        }
        None
    }

    /// Boards without a secondary button never see its line.
    fn mask(&self, raw: RawButtons) -> RawButtons {
        if self.has_secondary {
            RawButtons(raw.0 & RawButtons::BOTH.0)
        } else {
            RawButtons(raw.0 & RawButtons::NEXT.0)
        }
    }
}
