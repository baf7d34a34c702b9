//! Raw button samplers.
//!
//! Both samplers implement [`ButtonSampler`] and only report which lines
//! are down; timing and gesture logic live in the
//! [`Debouncer`](crate::debounce::Debouncer).
//!
//! ## GPIO buttons
//!
//! Active-low momentary switches with pull-ups, one `InputPin` per line.
//! The secondary line is optional.
//!
//! ## Analog keypad
//!
//! Five-key resistor-ladder shield on one ADC input.  The 8-bit reading
//! is decoded against calibration thresholds:
//!
//! | Reading       | Key           | Raw lines      |
//! |---------------|---------------|----------------|
//! | `< right`     | Right         | NEXT + PREV    |
//! | `< updown`    | Up / Down     | NEXT           |
//! | `< left`      | Left          | PREV           |
//! | `< select`    | Select        | NEXT           |
//! | `>= select`   | none          | -              |

use embedded_hal::digital::InputPin;

use crate::app::ports::ButtonSampler;
use crate::debounce::RawButtons;

// ── GPIO ──────────────────────────────────────────────────────

pub struct GpioButtons<N, P> {
    next: N,
    prev: Option<P>,
}

impl<N: InputPin, P: InputPin> GpioButtons<N, P> {
    pub fn new(next: N, prev: Option<P>) -> Self {
        Self { next, prev }
    }

    /// A read error counts as "not pressed"; the tick path cannot
    /// propagate it and the next tick samples again.
    fn pressed(pin: &mut impl InputPin) -> bool {
        pin.is_low().unwrap_or(false)
    }
}

impl<N: InputPin, P: InputPin> ButtonSampler for GpioButtons<N, P> {
    fn sample(&mut self) -> RawButtons {
        let mut raw = RawButtons::NONE;
        if Self::pressed(&mut self.next) {
            raw = raw.with(RawButtons::NEXT);
        }
        if let Some(prev) = self.prev.as_mut() {
            if Self::pressed(prev) {
                raw = raw.with(RawButtons::PREV);
            }
        }
        raw
    }

    fn has_secondary(&self) -> bool {
        self.prev.is_some()
    }
}

// ── Analog keypad ─────────────────────────────────────────────

/// Upper (exclusive) ADC bounds for each key band.  Hardware
/// calibration; the defaults suit the common 5-key LCD shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeypadThresholds {
    pub right: u8,
    pub up_down: u8,
    pub left: u8,
    pub select: u8,
}

impl Default for KeypadThresholds {
    fn default() -> Self {
        Self {
            right: 16,
            up_down: 84,
            left: 140,
            select: 212,
        }
    }
}

impl KeypadThresholds {
    pub fn decode(&self, reading: u8) -> RawButtons {
        if reading < self.right {
            RawButtons::BOTH
        } else if reading < self.up_down {
            RawButtons::NEXT
        } else if reading < self.left {
            RawButtons::PREV
        } else if reading < self.select {
            RawButtons::NEXT
        } else {
            RawButtons::NONE
        }
    }
}

/// Resistor-ladder keypad behind an 8-bit ADC sample function.
pub struct AnalogKeypad<F> {
    read_adc: F,
    thresholds: KeypadThresholds,
}

impl<F: FnMut() -> u8> AnalogKeypad<F> {
    pub fn new(read_adc: F) -> Self {
        Self::with_thresholds(read_adc, KeypadThresholds::default())
    }

    pub fn with_thresholds(read_adc: F, thresholds: KeypadThresholds) -> Self {
        Self {
            read_adc,
            thresholds,
        }
    }
}

impl<F: FnMut() -> u8> ButtonSampler for AnalogKeypad<F> {
    fn sample(&mut self) -> RawButtons {
        self.thresholds.decode((self.read_adc)())
    }

    fn has_secondary(&self) -> bool {
        true
    }
}
