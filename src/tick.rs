//! Monotonic system tick counter and wrap-safe time comparisons.
//!
//! The counter is written only by the tick handler (one increment per
//! invocation) and read by everyone else.  It wraps silently at
//! `u32::MAX`; every comparison in the firmware goes through
//! [`time_after`] / [`time_before`] so that the wrap never produces a
//! false "elapsed" judgement.
//!
//! ```text
//!   u32::MAX - 1   u32::MAX      0         1         2
//!  ─────┼─────────────┼──────────┼─────────┼─────────┼────▶ ticks
//!       last                                deadline = last + 4 (wrapped)
//!       time_after(1, deadline) == false    time_after(3, deadline) == true
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

/// One tick of the system timer.  The unit of every timeout.
pub type Tick = u32;

/// `true` if `a` is strictly later than `b`, tolerating counter wrap.
///
/// Valid as long as the two values are less than half the counter range
/// apart, which every window in this firmware is (see
/// [`FirmwareConfig::validate`](crate::config::FirmwareConfig::validate)).
#[inline]
pub const fn time_after(a: Tick, b: Tick) -> bool {
    (b.wrapping_sub(a) as i32) < 0
}

/// `true` if `a` is strictly earlier than `b`, tolerating counter wrap.
#[inline]
pub const fn time_before(a: Tick, b: Tick) -> bool {
    time_after(b, a)
}

/// Largest window that still compares correctly across the wrap.
pub const MAX_WINDOW: Tick = i32::MAX as Tick;

/// Process-wide tick counter shared between the tick handler and the
/// foreground loop.
pub struct TickCounter {
    ticks: AtomicU32,
}

impl TickCounter {
    /// Counter starting at zero, as at power-on.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Counter seeded with an arbitrary value (wraparound testing, or
    /// resuming after a soft restart).
    pub const fn starting_at(start: Tick) -> Self {
        Self {
            ticks: AtomicU32::new(start),
        }
    }

    /// Snapshot of the current tick.  Foreground code reads once into a
    /// local and compares against that.
    #[inline]
    pub fn now(&self) -> Tick {
        self.ticks.load(Ordering::Acquire)
    }

    /// Advance by exactly one tick and return the new value.
    /// Tick-handler only.
    #[inline]
    pub fn advance(&self) -> Tick {
        self.ticks.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}
