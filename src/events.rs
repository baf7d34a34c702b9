//! Interrupt-driven logical key-event set.
//!
//! Key events are produced by the tick handler (debouncer, long-press
//! detector, remote-display attention) and consumed by the foreground
//! loop (bus controller, menu/UI).
//!
//! ```text
//! ┌─────────────┐            ┌──────────────┐           ┌──────────────┐
//! │ Debouncer   │──fetch_or─▶│              │           │              │
//! │ Long press  │──fetch_or─▶│  KeyEvents   │──take()──▶│  Foreground  │
//! │ Display IRQ │──fetch_or─▶│  (AtomicU8)  │           │  (consumer)  │
//! └─────────────┘            └──────────────┘           └──────────────┘
//! ```
//!
//! The producer only ever ORs bits in and the consumer only ever clears
//! bits it has already observed, so a bit raised while the consumer is
//! clearing is simply picked up on the next drain.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign, Not};
use core::sync::atomic::{AtomicU8, Ordering};

/// A set of logical keys.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Keys(u8);

impl Keys {
    pub const NONE: Self = Self(0);
    /// Primary button released after a stable press.
    pub const NEXT: Self = Self(1 << 0);
    /// Secondary button released after a stable press.
    pub const PREV: Self = Self(1 << 1);
    /// Both buttons held together.
    pub const HOME: Self = Self(1 << 2);
    /// Primary button held past the sleep-hold window.
    pub const SLEEP: Self = Self(1 << 3);
    /// Remote display requested attention.
    pub const DISPLAY: Self = Self(1 << 4);
    /// Internal: suppress the next classified button change.
    pub const IGNORE: Self = Self(1 << 7);

    /// Every key a consumer may see.  Excludes [`Keys::IGNORE`].
    pub const USER: Self = Self(
        Self::NEXT.0 | Self::PREV.0 | Self::HOME.0 | Self::SLEEP.0 | Self::DISPLAY.0,
    );

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for Keys {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Keys {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Keys {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Keys {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Keys, &str); 6] = [
            (Keys::NEXT, "NEXT"),
            (Keys::PREV, "PREV"),
            (Keys::HOME, "HOME"),
            (Keys::SLEEP, "SLEEP"),
            (Keys::DISPLAY, "DISPLAY"),
            (Keys::IGNORE, "IGNORE"),
        ];
        if self.is_empty() {
            return write!(f, "Keys(NONE)");
        }
        write!(f, "Keys(")?;
        let mut first = true;
        for (key, name) in NAMES {
            if self.contains(key) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        write!(f, ")")
    }
}

// ── Shared atomic set ─────────────────────────────────────────

/// Single-producer / single-consumer key-event set.
///
/// Lives in a `static` on the device; tests create their own.
pub struct KeyEvents {
    bits: AtomicU8,
}

impl KeyEvents {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    /// OR `keys` into the set.  Safe from interrupt context.
    #[inline]
    pub fn raise(&self, keys: Keys) {
        self.bits.fetch_or(keys.bits(), Ordering::AcqRel);
    }

    /// Clear `keys` from the set.
    #[inline]
    pub fn clear(&self, keys: Keys) {
        self.bits.fetch_and(!keys.bits(), Ordering::AcqRel);
    }

    /// `true` if every key in `keys` is pending.
    #[inline]
    pub fn contains(&self, keys: Keys) -> bool {
        self.pending().contains(keys)
    }

    /// Snapshot of the whole set, IGNORE marker included.
    #[inline]
    pub fn pending(&self) -> Keys {
        Keys::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Atomically take and clear every user-visible key.
    ///
    /// A pending IGNORE marker survives the drain; it belongs to the
    /// debouncer and is cleared only when it has suppressed a change.
    pub fn take(&self) -> Keys {
        let prev = self.bits.fetch_and(Keys::IGNORE.bits(), Ordering::AcqRel);
        Keys::from_bits(prev) & Keys::USER
    }
}

impl Default for KeyEvents {
    fn default() -> Self {
        Self::new()
    }
}
