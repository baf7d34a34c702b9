//! Firmware configuration parameters
//!
//! Timing windows, board layout and the bus selection.  Values are
//! persisted as a postcard blob in NVS; a missing or undecodable blob
//! falls back to [`FirmwareConfig::default`].

use serde::{Deserialize, Serialize};

use crate::bus::BusKind;
use crate::error::{Error, Result};
use crate::indicator::IndicatorLayout;
use crate::tick::{MAX_WINDOW, Tick};

/// Default system tick rate.
pub const DEFAULT_TICK_HZ: u32 = 100;

/// Upper bound for a serialised config blob.
pub const CONFIG_BLOB_MAX: usize = 32;

/// Debounce and long-press windows, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceTiming {
    /// Quiescence required before a change is trusted.
    pub debounce_ticks: Tick,
    /// Continuous hold that synthesises SLEEP.
    pub sleep_hold_ticks: Tick,
}

impl DebounceTiming {
    pub const fn for_hz(hz: u32) -> Self {
        Self {
            debounce_ticks: 4,
            sleep_hold_ticks: 2 * hz,
        }
    }
}

impl Default for DebounceTiming {
    fn default() -> Self {
        Self::for_hz(DEFAULT_TICK_HZ)
    }
}

/// Core firmware configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareConfig {
    // --- Tick source ---
    /// System tick frequency (HZ).
    pub tick_hz: u32,

    // --- Buttons ---
    pub timing: DebounceTiming,
    /// Board has a secondary (PREV) button.
    pub secondary_button: bool,

    // --- Status indicator ---
    pub indicator: IndicatorLayout,
    /// ERROR blink toggles every this many ticks.
    pub error_blink_ticks: Tick,

    // --- Bus ---
    /// Bus front end selected for this run.
    pub active_bus: BusKind,
    /// Reprogram the CPU clock to suit the active bus (serial bus runs
    /// divided, parallel bus at full speed).
    pub bus_clock_switching: bool,

    // --- Collaborators ---
    /// Poll the remote display's attention line every tick.
    pub remote_display: bool,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,
            timing: DebounceTiming::for_hz(DEFAULT_TICK_HZ),
            secondary_button: true,
            indicator: IndicatorLayout::Dual,
            error_blink_ticks: 16,
            active_bus: BusKind::Serial,
            bus_clock_switching: true,
            remote_display: false,
        }
    }
}

impl FirmwareConfig {
    /// Reject values the tick path cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.tick_hz == 0 {
            return Err(Error::Config("tick_hz must be non-zero"));
        }
        if self.timing.debounce_ticks == 0 {
            return Err(Error::Config("debounce window must be non-zero"));
        }
        if self.timing.sleep_hold_ticks <= self.timing.debounce_ticks {
            return Err(Error::Config("sleep-hold window must exceed debounce window"));
        }
        if self.timing.sleep_hold_ticks >= MAX_WINDOW {
            return Err(Error::Config("sleep-hold window exceeds wrap-safe range"));
        }
        if self.error_blink_ticks == 0 {
            return Err(Error::Config("error blink period must be non-zero"));
        }
        Ok(())
    }

    /// Serialise into `buf` for persistence.  Returns the used prefix.
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8]> {
        Ok(postcard::to_slice(self, buf)?)
    }

    /// Decode and validate a persisted blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = postcard::from_bytes(bytes)?;
        config.validate()?;
        Ok(config)
    }
}
