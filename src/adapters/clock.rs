//! ESP32 clock adapter.
//!
//! Implements [`ClockPort`] for the SoC: the CPU frequency is set through
//! the power-management driver, and the clock-derived peripherals are
//! resynchronised afterwards.  `esp_timer` counts from a source that does
//! not follow the CPU divisor, so the tick timer is only re-armed when
//! its period has to change; re-arming resets its phase.
//!
//! - **`target_os = "espidf"`**: `esp_pm_configure()` with min = max so
//!   dynamic frequency scaling cannot undo the profile;
//!   `uart_set_baudrate()` recomputes the UART divider.
//! - **`not(target_os = "espidf")`**: records the profile and counts
//!   simulated tick-timer restarts.

use log::debug;

use crate::app::ports::ClockPort;
use crate::bus::{ClockProfile, Peripheral};
use crate::drivers::hw_timer::{TickTimer, period_us};
use crate::error::Result;
use crate::pins;
use crate::system_tick::TickHandler;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Clock adapter owning the tick timer it has to re-arm.
pub struct SocClock<H: TickHandler> {
    timer: TickTimer<H>,
    tick_hz: u32,
    profile: ClockProfile,
}

impl<H: TickHandler> SocClock<H> {
    pub fn new(timer: TickTimer<H>, tick_hz: u32) -> Self {
        Self {
            timer,
            tick_hz,
            profile: ClockProfile::FULL,
        }
    }

    /// Profile currently programmed.
    pub fn profile(&self) -> ClockProfile {
        self.profile
    }

    pub fn timer(&self) -> &TickTimer<H> {
        &self.timer
    }

    fn rearm_if_needed(&mut self) {
        if self.timer.period_us() == period_us(self.tick_hz) {
            return;
        }
        if let Err(e) = self.timer.restart(self.tick_hz) {
            log::error!("clock: tick timer re-arm failed: {}", e);
        }
    }
}

#[cfg(target_os = "espidf")]
impl<H: TickHandler + Send + 'static> ClockPort for SocClock<H> {
    fn set_profile(&mut self, profile: ClockProfile) -> Result<()> {
        let mhz = profile.cpu_mhz(pins::CPU_MAX_MHZ) as i32;
        let cfg = esp_pm_config_t {
            max_freq_mhz: mhz,
            min_freq_mhz: mhz,
            light_sleep_enable: false,
        };
        // SAFETY: `cfg` outlives the call; the driver copies it.
        let ret = unsafe { esp_pm_configure((&raw const cfg).cast()) };
        if ret != ESP_OK {
            return Err(crate::error::Error::Clock(ret));
        }
        self.profile = profile;
        Ok(())
    }

    fn resync(&mut self, peripheral: Peripheral, profile: ClockProfile) {
        match peripheral {
            Peripheral::TickTimer => self.rearm_if_needed(),
            Peripheral::DiagSerial => {
                // SAFETY: the debug UART driver is installed by the logger.
                let ret = unsafe { uart_set_baudrate(pins::DIAG_UART_NUM, pins::DIAG_UART_BAUD) };
                if ret != ESP_OK {
                    log::warn!("clock: UART baud resync failed (rc={})", ret);
                }
            }
            Peripheral::BusTransport => {
                debug!("clock: bus transport follows divisor {}", profile.divisor);
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl<H: TickHandler> ClockPort for SocClock<H> {
    fn set_profile(&mut self, profile: ClockProfile) -> Result<()> {
        debug!(
            "clock(sim): cpu {} MHz",
            profile.cpu_mhz(pins::CPU_MAX_MHZ)
        );
        self.profile = profile;
        Ok(())
    }

    fn resync(&mut self, peripheral: Peripheral, profile: ClockProfile) {
        match peripheral {
            Peripheral::TickTimer => self.rearm_if_needed(),
            Peripheral::DiagSerial | Peripheral::BusTransport => {
                debug!("clock(sim): {:?} follows divisor {}", peripheral, profile.divisor);
            }
        }
    }
}
