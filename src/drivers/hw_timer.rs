//! System tick timer using ESP-IDF's esp_timer API.
//!
//! Registers one [`TickHandler`] as a periodic callback at HZ.  The
//! handler is boxed and its pointer handed to the timer as the callback
//! argument; the timer is its only user until [`TickTimer`] is dropped.
//!
//! On simulation targets no timer runs: [`TickTimer::fire`] drives the
//! handler by hand.

use crate::error::{Error, Result};
use crate::system_tick::TickHandler;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Microseconds per tick at `hz`.
pub const fn period_us(hz: u32) -> u64 {
    1_000_000 / hz as u64
}

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub struct TickTimer<H: TickHandler> {
    handle: esp_timer_handle_t,
    handler: *mut H,
    period_us: u64,
}

// SAFETY: the handle and handler pointer are only touched from the
// owning task (restart/drop) and from the timer callback, which the
// esp_timer service serialises.
#[cfg(target_os = "espidf")]
unsafe impl<H: TickHandler + Send> Send for TickTimer<H> {}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb<H: TickHandler>(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the Box<H> leaked in `start()`, alive until the
    // timer is deleted in `Drop`.  esp_timer never runs one timer's
    // callback concurrently with itself.
    let handler = unsafe { &mut *arg.cast::<H>() };
    handler.on_tick();
}

#[cfg(target_os = "espidf")]
impl<H: TickHandler + Send + 'static> TickTimer<H> {
    /// Create and start the periodic tick timer.
    pub fn start(handler: H, hz: u32) -> Result<Self> {
        if hz == 0 {
            return Err(Error::Init("tick rate must be non-zero"));
        }
        let handler = Box::into_raw(Box::new(handler));
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb::<H>),
            arg: handler.cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"tick".as_ptr(),
            skip_unhandled_events: true,
        };

        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: `args` outlives the call; `handle` is written on success.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={})", ret);
            // SAFETY: the timer was never created, nothing else holds it.
            drop(unsafe { Box::from_raw(handler) });
            return Err(Error::Init("tick timer create failed"));
        }

        let mut timer = Self {
            handle,
            handler,
            period_us: period_us(hz),
        };
        timer.arm()?;
        log::info!("hw_timer: tick @{}Hz started", hz);
        Ok(timer)
    }
}

#[cfg(target_os = "espidf")]
impl<H: TickHandler> TickTimer<H> {
    /// Re-arm at `hz`.  Resets the tick phase.
    pub fn restart(&mut self, hz: u32) -> Result<()> {
        if hz == 0 {
            return Err(Error::Init("tick rate must be non-zero"));
        }
        // SAFETY: handle is valid for our lifetime.  Stopping an idle
        // timer returns ESP_ERR_INVALID_STATE, which is fine here.
        unsafe {
            esp_timer_stop(self.handle);
        }
        self.period_us = period_us(hz);
        self.arm()
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    fn arm(&mut self) -> Result<()> {
        // SAFETY: handle is valid for our lifetime.
        let ret = unsafe { esp_timer_start_periodic(self.handle, self.period_us) };
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={})", ret);
            return Err(Error::Init("tick timer start failed"));
        }
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl<H: TickHandler> Drop for TickTimer<H> {
    fn drop(&mut self) {
        // SAFETY: after stop + delete the callback can no longer run, so
        // reclaiming the handler box is sound.
        unsafe {
            esp_timer_stop(self.handle);
            esp_timer_delete(self.handle);
            drop(Box::from_raw(self.handler));
        }
    }
}

// ── Simulation ────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub struct TickTimer<H: TickHandler> {
    handler: H,
    period_us: u64,
    restarts: u32,
}

#[cfg(not(target_os = "espidf"))]
impl<H: TickHandler> TickTimer<H> {
    pub fn start(handler: H, hz: u32) -> Result<Self> {
        if hz == 0 {
            return Err(Error::Init("tick rate must be non-zero"));
        }
        log::info!("hw_timer(sim): tick @{}Hz not started (driven by fire())", hz);
        Ok(Self {
            handler,
            period_us: period_us(hz),
            restarts: 0,
        })
    }

    pub fn restart(&mut self, hz: u32) -> Result<()> {
        if hz == 0 {
            return Err(Error::Init("tick rate must be non-zero"));
        }
        self.period_us = period_us(hz);
        self.restarts += 1;
        Ok(())
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    /// Number of restarts since start.
    pub fn restarts(&self) -> u32 {
        self.restarts
    }

    /// Run the handler as if the timer expired once.
    pub fn fire(&mut self) {
        self.handler.on_tick();
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}
