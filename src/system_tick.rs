//! The periodic system-tick handler.
//!
//! Registered as the single periodic interrupt callback at HZ.  Every
//! invocation does a bounded amount of work, in a fixed order:
//!
//! ```text
//!  sample buttons ─▶ classify change (pre-increment tick)
//!                 ─▶ advance tick counter
//!                 ─▶ status indicator     (post-increment tick)
//!                 ─▶ long-press check     (post-increment tick)
//!                 ─▶ software RTC hook
//!                 ─▶ remote display attention ─▶ DISPLAY key
//! ```
//!
//! State shared with the foreground lives in [`TickShared`]; everything
//! else is owned by the handler.

use crate::app::ports::{ButtonSampler, DisplayAttention, IndicatorOutput, TickHook};
use crate::config::FirmwareConfig;
use crate::debounce::Debouncer;
use crate::events::{KeyEvents, Keys};
use crate::indicator::{LedFlags, StatusIndicator};
use crate::tick::{Tick, TickCounter};

/// State shared between the tick handler and the foreground loop.
///
/// Initialised to zero at startup and never torn down.
pub struct TickShared {
    pub ticks: TickCounter,
    pub keys: KeyEvents,
    pub leds: LedFlags,
}

impl TickShared {
    pub const fn new() -> Self {
        Self {
            ticks: TickCounter::new(),
            keys: KeyEvents::new(),
            leds: LedFlags::new(),
        }
    }

    /// Shared state with the counter seeded at `start`.
    pub const fn starting_at(start: Tick) -> Self {
        Self {
            ticks: TickCounter::starting_at(start),
            keys: KeyEvents::new(),
            leds: LedFlags::new(),
        }
    }
}

impl Default for TickShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything the hardware timer can call once per period.
pub trait TickHandler {
    fn on_tick(&mut self);
}

/// Tick handler wiring the debouncer, indicator and collaborators.
pub struct SystemTick<'a, B, L, R = (), D = ()> {
    shared: &'a TickShared,
    buttons: B,
    leds: L,
    rtc: R,
    display: Option<D>,
    debouncer: Debouncer,
    indicator: StatusIndicator,
}

impl<'a, B, L> SystemTick<'a, B, L>
where
    B: ButtonSampler,
    L: IndicatorOutput,
{
    /// Handler without RTC or remote-display collaborators.
    pub fn new(shared: &'a TickShared, config: &FirmwareConfig, buttons: B, leds: L) -> Self {
        SystemTick::with_collaborators(shared, config, buttons, leds, (), None)
    }
}

impl<'a, B, L, R, D> SystemTick<'a, B, L, R, D>
where
    B: ButtonSampler,
    L: IndicatorOutput,
    R: TickHook,
    D: DisplayAttention,
{
    /// `display` is only polled when the config enables remote display.
    pub fn with_collaborators(
        shared: &'a TickShared,
        config: &FirmwareConfig,
        buttons: B,
        leds: L,
        rtc: R,
        display: Option<D>,
    ) -> Self {
        let has_secondary = config.secondary_button && buttons.has_secondary();
        let indicator = StatusIndicator::new(leds.layout(), config.error_blink_ticks);
        Self {
            shared,
            buttons,
            leds,
            rtc,
            display: display.filter(|_| config.remote_display),
            debouncer: Debouncer::new(config.timing, has_secondary),
            indicator,
        }
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }

    pub fn rtc(&self) -> &R {
        &self.rtc
    }
}

impl<B, L, R, D> TickHandler for SystemTick<'_, B, L, R, D>
where
    B: ButtonSampler,
    L: IndicatorOutput,
    R: TickHook,
    D: DisplayAttention,
{
    fn on_tick(&mut self) {
        let shared = self.shared;

        let raw = self.buttons.sample();
        self.debouncer.sample(raw, shared.ticks.now(), &shared.keys);

        let now = shared.ticks.advance();

        let shown = self.indicator.tick(now, shared.leds.snapshot());
        self.leds.show(shown);

        self.debouncer.check_hold(now, &shared.keys);

        self.rtc.on_tick();

        if let Some(display) = self.display.as_mut() {
            if display.wants_attention() {
                shared.keys.raise(Keys::DISPLAY);
            }
        }
    }
}
