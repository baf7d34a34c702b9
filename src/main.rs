//! Dualbus firmware entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                 esp_timer @ HZ (timer task)                    │
//! │   SystemTick: GpioButtons → Debouncer → KeyEvents              │
//! │               LedFlags → StatusIndicator → StatusLed           │
//! │  ──────────────── TickShared (atomics) ─────────────────────   │
//! │                      Foreground loop                           │
//! │   BusController: ClockSwitcher → ActiveBus.main_loop()         │
//! │                  KeyEvents.take() → service_keys() (poll)      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use log::{info, warn};

use dualbus::adapters::clock::SocClock;
use dualbus::adapters::diag::ConsoleDiagnostics;
use dualbus::adapters::log_sink::LogEventSink;
use dualbus::adapters::parked_bus::ParkedBus;
use dualbus::app::service::BusController;
use dualbus::bus::{ActiveBus, BusKind, ClockSwitcher};
use dualbus::config::{CONFIG_BLOB_MAX, FirmwareConfig};
use dualbus::drivers::button::GpioButtons;
use dualbus::drivers::hw_timer::TickTimer;
use dualbus::drivers::status_led::StatusLed;
use dualbus::pins;
use dualbus::system_tick::{SystemTick, TickShared};

/// Tick counter, key events and LED conditions shared with the timer.
static SHARED: TickShared = TickShared::new();

const NVS_NAMESPACE: &str = "dualbus";
const NVS_CONFIG_KEY: &str = "config";

/// Main-loop slice for a parked bus.
const PARKED_IDLE: Duration = Duration::from_millis(10);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Dualbus v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = EspNvs::new(EspDefaultNvsPartition::take()?, NVS_NAMESPACE, true)?;
    let config = load_config(&nvs);
    info!(
        "Config: {} bus, {} Hz tick, clock switching {}",
        config.active_bus.name(),
        config.tick_hz,
        if config.bus_clock_switching { "on" } else { "off" }
    );

    // ── 3. Buttons and status LEDs ────────────────────────────
    // SAFETY: pin numbers come from `pins` and are claimed nowhere else.
    let mut next = PinDriver::input(unsafe { AnyIOPin::new(pins::BUTTON_NEXT_GPIO) })?;
    next.set_pull(Pull::Up)?;
    let prev = if config.secondary_button {
        // SAFETY: as above.
        let mut prev = PinDriver::input(unsafe { AnyIOPin::new(pins::BUTTON_PREV_GPIO) })?;
        prev.set_pull(Pull::Up)?;
        Some(prev)
    } else {
        None
    };
    let buttons = GpioButtons::new(next, prev);

    // SAFETY: as above.
    let busy = PinDriver::output(unsafe { AnyOutputPin::new(pins::LED_BUSY_GPIO) })?;
    let leds = match config.indicator {
        dualbus::indicator::IndicatorLayout::Single => StatusLed::single(busy),
        dualbus::indicator::IndicatorLayout::Dual => {
            // SAFETY: as above.
            let dirty = PinDriver::output(unsafe { AnyOutputPin::new(pins::LED_DIRTY_GPIO) })?;
            StatusLed::dual(busy, dirty)
        }
    };

    // ── 4. System tick ────────────────────────────────────────
    let handler = SystemTick::new(&SHARED, &config, buttons, leds);
    let timer = TickTimer::start(handler, config.tick_hz)?;
    let clock = SocClock::new(timer, config.tick_hz);

    // ── 5. Bus selection (fixed for the rest of the run) ──────
    let bus = ActiveBus::select(
        config.active_bus,
        || ParkedBus::new(BusKind::Serial, PARKED_IDLE),
        || ParkedBus::new(BusKind::Parallel, PARKED_IDLE),
    );
    // The clock adapter owns the tick timer; keep it alive either way.
    let (timing, _fixed_clock) = if config.bus_clock_switching {
        (Some(ClockSwitcher::new(clock, ConsoleDiagnostics::<128>::new())), None)
    } else {
        (None, Some(clock))
    };

    let mut sink = LogEventSink::new();
    let mut controller = BusController::start(bus, timing, &mut sink);

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        let _menu_keys = controller.poll(&SHARED.keys, &mut sink);
    }
}

fn load_config(nvs: &EspNvs<NvsDefault>) -> FirmwareConfig {
    let mut buf = [0u8; CONFIG_BLOB_MAX];
    match nvs.get_raw(NVS_CONFIG_KEY, &mut buf) {
        Ok(Some(bytes)) => match FirmwareConfig::from_bytes(bytes) {
            Ok(config) => {
                info!("Config loaded from NVS");
                config
            }
            Err(e) => {
                warn!("Stored config rejected ({}), using defaults", e);
                FirmwareConfig::default()
            }
        },
        Ok(None) => {
            info!("No stored config, using defaults");
            FirmwareConfig::default()
        }
        Err(e) => {
            warn!("NVS config read failed ({}), using defaults", e);
            FirmwareConfig::default()
        }
    }
}
