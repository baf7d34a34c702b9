//! Hardware drivers: button samplers, status LEDs and the tick timer.

pub mod button;
pub mod hw_timer;
pub mod status_led;
