//! Dualbus firmware library.
//!
//! Exposes the pure-logic modules (tick counter, debouncer, status
//! indicator, bus selection) for integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod bus;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod indicator;
pub mod system_tick;
pub mod tick;

pub mod adapters;
pub mod drivers;
pub mod pins;
