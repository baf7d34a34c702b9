//! Application core: foreground control flow, zero I/O.
//!
//! The bus controller sequences the selected front end through its
//! lifecycle and services the key events raised by the tick handler.
//! All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
