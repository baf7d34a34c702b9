//! Adapters: concrete implementations of the port traits.
//!
//! Each adapter targets `target_os = "espidf"` for production and has a
//! simulation twin for host builds.

pub mod clock;
pub mod diag;
pub mod log_sink;
pub mod parked_bus;
