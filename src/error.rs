//! Unified error type for the dualbus firmware.
//!
//! The tick path has no error taxonomy of its own: every input is a
//! hardware sample or a flag.  Errors only arise at the edges, when
//! configuration is loaded or validated, when peripherals are brought
//! up, and when the processor clock is reprogrammed.  All variants are
//! `Copy` so they can be logged and reported without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is out of range.
    Config(&'static str),
    /// A persisted configuration blob could not be decoded.
    Decode,
    /// Peripheral or timer initialisation failed.
    Init(&'static str),
    /// The clock driver rejected a profile change (platform return code).
    Clock(i32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Decode => write!(f, "config blob could not be decoded"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Clock(rc) => write!(f, "clock profile change failed (rc={rc})"),
        }
    }
}

impl core::error::Error for Error {}

impl From<postcard::Error> for Error {
    fn from(_: postcard::Error) -> Self {
        Self::Decode
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
