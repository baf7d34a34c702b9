//! Parked bus front end.
//!
//! Holds a bus in the released state and idles its main loop for a
//! fixed slice.  Used for board bring-up before a protocol engine is
//! linked in, and as the front end a board reports when its bus is
//! unpopulated.

use std::time::Duration;

use log::info;

use crate::app::ports::BusFrontEnd;
use crate::bus::BusKind;

pub struct ParkedBus {
    kind: BusKind,
    idle: Duration,
    sleeping: bool,
    passes: u32,
}

impl ParkedBus {
    pub fn new(kind: BusKind, idle: Duration) -> Self {
        Self {
            kind,
            idle,
            sleeping: false,
            passes: 0,
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Main-loop passes so far.
    pub fn passes(&self) -> u32 {
        self.passes
    }
}

impl BusFrontEnd for ParkedBus {
    fn kind(&self) -> BusKind {
        self.kind
    }

    fn interface_init(&mut self) {
        info!("{} bus: lines released", self.kind.name());
    }

    fn init(&mut self) {
        self.passes = 0;
        info!("{} bus: parked", self.kind.name());
    }

    fn main_loop(&mut self) {
        self.passes = self.passes.wrapping_add(1);
        if !self.idle.is_zero() {
            std::thread::sleep(self.idle);
        }
    }

    fn set_sleep(&mut self, sleep: bool) {
        self.sleeping = sleep;
        info!(
            "{} bus: {}",
            self.kind.name(),
            if sleep { "sleeping" } else { "awake" }
        );
    }
}
