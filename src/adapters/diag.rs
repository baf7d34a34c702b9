//! Diagnostic console adapter.
//!
//! Line-buffers diagnostic text in a fixed-capacity `heapless::String`
//! and pushes it out through the logger.  The clock switcher writes its
//! change notice here before reprogramming the divisor.
//! [`DiagnosticPort::flush`] empties the buffer and, on the device,
//! blocks until the console UART FIFO has drained, so a clock change
//! cannot garble bytes in flight.

use core::fmt;

use log::info;

use crate::app::ports::DiagnosticPort;

#[cfg(target_os = "espidf")]
use std::io::Write as _;

// ROM routine; resolved by the ESP-IDF ROM linker script.
#[cfg(target_os = "espidf")]
unsafe extern "C" {
    fn esp_rom_uart_tx_wait_idle(uart_no: u8);
}

pub struct ConsoleDiagnostics<const N: usize> {
    line: heapless::String<N>,
    flushes: u32,
}

impl<const N: usize> ConsoleDiagnostics<N> {
    pub fn new() -> Self {
        Self {
            line: heapless::String::new(),
            flushes: 0,
        }
    }

    /// Bytes buffered but not yet emitted.
    pub fn pending(&self) -> usize {
        self.line.len()
    }

    /// Number of completed flushes.
    pub fn flushes(&self) -> u32 {
        self.flushes
    }

    fn emit_line(&mut self) {
        if !self.line.is_empty() {
            info!("{}", self.line.trim_end());
            self.line.clear();
        }
    }

    #[cfg(target_os = "espidf")]
    fn drain_uart(&self) {
        // The console UART has no driver installed, so wait on the
        // hardware FIFO through the ROM helper instead.
        let _ = std::io::stdout().flush();
        // SAFETY: ROM routine, polls the TX FIFO status of a valid port.
        unsafe { esp_rom_uart_tx_wait_idle(crate::pins::DIAG_UART_NUM as u8) };
    }

    #[cfg(not(target_os = "espidf"))]
    fn drain_uart(&self) {}
}

impl<const N: usize> Default for ConsoleDiagnostics<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for ConsoleDiagnostics<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.line.push(ch).is_err() {
                // Full: emit what we have and keep going.
                self.emit_line();
                let _ = self.line.push(ch);
            }
            if ch == '\n' {
                self.emit_line();
            }
        }
        Ok(())
    }
}

impl<const N: usize> DiagnosticPort for ConsoleDiagnostics<N> {
    fn flush(&mut self) {
        self.emit_line();
        self.drain_uart();
        self.flushes += 1;
    }
}
