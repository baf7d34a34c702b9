//! GPIO / peripheral assignments for the dual-bus controller board.
//!
//! Single source of truth: the binary wires every driver from these
//! numbers rather than hard-coding pins.

// ---------------------------------------------------------------------------
// User buttons (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Primary ("next") button.
pub const BUTTON_NEXT_GPIO: i32 = 16;
/// Secondary ("prev") button.  Not fitted on the single-button variant.
pub const BUTTON_PREV_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Status LEDs (active-high)
// ---------------------------------------------------------------------------

pub const LED_BUSY_GPIO: i32 = 11;
/// Also the ERROR blink on dual-LED boards.
pub const LED_DIRTY_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

/// UART peripheral carrying log output.
pub const DIAG_UART_NUM: i32 = 0;
pub const DIAG_UART_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// Processor clock
// ---------------------------------------------------------------------------

/// Undivided CPU frequency; the serial-bus profile halves it.
pub const CPU_MAX_MHZ: u32 = 160;
