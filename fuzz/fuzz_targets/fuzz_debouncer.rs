//! Fuzz target: `Debouncer`
//!
//! Each input byte is one tick's raw button sample (low two bits).  The
//! first four bytes seed the tick counter so runs cross the wrap point.
//! Asserts that a tick never classifies more than one key and that a
//! board without a secondary button never reports PREV or HOME.
//!
//! cargo fuzz run fuzz_debouncer

#![no_main]

use dualbus::config::DebounceTiming;
use dualbus::debounce::{Debouncer, RawButtons};
use dualbus::events::{KeyEvents, Keys};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((seed, samples)) = data.split_first_chunk::<4>() else {
        return;
    };
    let start = u32::from_le_bytes(*seed);

    for has_secondary in [true, false] {
        let mut debouncer = Debouncer::new(DebounceTiming::default(), has_secondary);
        let keys = KeyEvents::new();
        let mut now = start;

        for &byte in samples {
            debouncer.sample(RawButtons::from_bits(byte & 0b11), now, &keys);
            now = now.wrapping_add(1);
            debouncer.check_hold(now, &keys);

            let taken = keys.take();
            assert!(taken.bits().count_ones() <= 1, "{:?}", taken);
            if !has_secondary {
                assert!(!taken.intersects(Keys::PREV | Keys::HOME), "{:?}", taken);
            }
        }
    }
});
