//! Fuzz target: `FirmwareConfig::from_bytes`
//!
//! Feeds arbitrary NVS blobs to the config decoder.  Anything it accepts
//! must pass validation and survive a re-encode into the fixed-size
//! storage buffer.
//!
//! cargo fuzz run fuzz_config_decode

#![no_main]

use dualbus::config::{CONFIG_BLOB_MAX, FirmwareConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = FirmwareConfig::from_bytes(data) else {
        return;
    };
    assert!(config.validate().is_ok(), "decoded config must be valid");

    let mut buf = [0u8; CONFIG_BLOB_MAX];
    let encoded = config.to_bytes(&mut buf).expect("valid config must fit");
    let again = FirmwareConfig::from_bytes(encoded).expect("re-decode");
    assert_eq!(config, again);
});
