//! Fuzz target for catalog parsing and validation.
//!
//! Goal: Loading a catalog should **never panic** on any input.
//! Malformed TOML and inconsistent catalogs must come back as errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_catalog_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Catalogs are TOML, so only UTF-8 is interesting
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = cuiscope_settings::load_catalog_str(text);
    }
});
