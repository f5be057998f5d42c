//! Fuzz target for `cuiscope.toml` parsing and profile resolution.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = cuiscope_app::resolve_settings(text, cuiscope_settings::Overrides::default());
    }
});
