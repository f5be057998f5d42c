//! Fuzz target for interactive input handling.
//!
//! Every line typed at the prompt is interpreted against each question of the
//! built-in catalog and then validated. Neither step may panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_interpret_line
//! ```

#![no_main]

use cuiscope_app::interpret_line;
use cuiscope_domain::{Catalog, Input};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

fn catalog() -> &'static Option<Catalog> {
    static CATALOG: OnceLock<Option<Catalog>> = OnceLock::new();
    CATALOG.get_or_init(|| cuiscope_settings::builtin_catalog().ok())
}

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    let Some(catalog) = catalog() else {
        return;
    };

    for question in catalog.questions().questions() {
        if let Input::Value(raw) = interpret_line(question, line) {
            let _ = question.accept(&raw);
        }
    }
});
