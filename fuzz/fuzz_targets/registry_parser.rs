#![no_main]

use libfuzzer_sys::fuzz_target;
use polylint::registry::CategoryRegistry;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed registries must be rejected with an error, never a panic
        if let Ok(registry) = CategoryRegistry::from_toml_str(input, Path::new("/src")) {
            for category in registry.categories() {
                let _ = registry.select(&[category.key.as_str()]);
            }
        }
    }
});
