#![no_main]

use libfuzzer_sys::fuzz_target;
use polylint::changed::parse_changed_paths;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let stdout = String::from_utf8_lossy(data);
    for path in parse_changed_paths(&stdout, Path::new("/src")) {
        assert!(path.is_absolute());
    }
});
