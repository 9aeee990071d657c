//! Fuzz target for DerivationPath parsing.
//!
//! Parsing never panics, and anything accepted survives a display round
//! trip.

#![no_main]

use hdseal_keys::DerivationPath;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(path) = DerivationPath::parse(text) {
        let reparsed = DerivationPath::parse(&path.to_string()).unwrap();
        assert_eq!(path, reparsed);
        assert!(path.depth() <= 255);
    }
});
