//! Fuzz target for the length-prefixed wire reader.
//!
//! Reads never panic and never return more than the declared limit.

#![no_main]

use hdseal_protocol::wire::Reader;
use hdseal_protocol::SignedPlaintext;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let limit = usize::from(data[0]);
    let mut reader = Reader::new(&data[1..]);
    while let Ok(field) = reader.read_variable_bytes(limit) {
        assert!(field.len() <= limit);
    }

    if let Ok(signed) = SignedPlaintext::parse(data) {
        assert!(signed.signature().len() <= 200);
        assert!(signed.signature().len() + signed.payload().len() + 4 <= data.len());
    }
});
