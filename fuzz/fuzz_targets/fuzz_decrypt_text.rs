//! Fuzz target for the decrypter.
//!
//! Arbitrary text must be rejected with an error, never a panic. Without
//! the sender's cooperation no input can authenticate.

#![no_main]

use hdseal_keys::ExtendedPrivateKey;
use hdseal_protocol::{Decrypter, MessageDecrypter, Verification};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let root = match ExtendedPrivateKey::from_seed(&[0x5a; 32]) {
        Ok(root) => root,
        Err(_) => return,
    };
    let decrypter = Decrypter::new(&root, Verification::Unauthenticated);
    assert!(decrypter.decrypt(text).is_err());
});
