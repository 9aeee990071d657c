//! Fuzz target for EncryptedBlob::parse.
//!
//! Parsing arbitrary bytes must never panic, and every accepted blob must
//! account for all of its input.

#![no_main]

use hdseal_protocol::blob::{associated_data, EncryptedBlob};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(blob) = EncryptedBlob::parse(data) {
        assert!(blob.nonce().len() >= 12);
        assert_eq!(blob.ephemeral_public().len(), 33);

        // Header, nonce and ciphertext tile the input exactly.
        let total = blob.associated_data().len() + blob.nonce().len() + blob.ciphertext().len();
        assert_eq!(total, data.len());

        // The associated data is exactly what an encrypter would rebuild.
        let ephemeral: [u8; 33] = blob.ephemeral_public().try_into().unwrap();
        let rebuilt = associated_data(&ephemeral, blob.path(), blob.nonce().len()).unwrap();
        assert_eq!(rebuilt, blob.associated_data());
    }
});
