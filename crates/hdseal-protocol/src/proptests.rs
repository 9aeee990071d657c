//! Property-based tests for protocol components.
//!
//! These tests verify protocol invariants hold for arbitrary inputs:
//!
//! - Encryption followed by decryption returns the payload
//! - Any single-byte change to a blob is rejected, never mis-decrypted
//! - Parsers never panic on arbitrary input
//! - Length-prefixed fields read back what was written

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use hdseal_crypto::PrivateKey;
use hdseal_keys::{DerivationPath, ExtendedPrivateKey, KeyTree};

use crate::blob::{decode_text, encode_text, EncryptedBlob};
use crate::limits::MAX_SIGNATURE_LEN;
use crate::wire::{write_variable_bytes, Reader};
use crate::{
    Decrypter, Encrypter, ErrorKind, MessageDecrypter, SealConfig, SignedPlaintext, Verification,
};

const PATH: &str = "m/1'/2";

fn receiver() -> ExtendedPrivateKey {
    ExtendedPrivateKey::from_seed(&[0x5e; 32]).unwrap()
}

// ==================== Wire Codec Property Tests ====================

proptest! {
    /// Length-prefixed fields read back exactly what was written.
    #[test]
    fn variable_bytes_roundtrip(fields in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..300), 0..8)) {
        let mut buf = Vec::new();
        for field in &fields {
            write_variable_bytes(&mut buf, field).unwrap();
        }

        let mut reader = Reader::new(&buf);
        for field in &fields {
            prop_assert_eq!(reader.read_variable_bytes(usize::MAX).unwrap(), field.as_slice());
        }
        prop_assert!(reader.is_empty());
    }

    /// A read never returns more than its limit and never panics.
    #[test]
    fn variable_bytes_respects_limit(data in prop::collection::vec(any::<u8>(), 0..64), limit in 0usize..64) {
        let mut reader = Reader::new(&data);
        if let Ok(field) = reader.read_variable_bytes(limit) {
            prop_assert!(field.len() <= limit);
            prop_assert_eq!(reader.position(), field.len() + 2);
        }
    }
}

// ==================== Parser Property Tests ====================

proptest! {
    /// Blob parsing never panics, and accepted blobs are internally consistent.
    #[test]
    fn blob_parse_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(blob) = EncryptedBlob::parse(&data) {
            prop_assert!(blob.nonce().len() >= 12);
            prop_assert_eq!(
                blob.associated_data().len() + blob.nonce().len() + blob.ciphertext().len(),
                data.len()
            );
        }
    }

    /// Signed plaintext parsing never panics and honours the signature ceiling.
    #[test]
    fn signed_plaintext_parse_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        if let Ok(signed) = SignedPlaintext::parse(&data) {
            prop_assert!(signed.signature().len() <= MAX_SIGNATURE_LEN);
        }
    }

    /// Arbitrary text is rejected with a category, never a panic.
    #[test]
    fn decrypt_arbitrary_text(text in "[1-9A-HJ-NP-Za-km-z]{0,200}") {
        let root = receiver();
        let decrypter = Decrypter::new(&root, Verification::Unauthenticated);
        prop_assert!(decrypter.decrypt(&text).is_err());
    }
}

// ==================== Scheme Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Round trip for arbitrary payloads and nonce sizes.
    #[test]
    fn encrypt_decrypt_roundtrip(
        payload in prop::collection::vec(any::<u8>(), 0..2048),
        nonce_size in 12usize..=32,
        seed in any::<u64>(),
    ) {
        let root = receiver();
        let receiver_public = root.derive_public_key(&DerivationPath::parse(PATH).unwrap()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let sender = PrivateKey::generate(&mut rng);

        let config = SealConfig::builder().with_nonce_size(nonce_size).build();
        let text = Encrypter::new(&sender, receiver_public, PATH)
            .with_config(config)
            .unwrap()
            .encrypt_with_rng(&payload, &mut rng)
            .unwrap();

        let decrypter = Decrypter::new(&root, Verification::KnownSender(sender.public_key()));
        prop_assert_eq!(decrypter.decrypt(&text).unwrap(), payload);
    }

    /// Changing any single byte of the decoded blob fails with a format or
    /// crypto error.
    #[test]
    fn single_byte_tamper_detected(
        payload in prop::collection::vec(any::<u8>(), 0..128),
        index in any::<prop::sample::Index>(),
        delta in 1u8..=255,
    ) {
        let root = receiver();
        let receiver_public = root.derive_public_key(&DerivationPath::parse(PATH).unwrap()).unwrap();
        let sender = PrivateKey::generate(&mut ChaCha20Rng::seed_from_u64(1));
        let text = Encrypter::new(&sender, receiver_public, PATH)
            .encrypt_with_rng(&payload, &mut ChaCha20Rng::seed_from_u64(2))
            .unwrap();

        let mut bytes = decode_text(&text).unwrap();
        let i = index.index(bytes.len());
        bytes[i] = bytes[i].wrapping_add(delta);

        let decrypter = Decrypter::new(&root, Verification::KnownSender(sender.public_key()));
        let err = decrypter.decrypt(&encode_text(&bytes)).unwrap_err();
        prop_assert!(
            matches!(err.kind(), ErrorKind::Format | ErrorKind::Crypto | ErrorKind::Derivation),
            "unexpected {:?}",
            err
        );
    }
}
