//! Property-based tests for cryptographic primitives.
//!
//! These tests use proptest to verify cryptographic properties hold
//! for arbitrary inputs. They focus on:
//!
//! - Agreement properties (both sides derive the same key)
//! - Authentication properties (any modification is rejected)
//! - Padding properties (fixed width, value preserved)

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::aead::{self, MAX_NONCE_SIZE, MIN_NONCE_SIZE, TAG_SIZE};
use crate::cbc::{self, BLOCK_SIZE};
use crate::{
    generate_shared_secret_for_aead, padded_serialize_big_int, recover_compact,
    recover_shared_secret_for_aead, sign_compact, AeadKey, CbcKey, Hash256, PrivateKey,
};

// ==================== AEAD Property Tests ====================

proptest! {
    /// Sealing followed by opening returns the original plaintext for every
    /// supported nonce size.
    #[test]
    fn seal_open_roundtrip(
        key in prop::array::uniform32(any::<u8>()),
        nonce in prop::collection::vec(any::<u8>(), MIN_NONCE_SIZE..=MAX_NONCE_SIZE),
        plaintext in prop::collection::vec(any::<u8>(), 0..512),
        aad in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let key = AeadKey::from_bytes(&key).unwrap();
        let sealed = aead::seal(&key, &nonce, &plaintext, &aad).unwrap();
        prop_assert_eq!(sealed.len(), plaintext.len() + TAG_SIZE);
        prop_assert_eq!(aead::open(&key, &nonce, &sealed, &aad).unwrap(), plaintext);
    }

    /// Flipping any bit of the sealed output is detected.
    #[test]
    fn sealed_bit_flip_detected(
        plaintext in prop::collection::vec(any::<u8>(), 1..128),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let key = AeadKey::from_bytes(&[9u8; 32]).unwrap();
        let nonce = [3u8; 12];
        let mut sealed = aead::seal(&key, &nonce, &plaintext, b"aad").unwrap();
        let i = index.index(sealed.len());
        sealed[i] ^= 1 << bit;
        prop_assert!(aead::open(&key, &nonce, &sealed, b"aad").is_err());
    }

    /// Any change to the associated data is detected.
    #[test]
    fn aad_change_detected(
        aad in prop::collection::vec(any::<u8>(), 1..64),
        index in any::<prop::sample::Index>(),
    ) {
        let key = AeadKey::from_bytes(&[5u8; 32]).unwrap();
        let nonce = [1u8; 12];
        let sealed = aead::seal(&key, &nonce, b"message", &aad).unwrap();

        let mut other = aad.clone();
        let i = index.index(other.len());
        other[i] ^= 0x80;
        prop_assert!(aead::open(&key, &nonce, &sealed, &other).is_err());
    }
}

// ==================== Key Agreement Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Sender and receiver derive identical AEAD keys.
    #[test]
    fn agreement_is_symmetric(seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let receiver = PrivateKey::generate(&mut rng);

        let (ephemeral, sender_key) = generate_shared_secret_for_aead(&receiver.public_key(), &mut rng);
        let receiver_key = recover_shared_secret_for_aead(&receiver, &ephemeral.to_compressed()).unwrap();

        prop_assert_eq!(sender_key.as_bytes(), receiver_key.as_bytes());
    }

    /// Recovered signer equals the signing key for any message.
    #[test]
    fn sign_recover_roundtrip(seed in any::<u64>(), message in prop::collection::vec(any::<u8>(), 0..256)) {
        let key = PrivateKey::generate(&mut ChaCha20Rng::seed_from_u64(seed));
        let hash = Hash256::hash(&message);
        let signature = sign_compact(&key, &hash).unwrap();
        prop_assert_eq!(recover_compact(signature.as_bytes(), &hash).unwrap(), key.public_key());
    }

    /// Arbitrary 65-byte blobs never panic during recovery.
    #[test]
    fn recover_arbitrary_bytes_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..80)) {
        let _ = recover_compact(&bytes, &Hash256::hash(b"fuzz"));
    }
}

// ==================== Utility Property Tests ====================

proptest! {
    /// Padding produces exactly `width` bytes and preserves the integer value.
    #[test]
    fn padding_preserves_value(value in prop::collection::vec(any::<u8>(), 0..=32)) {
        let padded = padded_serialize_big_int(32, &value);
        prop_assert_eq!(padded.len(), 32);

        let strip = |b: &[u8]| b.iter().skip_while(|&&x| x == 0).copied().collect::<Vec<u8>>();
        prop_assert_eq!(strip(padded.as_slice()), strip(value.as_slice()));
    }

    /// CBC round trips block-aligned input and preserves its length.
    #[test]
    fn cbc_roundtrip(blocks in 0usize..8, fill in any::<u8>(), iv in prop::array::uniform16(any::<u8>())) {
        let key = CbcKey::from_bytes(&[0x5au8; 32]).unwrap();
        let plaintext = vec![fill; blocks * BLOCK_SIZE];
        let ciphertext = cbc::encrypt_no_padding(&key, &iv, &plaintext).unwrap();
        prop_assert_eq!(ciphertext.len(), plaintext.len());
        prop_assert_eq!(cbc::decrypt_no_padding(&key, &iv, &ciphertext).unwrap(), plaintext);
    }
}
