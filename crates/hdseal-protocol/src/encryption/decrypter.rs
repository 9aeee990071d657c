//! Receiver side of the authenticated scheme.

use tracing::{debug, trace};
use zeroize::Zeroizing;

use hdseal_crypto::{aead, recover_compact, recover_shared_secret_for_aead};
use hdseal_keys::{DerivationPath, KeyTree};

use super::{MessageDecrypter, Verification};
use crate::blob::{decode_text, EncryptedBlob};
use crate::signed::{signature_hash, SignedPlaintext};
use crate::{ProtocolError, Result};

/// Decrypts blobs addressed to keys in one key tree.
pub struct Decrypter<'a, K: KeyTree + ?Sized> {
    keys: &'a K,
    verification: Verification,
}

impl<'a, K: KeyTree + ?Sized> Decrypter<'a, K> {
    /// Create a decrypter over the receiver's key tree.
    pub fn new(keys: &'a K, verification: Verification) -> Self {
        Self { keys, verification }
    }

    fn open(&self, text: &str) -> Result<Vec<u8>> {
        let bytes = decode_text(text)?;
        let blob = EncryptedBlob::parse(&bytes)?;

        let path = DerivationPath::parse(blob.path())?;
        let receiver = self.keys.derive_private_key(&path)?;
        let key = recover_shared_secret_for_aead(&receiver, blob.ephemeral_public())?;

        let opened = Zeroizing::new(aead::open(
            &key,
            blob.nonce(),
            blob.ciphertext(),
            blob.associated_data(),
        )?);
        let signed = SignedPlaintext::parse(&opened)?;

        let receiver_public = receiver.public_key();
        let hash = signature_hash(signed.payload(), &receiver_public);
        let signer = recover_compact(signed.signature(), &hash)
            .map_err(ProtocolError::SignatureNotRecoverable)?;

        let expected = match self.verification {
            Verification::FromSelf => Some(receiver_public),
            Verification::KnownSender(sender) => Some(sender),
            Verification::Unauthenticated => None,
        };
        if let Some(expected) = expected {
            if signer != expected {
                return Err(ProtocolError::SignerMismatch);
            }
        }

        trace!(
            path_len = blob.path().len(),
            nonce_len = blob.nonce().len(),
            payload_len = signed.payload().len(),
            "Decrypted payload"
        );

        Ok(signed.payload().to_vec())
    }
}

impl<K: KeyTree + ?Sized> MessageDecrypter for Decrypter<'_, K> {
    /// # Errors
    ///
    /// - Format: bad base58, wrong version, malformed lengths, short nonce,
    ///   malformed signed plaintext
    /// - Derivation: the path does not parse or cannot be derived
    /// - Crypto: invalid ephemeral key or AEAD authentication failure
    /// - Authentication: unrecoverable signature or unexpected signer
    fn decrypt(&self, text: &str) -> Result<Vec<u8>> {
        self.open(text).map_err(|err| {
            debug!(kind = ?err.kind(), error = %err, "Rejected encrypted blob");
            err
        })
    }
}

impl<K: KeyTree + ?Sized> std::fmt::Debug for Decrypter<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decrypter")
            .field("verification", &self.verification)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{associated_data, encode_text};
    use crate::encryption::{Encrypter, MessageEncrypter};
    use crate::ErrorKind;
    use hdseal_crypto::{PrivateKey, PublicKey};
    use hdseal_keys::ExtendedPrivateKey;

    const PATH: &str = "m/schema:1'/recovery:1'/invoices:4";

    fn setup() -> (ExtendedPrivateKey, ExtendedPrivateKey, PublicKey) {
        let sender = ExtendedPrivateKey::from_seed(&[0x11; 32]).unwrap();
        let receiver = ExtendedPrivateKey::from_seed(&[0x22; 32]).unwrap();
        let receiver_public = receiver
            .derive_public_key(&DerivationPath::parse(PATH).unwrap())
            .unwrap();
        (sender, receiver, receiver_public)
    }

    #[test]
    fn test_known_sender_roundtrip() {
        let (sender, receiver, receiver_public) = setup();
        let blob = Encrypter::new(sender.private_key(), receiver_public, PATH)
            .encrypt(b"hello receiver")
            .unwrap();

        let decrypter = Decrypter::new(&receiver, Verification::KnownSender(sender.public_key()));
        assert_eq!(decrypter.decrypt(&blob).unwrap(), b"hello receiver");
    }

    #[test]
    fn test_wrong_sender_rejected() {
        let (sender, receiver, receiver_public) = setup();
        let blob = Encrypter::new(sender.private_key(), receiver_public, PATH)
            .encrypt(b"hi")
            .unwrap();

        let other = ExtendedPrivateKey::from_seed(&[0x33; 32]).unwrap();
        let decrypter = Decrypter::new(&receiver, Verification::KnownSender(other.public_key()));
        let err = decrypter.decrypt(&blob).unwrap_err();
        assert_eq!(err, ProtocolError::SignerMismatch);
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_unauthenticated_accepts_any_signer() {
        let (sender, receiver, receiver_public) = setup();
        let blob = Encrypter::new(sender.private_key(), receiver_public, PATH)
            .encrypt(b"anon")
            .unwrap();

        let decrypter = Decrypter::new(&receiver, Verification::Unauthenticated);
        assert_eq!(decrypter.decrypt(&blob).unwrap(), b"anon");
    }

    #[test]
    fn test_from_self_requires_receiver_signature() {
        let (sender, receiver, receiver_public) = setup();
        let blob = Encrypter::new(sender.private_key(), receiver_public, PATH)
            .encrypt(b"not from me")
            .unwrap();

        let decrypter = Decrypter::new(&receiver, Verification::FromSelf);
        assert_eq!(decrypter.decrypt(&blob), Err(ProtocolError::SignerMismatch));
    }

    #[test]
    fn test_wrong_receiver_fails_aead() {
        let (sender, _, receiver_public) = setup();
        let blob = Encrypter::new(sender.private_key(), receiver_public, PATH)
            .encrypt(b"x")
            .unwrap();

        let stranger = ExtendedPrivateKey::from_seed(&[0x44; 32]).unwrap();
        let decrypter = Decrypter::new(&stranger, Verification::Unauthenticated);
        assert_eq!(decrypter.decrypt(&blob).unwrap_err().kind(), ErrorKind::Crypto);
    }

    #[test]
    fn test_unparseable_path_is_derivation_error() {
        let (sender, receiver, _) = setup();
        let blob = Encrypter::new(sender.private_key(), receiver.public_key(), "not-a-path")
            .encrypt(b"x")
            .unwrap();

        let decrypter = Decrypter::new(&receiver, Verification::Unauthenticated);
        assert_eq!(decrypter.decrypt(&blob).unwrap_err().kind(), ErrorKind::Derivation);
    }

    #[test]
    fn test_garbage_text() {
        let (_, receiver, _) = setup();
        let decrypter = Decrypter::new(&receiver, Verification::Unauthenticated);
        let texts = [
            String::new(),
            "0OIl".to_string(),
            "1111".to_string(),
            encode_text(&[1, 2, 3]),
        ];
        for text in &texts {
            assert_eq!(
                decrypter.decrypt(text).unwrap_err().kind(),
                ErrorKind::Format,
                "text {:?}",
                text
            );
        }
    }

    /// Seal an arbitrary signed plaintext under a valid header addressed to
    /// the receiver at `PATH`.
    fn seal_raw(receiver_public: &PublicKey, signed: &[u8]) -> String {
        use rand::SeedableRng;
        use rand_chacha::ChaCha20Rng;

        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let (ephemeral, key) =
            hdseal_crypto::generate_shared_secret_for_aead(receiver_public, &mut rng);
        let nonce = [9u8; 12];
        let mut blob = associated_data(&ephemeral.to_compressed(), PATH, nonce.len()).unwrap();
        let sealed = aead::seal(&key, &nonce, signed, &blob).unwrap();
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);
        encode_text(&blob)
    }

    #[test]
    fn test_unrecoverable_signature_rejected_even_unauthenticated() {
        let (_, receiver, receiver_public) = setup();
        let signed = SignedPlaintext::encode(&[0u8; 65], b"payload").unwrap();
        let blob = seal_raw(&receiver_public, &signed);

        let decrypter = Decrypter::new(&receiver, Verification::Unauthenticated);
        let err = decrypter.decrypt(&blob).unwrap_err();
        assert!(matches!(err, ProtocolError::SignatureNotRecoverable(_)));
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_malformed_signed_plaintext_is_format_error() {
        let (_, receiver, receiver_public) = setup();
        let blob = seal_raw(&receiver_public, &[0, 201]);

        let decrypter = Decrypter::new(&receiver, Verification::Unauthenticated);
        assert_eq!(decrypter.decrypt(&blob).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_payload_only_signature_does_not_verify() {
        // A signature over the bare payload, without the receiver key bound
        // in, recovers some other key and so fails authentication.
        let (sender, receiver, receiver_public) = setup();
        let payload = b"payload";
        let bare = hdseal_crypto::Hash256::hash(payload);
        let signature = hdseal_crypto::sign_compact(sender.private_key(), &bare).unwrap();
        let signed = SignedPlaintext::encode(signature.as_bytes(), payload).unwrap();
        let blob = seal_raw(&receiver_public, &signed);

        let decrypter = Decrypter::new(&receiver, Verification::KnownSender(sender.public_key()));
        assert_eq!(decrypter.decrypt(&blob), Err(ProtocolError::SignerMismatch));
    }

    #[test]
    fn test_bare_private_key_tree() {
        struct SingleKey(PrivateKey);

        impl KeyTree for SingleKey {
            fn derive_private_key(&self, _: &DerivationPath) -> hdseal_keys::Result<PrivateKey> {
                Ok(PrivateKey::from_bytes(self.0.to_bytes().as_slice())?)
            }
        }

        let (sender, receiver, _) = setup();
        let secret = receiver.private_key().to_bytes();
        let key = SingleKey(PrivateKey::from_bytes(secret.as_slice()).unwrap());
        let blob = Encrypter::new(sender.private_key(), receiver.public_key(), "m")
            .encrypt(b"single")
            .unwrap();

        let decrypter = Decrypter::new(&key, Verification::FromSelf);
        assert_eq!(decrypter.decrypt(&blob), Err(ProtocolError::SignerMismatch));
        let decrypter = Decrypter::new(&key, Verification::KnownSender(sender.public_key()));
        assert_eq!(decrypter.decrypt(&blob).unwrap(), b"single");
    }
}
