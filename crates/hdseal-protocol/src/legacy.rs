//! Legacy public-key cipher.
//!
//! ECDH with a fresh ephemeral key, then AES-256-CBC without padding. The
//! raw shared secret is used directly as the key and the IV is the last 16
//! bytes of the encoded ephemeral key.
//!
//! ## Security Notes
//!
//! - No authentication: a modified ciphertext decrypts to garbage, it does
//!   not fail. Success is not proof of integrity
//! - The IV is derived, not random
//! - Kept only to read ciphertexts issued before the authenticated scheme.
//!   New data should use [`crate::encryption`]
//!
//! This module deliberately does not implement the
//! [`MessageEncrypter`](crate::encryption::MessageEncrypter) or
//! [`MessageDecrypter`](crate::encryption::MessageDecrypter) traits.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::warn;

use hdseal_crypto::cbc::{self, BLOCK_SIZE};
use hdseal_crypto::{generate_shared_secret, recover_shared_secret, PrivateKey, PublicKey};

use crate::Result;

/// Output of [`encrypt_with_public_key`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyCiphertext {
    /// Ephemeral public key the receiver needs for ECDH.
    pub ephemeral_public: PublicKey,
    /// CBC ciphertext, same length as the plaintext.
    pub ciphertext: Vec<u8>,
}

fn iv_from_ephemeral(encoded: &[u8]) -> &[u8] {
    &encoded[encoded.len().saturating_sub(BLOCK_SIZE)..]
}

/// Encrypt block-aligned `plaintext` to `receiver`.
///
/// # Errors
///
/// Returns `ProtocolError::Crypto` if `plaintext` is not a multiple of 16
/// bytes long.
pub fn encrypt_with_public_key(receiver: &PublicKey, plaintext: &[u8]) -> Result<LegacyCiphertext> {
    encrypt_with_public_key_rng(receiver, plaintext, &mut OsRng)
}

/// [`encrypt_with_public_key`] drawing the ephemeral key from `rng`.
pub fn encrypt_with_public_key_rng<R: CryptoRng + RngCore>(
    receiver: &PublicKey,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<LegacyCiphertext> {
    let (ephemeral_public, secret) = generate_shared_secret(receiver, rng);
    let encoded = ephemeral_public.to_compressed();

    let key = secret.legacy_key()?;
    let ciphertext = cbc::encrypt_no_padding(&key, iv_from_ephemeral(&encoded), plaintext)?;

    warn!(len = plaintext.len(), "Encrypted with the unauthenticated legacy cipher");

    Ok(LegacyCiphertext {
        ephemeral_public,
        ciphertext,
    })
}

/// Decrypt a ciphertext produced by [`encrypt_with_public_key`].
///
/// `ephemeral_public` is the encoded key exactly as transmitted; its last
/// 16 bytes are the IV.
///
/// # Errors
///
/// Returns `ProtocolError::Crypto` if the ephemeral key is not a valid point
/// or the ciphertext is not block aligned. Tampering is not detected.
pub fn decrypt_with_private_key(
    receiver: &PrivateKey,
    ephemeral_public: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let secret = recover_shared_secret(receiver, ephemeral_public)?;
    let key = secret.legacy_key()?;
    Ok(cbc::decrypt_no_padding(
        &key,
        iv_from_ephemeral(ephemeral_public),
        ciphertext,
    )?)
}
