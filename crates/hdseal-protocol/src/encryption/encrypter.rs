//! Sender side of the authenticated scheme.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use hdseal_crypto::{
    aead, generate_shared_secret_for_aead, random_bytes_from, sign_compact, PrivateKey, PublicKey,
};
use hdseal_keys::ExtendedPublicKey;

use super::MessageEncrypter;
use crate::blob::{associated_data, encode_text};
use crate::config::{ConfigError, SealConfig};
use crate::limits::{MAX_DERIVATION_PATH_LEN, MAX_VARIABLE_LEN};
use crate::signed::{signature_hash, SignedPlaintext};
use crate::{ProtocolError, Result};

/// Encrypt `payload` from `sender` to `receiver` at `receiver_path`.
///
/// Shorthand for [`Encrypter::new`] followed by
/// [`MessageEncrypter::encrypt`] with the default configuration.
///
/// # Errors
///
/// See [`Encrypter::encrypt_with_rng`].
pub fn encrypt(
    payload: &[u8],
    sender: &PrivateKey,
    receiver: &PublicKey,
    receiver_path: &str,
) -> Result<String> {
    Encrypter::new(sender, *receiver, receiver_path).encrypt(payload)
}

/// Encrypts payloads from one sender to one receiver key.
///
/// `receiver` must be the public key the receiver derives at
/// `receiver_path`; the path travels in the clear so the receiver knows
/// which key to use.
pub struct Encrypter<'a> {
    sender: &'a PrivateKey,
    receiver: PublicKey,
    receiver_path: String,
    config: SealConfig,
}

impl<'a> Encrypter<'a> {
    /// Create an encrypter with the default configuration.
    pub fn new(
        sender: &'a PrivateKey,
        receiver: PublicKey,
        receiver_path: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            receiver,
            receiver_path: receiver_path.into(),
            config: SealConfig::default(),
        }
    }

    /// Create an encrypter addressed to the key and path of an extended
    /// public key.
    pub fn for_extended(sender: &'a PrivateKey, receiver: &ExtendedPublicKey) -> Self {
        Self::new(sender, receiver.public_key(), receiver.path().to_string())
    }

    /// Replace the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `config` does not validate.
    pub fn with_config(mut self, config: SealConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The receiver path written into every blob.
    pub fn receiver_path(&self) -> &str {
        &self.receiver_path
    }

    /// Encrypt `payload` drawing the ephemeral key and nonce from `rng`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::FieldTooLong` if the payload exceeds 65535 bytes or
    ///   the path exceeds 1000 bytes; checked before any cryptography
    /// - `ProtocolError::Signing` if the signature cannot be produced
    /// - `ProtocolError::Crypto` if sealing fails
    pub fn encrypt_with_rng<R: CryptoRng + RngCore>(
        &self,
        payload: &[u8],
        rng: &mut R,
    ) -> Result<String> {
        if payload.len() > MAX_VARIABLE_LEN {
            return Err(ProtocolError::FieldTooLong {
                field: "payload",
                len: payload.len(),
                max: MAX_VARIABLE_LEN,
            });
        }
        if self.receiver_path.len() > MAX_DERIVATION_PATH_LEN {
            return Err(ProtocolError::FieldTooLong {
                field: "derivation path",
                len: self.receiver_path.len(),
                max: MAX_DERIVATION_PATH_LEN,
            });
        }

        let hash = signature_hash(payload, &self.receiver);
        let signature = sign_compact(self.sender, &hash).map_err(ProtocolError::Signing)?;
        let plaintext = SignedPlaintext::encode(signature.as_bytes(), payload)?;

        let (ephemeral_public, key) = generate_shared_secret_for_aead(&self.receiver, rng);
        let nonce = random_bytes_from(rng, self.config.nonce_size);

        let mut blob = associated_data(
            &ephemeral_public.to_compressed(),
            &self.receiver_path,
            nonce.len(),
        )?;
        let sealed = aead::seal(&key, &nonce, &plaintext, &blob)?;

        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);

        debug!(
            payload_len = payload.len(),
            path_len = self.receiver_path.len(),
            nonce_len = nonce.len(),
            blob_len = blob.len(),
            "Encrypted payload"
        );

        Ok(encode_text(&blob))
    }
}

impl MessageEncrypter for Encrypter<'_> {
    fn encrypt(&self, payload: &[u8]) -> Result<String> {
        self.encrypt_with_rng(payload, &mut OsRng)
    }
}

impl std::fmt::Debug for Encrypter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encrypter")
            .field("receiver", &self.receiver)
            .field("receiver_path", &self.receiver_path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
