//! AES-256-GCM authenticated encryption with variable nonce sizes.
//!
//! Senders normally use 12-byte nonces, but receivers accept any nonce length
//! between [`MIN_NONCE_SIZE`] and [`MAX_NONCE_SIZE`] so ciphertexts produced
//! with longer nonces remain decryptable. Non-96-bit nonces go through the
//! GHASH-based counter derivation defined by GCM.
//!
//! ## Interop Limit
//!
//! GCM itself places no upper bound on the nonce length, but `aes-gcm` fixes
//! the nonce size at the type level, so only 12..=32 bytes are instantiated.
//! A ciphertext made elsewhere with a longer nonce is rejected with
//! [`CryptoError::UnsupportedNonceLength`] rather than opened.
//!
//! ## Security Notes
//!
//! - Keys are zeroized on drop
//! - NEVER reuse a nonce with the same key

use aes_gcm::aead::consts::{
    U12, U13, U14, U15, U16, U17, U18, U19, U20, U21, U22, U23, U24, U25, U26, U27, U28, U29,
    U30, U31, U32,
};
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{CryptoError, Result};

/// Size of the AEAD key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Smallest accepted nonce. Shorter nonces are never produced or accepted.
pub const MIN_NONCE_SIZE: usize = 12;

/// Largest nonce the cipher is instantiated for.
///
/// An interop limit of the type-level nonce sizes, not a property of GCM.
pub const MAX_NONCE_SIZE: usize = 32;

/// Default nonce size for new encryptions.
pub const DEFAULT_NONCE_SIZE: usize = 12;

/// Size of the authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// A 256-bit AES-GCM key.
///
/// The key is automatically zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AeadKey {
    bytes: [u8; KEY_SIZE],
}

impl AeadKey {
    /// Create a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self { bytes })
    }

    pub(crate) fn from_array(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Get the key as a byte array.
    ///
    /// # Security
    ///
    /// Be careful with this - avoid logging or persisting the returned bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for AeadKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AeadKey([REDACTED])")
    }
}

/// Instantiate `AesGcm<Aes256, N>` for the runtime nonce length and evaluate
/// `$body` with the cipher bound to `$cipher`.
macro_rules! with_gcm {
    (@run $size:ty, $key:expr, $cipher:ident, $body:expr) => {{
        let $cipher = AesGcm::<Aes256, $size>::new(GenericArray::from_slice($key.as_bytes()));
        $body
    }};
    ($key:expr, $nonce_len:expr, |$cipher:ident| $body:expr) => {
        match $nonce_len {
            12 => with_gcm!(@run U12, $key, $cipher, $body),
            13 => with_gcm!(@run U13, $key, $cipher, $body),
            14 => with_gcm!(@run U14, $key, $cipher, $body),
            15 => with_gcm!(@run U15, $key, $cipher, $body),
            16 => with_gcm!(@run U16, $key, $cipher, $body),
            17 => with_gcm!(@run U17, $key, $cipher, $body),
            18 => with_gcm!(@run U18, $key, $cipher, $body),
            19 => with_gcm!(@run U19, $key, $cipher, $body),
            20 => with_gcm!(@run U20, $key, $cipher, $body),
            21 => with_gcm!(@run U21, $key, $cipher, $body),
            22 => with_gcm!(@run U22, $key, $cipher, $body),
            23 => with_gcm!(@run U23, $key, $cipher, $body),
            24 => with_gcm!(@run U24, $key, $cipher, $body),
            25 => with_gcm!(@run U25, $key, $cipher, $body),
            26 => with_gcm!(@run U26, $key, $cipher, $body),
            27 => with_gcm!(@run U27, $key, $cipher, $body),
            28 => with_gcm!(@run U28, $key, $cipher, $body),
            29 => with_gcm!(@run U29, $key, $cipher, $body),
            30 => with_gcm!(@run U30, $key, $cipher, $body),
            31 => with_gcm!(@run U31, $key, $cipher, $body),
            32 => with_gcm!(@run U32, $key, $cipher, $body),
            other => Err(CryptoError::UnsupportedNonceLength {
                min: MIN_NONCE_SIZE,
                max: MAX_NONCE_SIZE,
                actual: other,
            }),
        }
    };
}

/// Encrypt `plaintext` and authenticate `aad`, returning `ciphertext ‖ tag`.
///
/// # Errors
///
/// Returns `CryptoError::UnsupportedNonceLength` for nonces outside
/// 12..=32 bytes and `CryptoError::Encryption` if the cipher refuses the input.
pub fn seal(key: &AeadKey, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let payload = Payload {
        msg: plaintext,
        aad,
    };
    with_gcm!(key, nonce.len(), |cipher| cipher
        .encrypt(GenericArray::from_slice(nonce), payload)
        .map_err(|_| CryptoError::Encryption("AES-256-GCM encryption failed".into())))
}

/// Decrypt `ciphertext ‖ tag` and verify it together with `aad`.
///
/// # Errors
///
/// Returns `CryptoError::Decryption` if authentication fails for any reason
/// (wrong key, wrong nonce, modified ciphertext or associated data).
pub fn open(key: &AeadKey, nonce: &[u8], ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let payload = Payload {
        msg: ciphertext,
        aad,
    };
    with_gcm!(key, nonce.len(), |cipher| cipher
        .decrypt(GenericArray::from_slice(nonce), payload)
        .map_err(|_| CryptoError::Decryption))
}
