//! AES-256-CBC without padding.
//!
//! Unauthenticated. Only the legacy cipher path uses this, and only so that
//! previously issued ciphertexts stay readable. Callers pad the plaintext to
//! a whole number of blocks themselves.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{CryptoError, Result};

/// AES block size in bytes; also the IV size.
pub const BLOCK_SIZE: usize = 16;

/// AES-256 key size in bytes.
pub const KEY_SIZE: usize = 32;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// A 256-bit AES-CBC key. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CbcKey {
    bytes: [u8; KEY_SIZE],
}

impl CbcKey {
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

    /// Get the key as a byte array.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for CbcKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CbcKey([REDACTED])")
    }
}

fn check_lengths(iv: &[u8], data: &[u8]) -> Result<()> {
    if iv.len() != BLOCK_SIZE {
        return Err(CryptoError::InvalidKeyLength {
            expected: BLOCK_SIZE,
            actual: iv.len(),
        });
    }
    if data.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidBlockLength {
            block_size: BLOCK_SIZE,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Encrypt block-aligned `plaintext` with AES-256-CBC.
///
/// # Errors
///
/// Returns `CryptoError::InvalidBlockLength` if `plaintext` is not a multiple
/// of 16 bytes, or `CryptoError::InvalidKeyLength` if `iv` is not 16 bytes.
pub fn encrypt_no_padding(key: &CbcKey, iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    check_lengths(iv, plaintext)?;
    let encryptor = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(encryptor.encrypt_padded_vec_mut::<NoPadding>(plaintext))
}

/// Decrypt block-aligned `ciphertext` with AES-256-CBC.
///
/// Succeeds for any correctly sized input; there is no integrity check.
pub fn decrypt_no_padding(key: &CbcKey, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    check_lengths(iv, ciphertext)?;
    let decryptor = Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|_| CryptoError::Decryption)?;
    decryptor
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| CryptoError::Decryption)
}
