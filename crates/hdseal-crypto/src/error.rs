//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (authentication tag mismatch, wrong key or tampered data).
    #[error("Decryption failed: invalid ciphertext or key")]
    Decryption,

    /// Signing failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The public key could not be recovered from a compact signature.
    #[error("Signature recovery failed: {0}")]
    SignatureRecovery(String),

    /// Bytes do not encode a valid secp256k1 public key.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Bytes do not encode a valid secp256k1 private scalar.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid key length.
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length.
        expected: usize,
        /// Actual key length.
        actual: usize,
    },

    /// Nonce length outside the range the AEAD is instantiated for.
    #[error("Unsupported nonce length {actual}: must be between {min} and {max}")]
    UnsupportedNonceLength {
        /// Smallest supported nonce.
        min: usize,
        /// Largest supported nonce.
        max: usize,
        /// Actual nonce length.
        actual: usize,
    },

    /// Input is not a whole number of cipher blocks.
    #[error("Invalid block length: {actual} is not a multiple of {block_size}")]
    InvalidBlockLength {
        /// Cipher block size.
        block_size: usize,
        /// Actual input length.
        actual: usize,
    },

    /// Invalid hash length.
    #[error("Invalid hash length: expected {expected}, got {actual}")]
    InvalidHashLength {
        /// Expected hash length.
        expected: usize,
        /// Actual hash length.
        actual: usize,
    },

    /// Invalid hex string format.
    #[error("Invalid hex string: {0}")]
    InvalidHexFormat(String),
}

/// Result type for cryptographic operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
