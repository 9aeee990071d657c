//! Error types for protocol operations.

use thiserror::Error;

use hdseal_crypto::CryptoError;
use hdseal_keys::KeyError;

/// Broad category of a [`ProtocolError`].
///
/// Callers branch on the category; the variant carries the detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structurally malformed input: bad version, length overruns, truncation.
    Format,
    /// The receiver's key could not be derived at the requested path.
    Derivation,
    /// AEAD authentication failed or a primitive could not be constructed.
    Crypto,
    /// The signature does not identify the expected sender.
    Authentication,
    /// Caller-supplied data exceeds a length limit.
    Encoding,
    /// The sender's signature could not be produced.
    Signing,
}

/// Errors that can occur during protocol operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Input is not valid base58.
    #[error("Invalid base58 text: {0}")]
    InvalidBase58(String),

    /// Blob version byte is not the one this implementation speaks.
    #[error("Unsupported blob version {actual}, expected {expected}")]
    UnsupportedVersion {
        /// Supported version.
        expected: u8,
        /// Version found in the blob.
        actual: u8,
    },

    /// Input ended before a field was complete.
    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the field needs.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },

    /// A length prefix declares more bytes than allowed.
    #[error("Declared length {len} exceeds limit {limit}")]
    LengthExceedsLimit {
        /// Declared length.
        len: usize,
        /// Allowed maximum.
        limit: usize,
    },

    /// Nonce shorter than the protocol minimum.
    #[error("Nonce too short: minimum {min} bytes, got {actual}")]
    NonceTooShort {
        /// Minimum nonce length.
        min: usize,
        /// Actual nonce length.
        actual: usize,
    },

    /// Derivation path bytes are not UTF-8.
    #[error("Derivation path is not valid UTF-8")]
    InvalidPathEncoding,

    /// A caller-supplied field is too long to encode.
    #[error("{field} too long: max {max} bytes, got {len}")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Actual length.
        len: usize,
        /// Allowed maximum.
        max: usize,
    },

    /// Key derivation failed.
    #[error("Derivation error: {0}")]
    Derivation(#[from] KeyError),

    /// Cryptographic operation failed.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Producing the sender signature failed.
    #[error("Signing failed: {0}")]
    Signing(CryptoError),

    /// No public key can be recovered from the embedded signature.
    #[error("Signature not recoverable: {0}")]
    SignatureNotRecoverable(CryptoError),

    /// The recovered signer is not the expected key.
    #[error("Signer does not match the expected key")]
    SignerMismatch,
}

impl ProtocolError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBase58(_)
            | Self::UnsupportedVersion { .. }
            | Self::Truncated { .. }
            | Self::LengthExceedsLimit { .. }
            | Self::NonceTooShort { .. }
            | Self::InvalidPathEncoding => ErrorKind::Format,
            Self::FieldTooLong { .. } => ErrorKind::Encoding,
            Self::Derivation(_) => ErrorKind::Derivation,
            Self::Crypto(_) => ErrorKind::Crypto,
            Self::Signing(_) => ErrorKind::Signing,
            Self::SignatureNotRecoverable(_) | Self::SignerMismatch => ErrorKind::Authentication,
        }
    }
}

/// Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
