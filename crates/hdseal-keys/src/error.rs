//! Error types for key tree operations.

use thiserror::Error;

/// Errors that can occur while parsing paths or deriving keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Cryptographic operation failed.
    #[error("Crypto error: {0}")]
    Crypto(#[from] hdseal_crypto::CryptoError),

    /// The derivation path string is malformed.
    #[error("Invalid derivation path '{path}': {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Reason for invalidity.
        reason: String,
    },

    /// The requested path does not extend the key's own path.
    #[error("Path {target} is not reachable from key at {key_path}")]
    NotAPrefix {
        /// Path of the key derivation starts from.
        key_path: String,
        /// Requested path.
        target: String,
    },

    /// Hardened children cannot be derived from a public key.
    #[error("Cannot derive hardened path {path} from a public key")]
    HardenedFromPublic {
        /// Requested path.
        path: String,
    },

    /// Seed length outside the accepted range, or seed yields an invalid key.
    #[error("Invalid seed of {len} bytes")]
    InvalidSeed {
        /// Seed length.
        len: usize,
    },

    /// The child at this index is not a valid key; the next index should be used.
    #[error("Invalid child key at index {index}")]
    InvalidChild {
        /// Raw child index (hardened bit included).
        index: u32,
    },

    /// Path is deeper than the tree allows.
    #[error("Derivation path exceeds maximum depth of {max}")]
    DepthExceeded {
        /// Maximum depth.
        max: usize,
    },
}

/// Result type for key tree operations.
pub type Result<T> = std::result::Result<T, KeyError>;
