//! Protocol limits and constants.
//!
//! All wire format limits are defined here for consistent enforcement.

// === Blob layout ===

/// Version byte of the authenticated blob format.
pub const PROTOCOL_VERSION: u8 = 1;

/// Size of the length prefix in front of every variable-length field.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest value a length prefix can carry.
pub const MAX_VARIABLE_LEN: usize = u16::MAX as usize;

/// Maximum derivation path length in bytes.
///
/// Bounds the allocation a hostile blob can request.
pub const MAX_DERIVATION_PATH_LEN: usize = 1000;

// === Nonce ===

// Shorter nonces are rejected by the blob parser before any cryptography;
// longer ones parse but the AEAD refuses them.
pub use hdseal_crypto::aead::{
    DEFAULT_NONCE_SIZE, MAX_NONCE_SIZE as MAX_NONCE_LEN, MIN_NONCE_SIZE as MIN_NONCE_LEN,
};

/// Bytes kept back when bounding the nonce read: an empty signature and an
/// empty payload still need their two length prefixes.
pub const MIN_CIPHERTEXT_LEN: usize = 2;

// === Signed plaintext ===

/// Maximum signature length accepted inside a signed plaintext.
pub const MAX_SIGNATURE_LEN: usize = 200;
