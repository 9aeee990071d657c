//! # hdseal-crypto
//!
//! Cryptographic primitives for the hdseal message encryption scheme.
//!
//! This crate provides:
//! - **secp256k1** keys and recoverable compact ECDSA signatures
//! - **ECDH** key agreement with single-use ephemeral keys
//! - **AES-256-GCM** with nonces from 12 to 32 bytes
//! - **AES-256-CBC** without padding, for the legacy cipher path only
//! - **SHA-256** hashing
//!
//! ## Security
//!
//! All secret data uses `zeroize` for secure memory cleanup.
//! Digest comparisons use constant-time operations via `subtle`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aead;
pub mod agreement;
pub mod cbc;
pub mod error;
pub mod hash;
pub mod random;
pub mod secp256k1;

#[cfg(test)]
mod proptests;

pub use aead::{open, seal, AeadKey};
pub use agreement::{
    generate_shared_secret, generate_shared_secret_for_aead, recover_shared_secret,
    recover_shared_secret_for_aead, EphemeralKeyPair, RawSharedSecret,
};
pub use self::cbc::CbcKey;
pub use error::{CryptoError, Result};
pub use hash::Hash256;
pub use random::{fill_random, padded_serialize_big_int, random_bytes, random_bytes_from};
pub use secp256k1::{
    recover_compact, sign_compact, CompactSignature, PrivateKey, PublicKey,
    COMPACT_SIGNATURE_SIZE, COMPRESSED_PUBLIC_KEY_SIZE, TWEAK_SIZE,
};
