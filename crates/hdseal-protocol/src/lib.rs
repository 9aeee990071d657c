//! # hdseal-protocol
//!
//! Authenticated hybrid encryption between hierarchically derived
//! secp256k1 keys.
//!
//! This crate provides:
//! - **Encrypter / Decrypter**: sign-then-encrypt with the header bound as
//!   AEAD associated data, carried as base58 text
//! - **EncryptedBlob**: the binary blob layout and its parser
//! - **Wire codec**: bounded length-prefixed fields
//! - **Legacy cipher**: unauthenticated ECDH + AES-CBC, for old data only
//!
//! ## Security Properties
//!
//! - A relay that sees the blob learns the receiver path and nothing else
//! - Any change to the header, nonce or ciphertext fails AEAD opening
//! - The signature binds the receiver key, so a signed payload cannot be
//!   re-addressed to someone else
//! - Parsing is bounded by explicit limits and the input size
//!
//! ## Logging
//!
//! Events are emitted through `tracing`. The library never installs a
//! subscriber and never logs key material or payload bytes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blob;
pub mod config;
pub mod encryption;
pub mod error;
pub mod legacy;
pub mod limits;
pub mod signed;
pub mod wire;

#[cfg(test)]
mod proptests;

pub use blob::EncryptedBlob;
pub use config::{ConfigError, SealConfig, SealConfigBuilder};
pub use encryption::{
    encrypt, Decrypter, Encrypter, MessageDecrypter, MessageEncrypter, Verification,
};
pub use error::{ErrorKind, ProtocolError, Result};
pub use legacy::{decrypt_with_private_key, encrypt_with_public_key, LegacyCiphertext};
pub use signed::SignedPlaintext;
