//! # hdseal-keys
//!
//! Hierarchical key tree for the hdseal message encryption scheme.
//!
//! Provides:
//! - Derivation path parsing with optional segment labels
//! - BIP32 extended private keys (hardened and normal derivation)
//! - BIP32 extended public keys (normal derivation only)
//! - The [`KeyTree`] capability consumed by the decrypter

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extended;
pub mod limits;
pub mod path;

#[cfg(test)]
mod proptests;

pub use error::{KeyError, Result};
pub use extended::{ExtendedPrivateKey, ExtendedPublicKey, KeyTree};
pub use limits::{HARDENED_OFFSET, MAX_PATH_DEPTH, MAX_SEED_LEN, MIN_SEED_LEN};
pub use path::{DerivationPath, PathSegment};
