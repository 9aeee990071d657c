//! Authenticated hybrid encryption.
//!
//! Sign-then-encrypt with the header bound as associated data:
//!
//! 1. The sender signs `SHA256(payload ‖ receiver key)` with a recoverable
//!    compact signature, so the receiver learns who sent it and a relay
//!    cannot re-address it
//! 2. A fresh ephemeral key agrees an AES-256-GCM key with the receiver
//! 3. Signature and payload are sealed under a fresh random nonce with the
//!    version, ephemeral key, receiver path and nonce length as associated
//!    data
//! 4. The blob travels as base58 text
//!
//! ## Usage
//!
//! ```
//! use hdseal_keys::{DerivationPath, ExtendedPrivateKey, KeyTree};
//! use hdseal_protocol::encryption::{
//!     Decrypter, Encrypter, MessageDecrypter, MessageEncrypter, Verification,
//! };
//!
//! let sender = ExtendedPrivateKey::from_seed(&[1u8; 32]).unwrap();
//! let receiver = ExtendedPrivateKey::from_seed(&[2u8; 32]).unwrap();
//! let path = DerivationPath::parse("m/1'/0").unwrap();
//!
//! let receiver_public = receiver.derive_public_key(&path).unwrap();
//! let encrypter = Encrypter::new(sender.private_key(), receiver_public, "m/1'/0");
//! let blob = encrypter.encrypt(b"hello").unwrap();
//!
//! let decrypter = Decrypter::new(&receiver, Verification::KnownSender(sender.public_key()));
//! assert_eq!(decrypter.decrypt(&blob).unwrap(), b"hello");
//! ```

mod decrypter;
mod encrypter;

use hdseal_crypto::PublicKey;

use crate::Result;

pub use decrypter::Decrypter;
pub use encrypter::{encrypt, Encrypter};

/// Produces transport text from a payload.
pub trait MessageEncrypter {
    /// Encrypt `payload` into base58 text.
    fn encrypt(&self, payload: &[u8]) -> Result<String>;
}

/// Recovers a verified payload from transport text.
pub trait MessageDecrypter {
    /// Decrypt and authenticate base58 text produced by a [`MessageEncrypter`].
    fn decrypt(&self, text: &str) -> Result<Vec<u8>>;
}

/// Whose signature the decrypter expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verification {
    /// The message was sent to ourselves; the signer must be the receiver's
    /// own key at the blob's path.
    FromSelf,
    /// The signer must be this key.
    KnownSender(PublicKey),
    /// Any signer is accepted. The signature must still be well formed and
    /// recoverable.
    Unauthenticated,
}
